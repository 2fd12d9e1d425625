//! Helpers for integration tests.
#![allow(dead_code)]

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_posts::db::{DbPool, establish_connection_pool};
use pushkind_posts::schema::{categories, users};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Smallest valid GIF header, accepted as an upload.
pub const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn insert_user(&self, id: i32, name: &str, role: &str) {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(users::table)
            .values((
                users::id.eq(id),
                users::name.eq(name),
                users::email.eq(format!("user{id}@example.com")),
                users::role.eq(role),
            ))
            .execute(&mut conn)
            .expect("should insert user");
    }

    pub fn insert_category(&self, id: i32, name: &str) {
        let mut conn = self.pool.get().expect("connection");
        diesel::insert_into(categories::table)
            .values((categories::id.eq(id), categories::name.eq(name)))
            .execute(&mut conn)
            .expect("should insert category");
    }

    /// Two users (ids 1 and 2) and categories A=1, B=2, C=3, D=4.
    pub fn seeded() -> Self {
        let db = Self::new();
        db.insert_user(1, "Owner", "user");
        db.insert_user(2, "Stranger", "user");
        for (id, name) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
            db.insert_category(id, name);
        }
        db
    }
}
