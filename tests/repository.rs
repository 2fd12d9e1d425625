use chrono::Utc;
use diesel::prelude::*;
use pushkind_posts::domain::comment::NewComment;
use pushkind_posts::domain::post::{NewPost, PostUpdate};
use pushkind_posts::domain::types::{
    CategoryId, CategorySelection, CommentBody, PostDescription, PostId, PostImage, UserId,
};
use pushkind_posts::repository::{
    CategoryReader, CommentReader, CommentWriter, DieselRepository, PostReader, PostWriter,
    UserListQuery, UserReader, UserWriter,
};
use pushkind_posts::schema::{category_post, comments, posts};

mod common;

fn new_post(categories: &[i32]) -> NewPost {
    let now = Utc::now().naive_utc();
    NewPost {
        user_id: UserId::new(1).expect("valid user id"),
        description: PostDescription::new("hello").expect("valid description"),
        image: PostImage::new("data:image/gif;base64,R0lGODlh").expect("valid image"),
        categories: CategorySelection::from_raw(categories).expect("valid selection"),
        created_at: now,
        updated_at: now,
    }
}

fn update(description: &str, categories: &[i32]) -> PostUpdate {
    PostUpdate {
        description: PostDescription::new(description).expect("valid description"),
        image: None,
        categories: CategorySelection::from_raw(categories).expect("valid selection"),
        updated_at: Utc::now().naive_utc(),
    }
}

fn raw_ids(ids: Vec<CategoryId>) -> Vec<i32> {
    ids.into_iter().map(CategoryId::get).collect()
}

fn count_rows(test_db: &common::TestDb) -> (i64, i64, i64) {
    let mut conn = test_db.pool().get().expect("connection");
    let posts = posts::table.count().get_result(&mut conn).expect("count posts");
    let links = category_post::table
        .count()
        .get_result(&mut conn)
        .expect("count links");
    let comments = comments::table
        .count()
        .get_result(&mut conn)
        .expect("count comments");
    (posts, links, comments)
}

#[test]
fn create_post_writes_post_and_links() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());

    let post_id = repo.create_post(&new_post(&[2, 1])).expect("should create post");

    let post = repo
        .get_post_by_id(post_id)
        .expect("should read post")
        .expect("post should exist");
    assert_eq!(post.description.as_str(), "hello");
    assert_eq!(
        raw_ids(repo.list_linked_category_ids(post_id).expect("links")),
        vec![1, 2]
    );
    assert_eq!(count_rows(&test_db), (1, 2, 0));
}

#[test]
fn update_replaces_every_link() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = repo.create_post(&new_post(&[1, 2])).expect("should create post");

    let affected = repo
        .update_post(post_id, &update("changed", &[2, 3]))
        .expect("should update post");

    assert_eq!(affected, 1);
    assert_eq!(
        raw_ids(repo.list_linked_category_ids(post_id).expect("links")),
        vec![2, 3]
    );
    let post = repo.get_post_by_id(post_id).expect("read").expect("exists");
    assert_eq!(post.description.as_str(), "changed");
    assert_eq!(post.image.as_str(), "data:image/gif;base64,R0lGODlh");
}

#[test]
fn update_of_missing_post_touches_nothing() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());

    let affected = repo
        .update_post(PostId::new(42).expect("valid id"), &update("x", &[1]))
        .expect("update should not fail");

    assert_eq!(affected, 0);
    assert_eq!(count_rows(&test_db), (0, 0, 0));
}

#[test]
fn failed_link_insert_rolls_back_post() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());

    let result = repo.create_post(&new_post(&[1, 999]));

    assert!(result.is_err());
    assert_eq!(count_rows(&test_db), (0, 0, 0));
}

#[test]
fn failed_update_keeps_previous_state() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = repo.create_post(&new_post(&[1, 2])).expect("should create post");

    let result = repo.update_post(post_id, &update("changed", &[3, 999]));

    assert!(result.is_err());
    assert_eq!(
        raw_ids(repo.list_linked_category_ids(post_id).expect("links")),
        vec![1, 2]
    );
    let post = repo.get_post_by_id(post_id).expect("read").expect("exists");
    assert_eq!(post.description.as_str(), "hello");
}

#[test]
fn delete_removes_links_and_comments() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let post_id = repo.create_post(&new_post(&[1, 2, 3])).expect("should create post");
    let now = Utc::now().naive_utc();
    repo.create_comment(&NewComment {
        post_id,
        user_id: UserId::new(2).expect("valid id"),
        body: CommentBody::new("nice").expect("valid body"),
        created_at: now,
        updated_at: now,
    })
    .expect("should create comment");
    assert_eq!(count_rows(&test_db), (1, 3, 1));

    let affected = repo.delete_post(post_id).expect("should delete post");

    assert_eq!(affected, 1);
    assert!(repo.get_post_by_id(post_id).expect("read").is_none());
    assert!(repo.list_comments(post_id).expect("comments").is_empty());
    assert_eq!(count_rows(&test_db), (0, 0, 0));
}

#[test]
fn categories_are_grouped_by_post() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let first = repo.create_post(&new_post(&[3, 1])).expect("create");
    let second = repo.create_post(&new_post(&[2])).expect("create");

    let grouped = repo
        .list_categories_for_posts(&[first, second])
        .expect("should group categories");

    let names = |id: PostId| {
        grouped[&id]
            .iter()
            .map(|c| c.name.as_str().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(first), vec!["A", "C"]);
    assert_eq!(names(second), vec!["B"]);

    let known = repo
        .get_categories_by_ids(&[
            CategoryId::new(1).expect("valid id"),
            CategoryId::new(999).expect("valid id"),
        ])
        .expect("lookup");
    assert_eq!(known.len(), 1);
}

#[test]
fn posts_are_listed_newest_first() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let first = repo.create_post(&new_post(&[1])).expect("create");
    let second = repo.create_post(&new_post(&[1])).expect("create");

    let ids = repo
        .list_posts()
        .expect("list")
        .into_iter()
        .map(|p| p.id)
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![second, first]);
}

#[test]
fn users_can_be_searched_and_deactivated() {
    let test_db = common::TestDb::seeded();
    let repo = DieselRepository::new(test_db.pool());
    let stranger = UserId::new(2).expect("valid id");

    let found = repo
        .list_users(UserListQuery::default().search("stran"))
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, stranger);

    assert_eq!(repo.set_user_active(stranger, false).expect("deactivate"), 1);
    let user = repo.get_user_by_id(stranger).expect("read").expect("exists");
    assert!(!user.is_active());

    repo.set_user_active(stranger, true).expect("activate");
    let user = repo.get_user_by_id(stranger).expect("read").expect("exists");
    assert!(user.is_active());

    assert_eq!(repo.list_users(UserListQuery::default()).expect("list").len(), 2);
}

#[test]
fn user_search_treats_wildcards_literally() {
    let test_db = common::TestDb::seeded();
    test_db.insert_user(3, "100% Real", "user");
    let repo = DieselRepository::new(test_db.pool());

    let found = repo
        .list_users(UserListQuery::default().search("%"))
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name.as_str(), "100% Real");

    let found = repo
        .list_users(UserListQuery::default().search("_"))
        .expect("search");
    assert!(found.is_empty());
}
