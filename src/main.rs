use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use env_logger::Env;
use tera::Tera;

use pushkind_posts::db::establish_connection_pool;
use pushkind_posts::images::ConfiguredImageStore;
use pushkind_posts::models::config::ServerConfig;
use pushkind_posts::repository::DieselRepository;
use pushkind_posts::routes::admin::{activate_user, deactivate_user, show_users};
use pushkind_posts::routes::comments::{add_comment, delete_comment};
use pushkind_posts::routes::main::index;
use pushkind_posts::routes::posts::{
    delete_post, edit_post, show_create_form, show_post, store_post, update_post,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let server_config = match ServerConfig::load(&app_env) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load server config: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match Key::try_from(server_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("Invalid secret, at least 64 bytes are required: {e}");
            std::process::exit(1);
        }
    };

    let tera = match Tera::new(&format!("{}/**/*", server_config.templates_dir)) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    let image_store = match ConfiguredImageStore::from_config(&server_config.image_storage) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to prepare image storage: {e}");
            std::process::exit(1);
        }
    };

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let repo = web::Data::new(DieselRepository::new(pool));
    let image_store = web::Data::new(image_store);
    let tera = web::Data::new(tera);
    let bind_address = (server_config.address.clone(), server_config.port);
    let server_config = web::Data::new(server_config);

    log::info!(
        "Starting server on http://{}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(|cfg| {
                if let ConfiguredImageStore::Directory(store) = image_store.get_ref() {
                    cfg.service(Files::new(store.public_url(), store.root().clone()));
                }
            })
            .service(index)
            .service(show_create_form)
            .service(store_post)
            .service(show_post)
            .service(edit_post)
            .service(update_post)
            .service(delete_post)
            .service(add_comment)
            .service(delete_comment)
            .service(show_users)
            .service(deactivate_user)
            .service(activate_user)
            .app_data(repo.clone())
            .app_data(image_store.clone())
            .app_data(tera.clone())
            .app_data(server_config.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
