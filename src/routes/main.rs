use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::identity::CurrentUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, error_response, render_template};
use crate::services::posts::show_feed;
use crate::services::users::ensure_active_user;

#[get("/")]
pub async fn index(
    user: CurrentUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(err) = ensure_active_user(user.id(), repo.get_ref()) {
        return error_response(err);
    }

    let feed = match show_feed(repo.get_ref()) {
        Ok(feed) => feed,
        Err(err) => return error_response(err),
    };

    let mut context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );
    context.insert("feed", &feed);

    render_template(&tera, "main/index.html", &context)
}
