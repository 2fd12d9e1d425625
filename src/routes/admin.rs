use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::admin::UserSearchQuery;
use crate::identity::CurrentUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, error_response, redirect, render_template};
use crate::services::ServiceError;
use crate::services::admin::{
    activate_user as activate_user_service, deactivate_user as deactivate_user_service,
    show_users as show_users_service,
};

#[get("/admin/users")]
pub async fn show_users(
    user: CurrentUser,
    flash_messages: IncomingFlashMessages,
    query: web::Query<UserSearchQuery>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_users_service(user.id(), query.term(), repo.get_ref()) {
        Ok(users) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "users",
                &server_config.auth_service_url,
            );
            context.insert("users", &users);
            context.insert("search", query.term().unwrap_or_default());
            render_template(&tera, "admin/users.html", &context)
        }
        Err(err) => error_response(err),
    }
}

#[post("/admin/users/{user_id}/deactivate")]
pub async fn deactivate_user(
    user_id: web::Path<i32>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match deactivate_user_service(user.id(), user_id.into_inner(), repo.get_ref()) {
        Ok(()) => FlashMessage::success("User deactivated.").send(),
        Err(ServiceError::NotFound { .. }) => FlashMessage::error("User not found.").send(),
        Err(err) => return error_response(err),
    }

    redirect("/admin/users")
}

#[post("/admin/users/{user_id}/activate")]
pub async fn activate_user(
    user_id: web::Path<i32>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match activate_user_service(user.id(), user_id.into_inner(), repo.get_ref()) {
        Ok(()) => FlashMessage::success("User activated.").send(),
        Err(ServiceError::NotFound { .. }) => FlashMessage::error("User not found.").send(),
        Err(err) => return error_response(err),
    }

    redirect("/admin/users")
}
