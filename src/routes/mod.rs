use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::identity::CurrentUser;
use crate::services::ServiceError;

pub mod admin;
pub mod comments;
pub mod main;
pub mod posts;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &CurrentUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user_id", &user.id().get());
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

/// Response for failures that do not re-render a form.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Forbidden => redirect("/"),
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound { .. } => HttpResponse::NotFound().finish(),
        ServiceError::Validation(errors) => HttpResponse::BadRequest().body(errors.to_string()),
        ServiceError::Persistence(cause) => {
            log::error!("Request failed: {cause}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn maps_service_errors_to_responses() {
        let response = error_response(ServiceError::Forbidden);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");

        let response = error_response(ServiceError::Unauthorized);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = error_response(ServiceError::not_found("post", 1));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = error_response(ServiceError::Persistence("disk full".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn alert_levels_use_bootstrap_classes() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Success), "success");
    }
}
