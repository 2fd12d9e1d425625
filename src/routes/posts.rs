use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::validation::FieldErrors;
use crate::forms::posts::{PostForm, PostFormPayload, PostFormValues};
use crate::identity::CurrentUser;
use crate::images::ConfiguredImageStore;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, error_response, redirect, render_template};
use crate::services::ServiceError;
use crate::services::users::ensure_active_user;
use crate::services::posts::{
    create_post as create_post_service, delete_post as delete_post_service,
    edit_post as edit_post_service, show_create_form as show_create_form_service,
    show_post as show_post_service, update_post as update_post_service,
};

/// Shared state needed to render the create and edit forms.
struct FormPage<'a> {
    user: &'a CurrentUser,
    flash_messages: &'a IncomingFlashMessages,
    repo: &'a DieselRepository,
    server_config: &'a ServerConfig,
    tera: &'a Tera,
}

impl FormPage<'_> {
    fn render_create(&self, values: &PostFormValues, errors: &FieldErrors) -> HttpResponse {
        let categories = match show_create_form_service(self.repo) {
            Ok(categories) => categories,
            Err(err) => return error_response(err),
        };

        let mut context = base_context(
            self.flash_messages,
            self.user,
            "create",
            &self.server_config.auth_service_url,
        );
        context.insert("categories", &categories);
        context.insert("form", values);
        context.insert("errors", &errors.to_map());
        render_template(self.tera, "posts/create.html", &context)
    }

    /// Renders the edit form; `submitted` replaces the stored values.
    fn render_edit(
        &self,
        post_id: i32,
        submitted: Option<&PostFormValues>,
        errors: &FieldErrors,
    ) -> HttpResponse {
        let edit = match edit_post_service(post_id, self.user.id(), self.repo) {
            Ok(edit) => edit,
            Err(err) => return error_response(err),
        };

        let values = match submitted {
            Some(values) => values.clone(),
            None => PostFormValues {
                description: edit.post.description.clone(),
                category_ids: edit.selected_category_ids.clone(),
            },
        };

        let mut context = base_context(
            self.flash_messages,
            self.user,
            "edit",
            &self.server_config.auth_service_url,
        );
        context.insert("post", &edit.post);
        context.insert("categories", &edit.categories);
        context.insert("form", &values);
        context.insert("errors", &errors.to_map());
        render_template(self.tera, "posts/edit.html", &context)
    }
}

#[get("/post/create")]
pub async fn show_create_form(
    user: CurrentUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(err) = ensure_active_user(user.id(), repo.get_ref()) {
        return error_response(err);
    }

    let page = FormPage {
        user: &user,
        flash_messages: &flash_messages,
        repo: repo.get_ref(),
        server_config: server_config.get_ref(),
        tera: tera.get_ref(),
    };
    page.render_create(&PostFormValues::default(), &FieldErrors::new())
}

#[post("/post/store")]
pub async fn store_post(
    user: CurrentUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    images: web::Data<ConfiguredImageStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> impl Responder {
    let payload: PostFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to read post form: {e}");
            FlashMessage::error("Could not read the uploaded image.").send();
            return redirect("/post/create");
        }
    };
    let values = payload.values();

    match create_post_service(payload, user.id(), repo.get_ref(), images.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Post created.").send();
            redirect("/")
        }
        Err(ServiceError::Validation(errors)) => {
            let page = FormPage {
                user: &user,
                flash_messages: &flash_messages,
                repo: repo.get_ref(),
                server_config: server_config.get_ref(),
                tera: tera.get_ref(),
            };
            page.render_create(&values, &errors)
        }
        Err(err) => error_response(err),
    }
}

#[get("/post/{post_id}")]
pub async fn show_post(
    post_id: web::Path<i32>,
    user: CurrentUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Err(err) = ensure_active_user(user.id(), repo.get_ref()) {
        return error_response(err);
    }

    match show_post_service(post_id.into_inner(), repo.get_ref()) {
        Ok(details) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "post",
                &server_config.auth_service_url,
            );
            context.insert("post", &details.post);
            context.insert("comments", &details.comments);
            render_template(&tera, "posts/show.html", &context)
        }
        Err(err) => error_response(err),
    }
}

#[get("/post/{post_id}/edit")]
pub async fn edit_post(
    post_id: web::Path<i32>,
    user: CurrentUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = FormPage {
        user: &user,
        flash_messages: &flash_messages,
        repo: repo.get_ref(),
        server_config: server_config.get_ref(),
        tera: tera.get_ref(),
    };
    page.render_edit(post_id.into_inner(), None, &FieldErrors::new())
}

#[post("/post/{post_id}/update")]
#[allow(clippy::too_many_arguments)]
pub async fn update_post(
    post_id: web::Path<i32>,
    user: CurrentUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    images: web::Data<ConfiguredImageStore>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> impl Responder {
    let post_id = post_id.into_inner();

    let payload: PostFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Failed to read post form: {e}");
            FlashMessage::error("Could not read the uploaded image.").send();
            return redirect(&format!("/post/{post_id}/edit"));
        }
    };
    let values = payload.values();

    match update_post_service(
        post_id,
        user.id(),
        payload,
        repo.get_ref(),
        images.get_ref(),
    ) {
        Ok(post_id) => {
            FlashMessage::success("Post updated.").send();
            redirect(&format!("/post/{post_id}"))
        }
        Err(ServiceError::Validation(errors)) => {
            let page = FormPage {
                user: &user,
                flash_messages: &flash_messages,
                repo: repo.get_ref(),
                server_config: server_config.get_ref(),
                tera: tera.get_ref(),
            };
            page.render_edit(post_id, Some(&values), &errors)
        }
        Err(err) => error_response(err),
    }
}

#[post("/post/{post_id}/delete")]
pub async fn delete_post(
    post_id: web::Path<i32>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
    images: web::Data<ConfiguredImageStore>,
) -> impl Responder {
    match delete_post_service(
        post_id.into_inner(),
        user.id(),
        repo.get_ref(),
        images.get_ref(),
    ) {
        Ok(()) => {
            FlashMessage::success("Post deleted.").send();
            redirect("/")
        }
        Err(err) => error_response(err),
    }
}
