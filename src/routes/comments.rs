use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::forms::comments::{AddCommentForm, AddCommentFormPayload};
use crate::identity::CurrentUser;
use crate::repository::DieselRepository;
use crate::routes::{error_response, redirect};
use crate::services::ServiceError;
use crate::services::comments::{
    add_comment as add_comment_service, delete_comment as delete_comment_service,
};

#[post("/post/{post_id}/comments")]
pub async fn add_comment(
    post_id: web::Path<i32>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCommentForm>,
) -> impl Responder {
    let post_id = post_id.into_inner();
    let back = format!("/post/{post_id}");

    let payload: AddCommentFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&back);
        }
    };

    match add_comment_service(post_id, user.id(), payload, repo.get_ref()) {
        Ok(_) => FlashMessage::success("Comment added.").send(),
        Err(err) => return error_response(err),
    }

    redirect(&back)
}

#[post("/comments/{comment_id}/delete")]
pub async fn delete_comment(
    comment_id: web::Path<i32>,
    user: CurrentUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_comment_service(comment_id.into_inner(), user.id(), repo.get_ref()) {
        Ok(post_id) => {
            FlashMessage::success("Comment deleted.").send();
            redirect(&format!("/post/{post_id}"))
        }
        Err(ServiceError::Forbidden) => {
            FlashMessage::error("You can only delete your own comments.").send();
            redirect("/")
        }
        Err(err) => error_response(err),
    }
}
