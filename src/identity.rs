//! Identity of the requesting user.
//!
//! Sign-in happens in the external auth service; this application only reads
//! the user id it stored in the session cookie.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest};

use crate::domain::types::UserId;

/// Authenticated user extracted from the session; anonymous requests get 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl CurrentUser {
    pub fn id(self) -> UserId {
        self.0
    }
}

/// Parses the identity string stored in the session.
pub fn parse_identity(id: &str) -> Option<UserId> {
    id.trim()
        .parse::<i32>()
        .ok()
        .and_then(|raw| UserId::new(raw).ok())
}

/// User id of the session, if any.
pub fn current_user_id(req: &HttpRequest) -> Option<UserId> {
    let identity = req.get_identity().ok()?;
    let id = identity.id().ok()?;
    parse_identity(&id)
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            current_user_id(req)
                .map(CurrentUser)
                .ok_or_else(|| ErrorUnauthorized("Authentication required")),
        )
    }
}
