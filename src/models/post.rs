use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{NewPost as DomainNewPost, Post as DomainPost, PostUpdate};
use crate::domain::types::{PostDescription, PostImage, TypeConstraintError};

/// Diesel model representing a row in the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub description: String,
    pub image: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Post`]. Category links are written separately.
#[derive(Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost<'a> {
    pub user_id: i32,
    pub description: &'a str,
    pub image: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Column changes for an update. A `None` image leaves the column untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
pub struct PostChanges<'a> {
    pub description: &'a str,
    pub image: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// Row in the `category_post` join table.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::category_post)]
pub struct NewCategoryPost {
    pub post_id: i32,
    pub category_id: i32,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.try_into()?,
            user_id: post.user_id.try_into()?,
            description: PostDescription::new(post.description)?,
            image: PostImage::new(post.image)?,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPost> for NewPost<'a> {
    fn from(post: &'a DomainNewPost) -> Self {
        Self {
            user_id: post.user_id.get(),
            description: post.description.as_str(),
            image: post.image.as_str(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl<'a> From<&'a PostUpdate> for PostChanges<'a> {
    fn from(update: &'a PostUpdate) -> Self {
        Self {
            description: update.description.as_str(),
            image: update.image.as_ref().map(|image| image.as_str()),
            updated_at: update.updated_at,
        }
    }
}
