use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Serialize;
use thiserror::Error;

/// Multipart body of the create and update post forms.
///
/// `category` is repeated once per selected checkbox. Field rules are checked
/// by the post service so every failing field can be reported at once.
#[derive(MultipartForm)]
pub struct PostForm {
    pub category: Vec<Text<i32>>,
    pub description: Text<String>,
    #[multipart(limit = "8MB")]
    pub image: Option<TempFile>,
}

/// Raw values of a submitted [`PostForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFormPayload {
    pub description: String,
    pub category_ids: Vec<i32>,
    /// Upload contents; `None` when no file was chosen.
    pub image: Option<Vec<u8>>,
}

/// Submitted text values echoed back when the form is re-rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostFormValues {
    pub description: String,
    pub category_ids: Vec<i32>,
}

impl PostFormPayload {
    pub fn values(&self) -> PostFormValues {
        PostFormValues {
            description: self.description.clone(),
            category_ids: self.category_ids.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Failed to read uploaded image: {0}")]
    ImageRead(#[from] std::io::Error),
}

impl TryFrom<PostForm> for PostFormPayload {
    type Error = PostFormError;

    fn try_from(value: PostForm) -> Result<Self, Self::Error> {
        // Browsers send an empty part when the file input is left blank.
        let image = match value.image {
            Some(mut upload) if upload.size > 0 => {
                let mut bytes = Vec::with_capacity(upload.size);
                upload.file.read_to_end(&mut bytes)?;
                Some(bytes)
            }
            _ => None,
        };

        Ok(Self {
            description: value.description.into_inner(),
            category_ids: value.category.into_iter().map(Text::into_inner).collect(),
            image,
        })
    }
}
