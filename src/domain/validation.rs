//! Structural rules shared by post creation and post update.
//!
//! All rules run on every submission and every failing field is reported,
//! so a form can show each message next to its input.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::domain::image::ImageUpload;
use crate::domain::types::{CategorySelection, PostDescription, TypeConstraintError};

/// A single rejected field with a human readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl From<TypeConstraintError> for FieldError {
    fn from(value: TypeConstraintError) -> Self {
        Self {
            field: value.field(),
            reason: value.to_string(),
        }
    }
}

/// Every field error produced by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: impl Into<FieldError>) {
        self.0.push(error.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First reason reported for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.reason.as_str())
    }

    /// Field name to first reason, for rendering next to form inputs.
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        for error in &self.0 {
            map.entry(error.field).or_insert_with(|| error.reason.clone());
        }
        map
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.reason))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<TypeConstraintError> for FieldErrors {
    fn from(value: TypeConstraintError) -> Self {
        Self(vec![value.into()])
    }
}

/// Whether a submission must carry an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRequirement {
    /// Creating a post.
    Required,
    /// Updating a post; no image keeps the stored one.
    Optional,
}

/// Typed post fields that passed [`validate_post_fields`].
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub description: PostDescription,
    pub categories: CategorySelection,
    pub image: Option<ImageUpload>,
}

/// Checks description length, category cardinality and the image payload.
///
/// An empty image payload counts as no image. Whether referenced categories
/// exist is checked by the caller against the store.
pub fn validate_post_fields(
    description: String,
    category_ids: &[i32],
    image: Option<Vec<u8>>,
    requirement: ImageRequirement,
) -> Result<PostFields, FieldErrors> {
    let mut errors = FieldErrors::new();

    let description = PostDescription::new(description)
        .map_err(|e| errors.push(e))
        .ok();

    let categories = CategorySelection::from_raw(category_ids)
        .map_err(|e| errors.push(e))
        .ok();

    let image = match (image.filter(|bytes| !bytes.is_empty()), requirement) {
        (Some(bytes), _) => ImageUpload::new(bytes).map(Some).unwrap_or_else(|e| {
            errors.push(e);
            None
        }),
        (None, ImageRequirement::Required) => {
            errors.push(TypeConstraintError::MissingValue("image"));
            None
        }
        (None, ImageRequirement::Optional) => None,
    };

    match (description, categories) {
        (Some(description), Some(categories)) if errors.is_empty() => Ok(PostFields {
            description,
            categories,
            image,
        }),
        _ => Err(errors),
    }
}
