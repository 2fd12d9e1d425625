//! Storage backends for uploaded post images.

use std::fs;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::image::ImageUpload;
use crate::domain::types::{PostImage, TypeConstraintError};
use crate::models::config::ImageStorageConfig;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid image reference: {0}")]
    Reference(#[from] TypeConstraintError),
    #[error("public url must be an absolute path below the site root, got '{0}'")]
    PublicUrl(String),
}

/// Turns a validated upload into the value saved in `posts.image`.
pub trait ImageStore {
    fn store(&self, image: &ImageUpload) -> Result<PostImage, ImageStoreError>;

    /// Best-effort removal of an image whose post was never saved.
    fn discard(&self, _image: &PostImage) {}
}

/// Encodes an upload as a `data:image/<ext>;base64,...` URI.
pub fn data_uri(image: &ImageUpload) -> String {
    format!(
        "data:{};base64,{}",
        image.format().mime_type(),
        STANDARD.encode(image.bytes())
    )
}

/// Keeps the image inline in the post row.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineImageStore;

impl ImageStore for InlineImageStore {
    fn store(&self, image: &ImageUpload) -> Result<PostImage, ImageStoreError> {
        Ok(PostImage::new(data_uri(image))?)
    }
}

/// Writes images to a directory and stores their public URL.
#[derive(Debug, Clone)]
pub struct DirectoryImageStore {
    root: PathBuf,
    public_url: String,
}

impl DirectoryImageStore {
    /// Creates `root` if it does not exist yet.
    ///
    /// `public_url` is the path the application serves `root` under, such as
    /// `/uploads`; absolute URLs and the site root itself are rejected.
    pub fn new(
        root: impl Into<PathBuf>,
        public_url: impl Into<String>,
    ) -> Result<Self, ImageStoreError> {
        let raw = public_url.into();
        let public_url = raw.trim_end_matches('/');
        if !public_url.starts_with('/') || public_url.starts_with("//") {
            return Err(ImageStoreError::PublicUrl(raw));
        }
        let public_url = public_url.to_string();

        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, public_url })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// File name behind a URL produced by this store.
    fn file_name<'a>(&self, image: &'a PostImage) -> Option<&'a str> {
        let name = image
            .as_str()
            .strip_prefix(self.public_url.as_str())?
            .strip_prefix('/')?;
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return None;
        }
        Some(name)
    }
}

impl ImageStore for DirectoryImageStore {
    fn store(&self, image: &ImageUpload) -> Result<PostImage, ImageStoreError> {
        let name = format!("{}.{}", Uuid::new_v4(), image.format().extension());
        fs::write(self.root.join(&name), image.bytes())?;
        Ok(PostImage::new(format!("{}/{}", self.public_url, name))?)
    }

    fn discard(&self, image: &PostImage) {
        let Some(name) = self.file_name(image) else {
            return;
        };
        if let Err(e) = fs::remove_file(self.root.join(name)) {
            log::warn!("Failed to remove orphaned image {name}: {e}");
        }
    }
}

/// Image store chosen by [`ImageStorageConfig`].
#[derive(Debug, Clone)]
pub enum ConfiguredImageStore {
    Inline(InlineImageStore),
    Directory(DirectoryImageStore),
}

impl ConfiguredImageStore {
    pub fn from_config(config: &ImageStorageConfig) -> Result<Self, ImageStoreError> {
        match config {
            ImageStorageConfig::Inline => Ok(Self::Inline(InlineImageStore)),
            ImageStorageConfig::Directory { path, public_url } => Ok(Self::Directory(
                DirectoryImageStore::new(path, public_url.as_str())?,
            )),
        }
    }
}

impl ImageStore for ConfiguredImageStore {
    fn store(&self, image: &ImageUpload) -> Result<PostImage, ImageStoreError> {
        match self {
            Self::Inline(store) => store.store(image),
            Self::Directory(store) => store.store(image),
        }
    }

    fn discard(&self, image: &PostImage) {
        match self {
            Self::Inline(store) => store.discard(image),
            Self::Directory(store) => store.discard(image),
        }
    }
}
