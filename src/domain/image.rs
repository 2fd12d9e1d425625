use std::fmt::{Display, Formatter};

use crate::domain::types::TypeConstraintError;

/// Largest accepted upload, in bytes (1048 KiB).
pub const MAX_IMAGE_BYTES: usize = 1048 * 1024;

const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const GIF87_SIGNATURE: &[u8] = b"GIF87a";
const GIF89_SIGNATURE: &[u8] = b"GIF89a";

/// Image encodings accepted for post uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Detects the encoding from the leading bytes of the payload.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(JPEG_SIGNATURE) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else if bytes.starts_with(GIF87_SIGNATURE) || bytes.starts_with(GIF89_SIGNATURE) {
            Some(Self::Gif)
        } else {
            None
        }
    }

    /// File extension, also used as the `image/<ext>` media subtype.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> String {
        format!("image/{}", self.extension())
    }
}

impl Display for ImageFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A validated image upload that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accepts non-empty JPEG, PNG or GIF payloads up to [`MAX_IMAGE_BYTES`].
    pub fn new(bytes: Vec<u8>) -> Result<Self, TypeConstraintError> {
        if bytes.is_empty() {
            return Err(TypeConstraintError::MissingValue("image"));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(TypeConstraintError::ImageTooLarge {
                field: "image",
                max_bytes: MAX_IMAGE_BYTES,
            });
        }
        let format =
            ImageFormat::sniff(&bytes).ok_or(TypeConstraintError::UnsupportedImageFormat("image"))?;
        Ok(Self { format, bytes })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(len: usize) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.resize(len, 0);
        bytes
    }

    #[test]
    fn sniffs_accepted_formats() {
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(&png(16)), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"GIF87a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"%PDF-1.7"), None);
    }

    #[test]
    fn rejects_empty_payload() {
        assert_eq!(
            ImageUpload::new(vec![]).unwrap_err(),
            TypeConstraintError::MissingValue("image")
        );
    }

    #[test]
    fn rejects_unknown_encoding() {
        assert_eq!(
            ImageUpload::new(b"BM this is a bitmap".to_vec()).unwrap_err(),
            TypeConstraintError::UnsupportedImageFormat("image")
        );
    }

    #[test]
    fn enforces_size_limit() {
        assert!(ImageUpload::new(png(MAX_IMAGE_BYTES)).is_ok());
        assert_eq!(
            ImageUpload::new(png(MAX_IMAGE_BYTES + 1)).unwrap_err(),
            TypeConstraintError::ImageTooLarge {
                field: "image",
                max_bytes: MAX_IMAGE_BYTES
            }
        );
    }

    #[test]
    fn reports_mime_type() {
        let upload = ImageUpload::new(png(32)).unwrap();
        assert_eq!(upload.format(), ImageFormat::Png);
        assert_eq!(upload.format().mime_type(), "image/png");
    }
}
