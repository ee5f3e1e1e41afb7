//! Converts user-selected files into [`EncodedImage`] values.
//!
//! Only PNG and JPEG are accepted. The declared type comes from the file name;
//! the content must carry the matching signature.

use std::path::Path;

use crate::image::{EncodedImage, ImageError, MediaType};

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file is empty")]
    Empty,
    #[error("file content does not match declared type {0}")]
    SignatureMismatch(MediaType),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntakeError {
    /// Rejections are about the file itself; they leave any existing selection alone.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, IntakeError::Io(_))
    }
}

/// Media type declared by the file name, if any.
pub fn declared_mime(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first_raw()
        .map(|mime| mime.to_string())
}

pub fn encode_file(path: &Path) -> Result<EncodedImage, IntakeError> {
    let declared = declared_mime(path).unwrap_or_else(|| "application/octet-stream".into());
    let media_type =
        MediaType::from_mime(&declared).ok_or(IntakeError::UnsupportedType(declared))?;

    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    build(&bytes, media_type, name)
}

pub fn encode_bytes(
    bytes: &[u8],
    declared_mime: &str,
    name: impl Into<String>,
) -> Result<EncodedImage, IntakeError> {
    let media_type = MediaType::from_mime(declared_mime)
        .ok_or_else(|| IntakeError::UnsupportedType(declared_mime.to_string()))?;
    build(bytes, media_type, name.into())
}

fn build(bytes: &[u8], media_type: MediaType, name: String) -> Result<EncodedImage, IntakeError> {
    EncodedImage::from_bytes(bytes, media_type, name).map_err(|e| match e {
        ImageError::Empty => IntakeError::Empty,
        ImageError::SignatureMismatch { media_type } => IntakeError::SignatureMismatch(media_type),
        // from_bytes only reports the two variants above
        other => IntakeError::UnsupportedType(other.to_string()),
    })
}
