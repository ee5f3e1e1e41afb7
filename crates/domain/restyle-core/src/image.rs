use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Image media types accepted at intake and produced by synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MediaType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl MediaType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(MediaType::Png),
            "image/jpeg" | "image/jpg" => Some(MediaType::Jpeg),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            MediaType::Png => "png",
            MediaType::Jpeg => "jpg",
        }
    }

    /// True when `bytes` start with the magic number of this type.
    pub fn matches_signature(&self, bytes: &[u8]) -> bool {
        match self {
            MediaType::Png => bytes.starts_with(PNG_SIGNATURE),
            MediaType::Jpeg => bytes.starts_with(JPEG_SIGNATURE),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image data is empty")]
    Empty,
    #[error("image data does not look like {media_type}")]
    SignatureMismatch { media_type: MediaType },
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),
    #[error("malformed data url")]
    MalformedDataUrl,
    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Binary image held as a `data:<mime>;base64,<payload>` string.
///
/// Construction validates that the payload decodes to non-empty bytes carrying
/// the signature of the declared media type. The value is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedImage {
    data: String,
    media_type: MediaType,
    name: String,
}

impl EncodedImage {
    pub fn from_bytes(
        bytes: &[u8],
        media_type: MediaType,
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if !media_type.matches_signature(bytes) {
            return Err(ImageError::SignatureMismatch { media_type });
        }

        Ok(Self {
            data: format!("data:{};base64,{}", media_type.as_mime(), BASE64.encode(bytes)),
            media_type,
            name: name.into(),
        })
    }

    pub fn from_base64(
        payload: &str,
        media_type: MediaType,
        name: impl Into<String>,
    ) -> Result<Self, ImageError> {
        let bytes = BASE64.decode(payload.trim())?;
        Self::from_bytes(&bytes, media_type, name)
    }

    pub fn from_data_url(url: &str, name: impl Into<String>) -> Result<Self, ImageError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or(ImageError::MalformedDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUrl)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(ImageError::MalformedDataUrl)?;
        let media_type =
            MediaType::from_mime(mime).ok_or_else(|| ImageError::UnsupportedType(mime.into()))?;
        Self::from_base64(payload, media_type, name)
    }

    /// Displayable form, usable directly as an image source.
    pub fn data_url(&self) -> &str {
        &self.data
    }

    /// The base64 payload without the `data:...;base64,` prefix.
    pub fn base64_payload(&self) -> &str {
        self.data
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }

    pub fn decode(&self) -> Result<Vec<u8>, ImageError> {
        Ok(BASE64.decode(self.base64_payload())?)
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
