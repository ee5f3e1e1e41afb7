pub mod error;
pub mod image;
pub mod intake;
pub mod prompts;
pub mod slot;

pub use error::{RestyleError, RestyleErrorKind};
pub use image::{EncodedImage, ImageError, MediaType};
pub use intake::{encode_bytes, encode_file, IntakeError};
pub use prompts::{PromptKind, PromptParseError, PromptSet};
pub use slot::ResultSlot;
