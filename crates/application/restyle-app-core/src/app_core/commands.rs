use std::path::PathBuf;

use crate::domain::ImageRole;
use restyle_core::EncodedImage;

#[derive(Debug, Clone)]
pub enum AppCommand {
    // Intake
    SelectImage { role: ImageRole, path: PathBuf },
    SelectEncoded { role: ImageRole, image: EncodedImage },
    RemoveImage(ImageRole),

    // Runs
    StartSingleShot,
    StartMultiPrompt,
    Reset,
}
