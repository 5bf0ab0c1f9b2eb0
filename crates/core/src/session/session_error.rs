use std::path::PathBuf;

use thiserror::Error;

/// Failures of user-triggered session operations.
///
/// None of them is fatal: the session stays usable and its capture state is
/// unchanged.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Camera {device} could not be opened: {source}")]
    SourceOpen {
        device: u32,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("Face classifier file not found")]
    ClassifierNotFound,
    #[error("Classifier could not be loaded from {path}: {source}")]
    ClassifierLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
    #[error("Invalid classifier file: {path}")]
    EmptyClassifier { path: PathBuf },
    #[error("No image available to save")]
    NoFrame,
    #[error("Unsupported image format: {path} (use .jpg, .png or .bmp)")]
    UnsupportedFormat { path: PathBuf },
    #[error("Image could not be saved to {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error>,
    },
}
