//! Error types for scene loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Could not find sparse folder in source path: {0}")]
    MissingSparseFolder(PathBuf),

    #[error("No cameras loaded for resolution scale {0}")]
    UnknownScale(f32),

    #[error("Invalid resolution scale: {0}")]
    InvalidScale(f32),

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Dataset error: {0}")]
    Data(#[from] vista_data::DataError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
