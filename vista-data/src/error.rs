//! Error types for dataset parsing.

use crate::colmap::CameraModel;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a COLMAP dataset or a PLY file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PLY parsing error: {0}")]
    Ply(String),

    #[error("Missing '{property}' at vertex {index}")]
    MissingProperty { property: &'static str, index: usize },

    #[error("Unknown camera model: {0}")]
    UnknownCameraModel(String),

    #[error(
        "Colmap camera model not handled: only undistorted datasets (PINHOLE or SIMPLE_PINHOLE cameras) supported, found {0:?}"
    )]
    UnsupportedCameraModel(CameraModel),

    #[error("Image {image_id} references unknown camera {camera_id}")]
    UnknownCameraId { image_id: u32, camera_id: u32 },

    #[error("Malformed {file} at line {line}: {reason}")]
    Malformed {
        file: &'static str,
        line: usize,
        reason: String,
    },

    #[error("Invalid count {count} in {file}")]
    InvalidCount { file: &'static str, count: u64 },

    #[error("Camera {camera_id} size {width}x{height} does not fit in 32 bits")]
    InvalidCameraSize { camera_id: u32, width: u64, height: u64 },

    #[error("Invalid image name: {0}")]
    InvalidImageName(String),

    #[error("No sparse point cloud found in {0}")]
    MissingPoints(PathBuf),
}
