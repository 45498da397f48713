//! Vista Data Crate
//!
//! Dataset parsing for COLMAP reconstructions: sparse camera models, registered
//! images, sparse point clouds and PLY files. This crate is GPU-agnostic; it
//! produces plain descriptors that the training side turns into cameras.

pub mod colmap;
pub mod error;
pub mod graphics;
pub mod ply;
pub mod scene_info;
pub mod types;

pub use error::DataError;
pub use ply::{fetch_ply, store_ply};
pub use scene_info::{CameraInfo, NerfNormalization, SceneInfo, nerfpp_norm, read_colmap_scene_info};
pub use types::BasicPointCloud;
