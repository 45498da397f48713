//! Vista Training Crate
//!
//! The scene a Gaussian Splatting trainer consumes: cameras built from a
//! COLMAP dataset at one or more resolution scales, the normalization radius
//! and the initial point cloud.
//!
//! ## Modules
//!
//! - [`camera`]: Camera objects, the camera-list builder and the JSON manifest record
//! - [`config`]: Loader configuration (compute device, resolution policy)
//! - [`scene`]: The scene loader and per-scale camera accessors

pub mod camera;
pub mod config;
pub mod error;
pub mod scene;

pub use camera::{Camera, CameraJson, camera_list_from_infos, camera_to_json, load_camera};
pub use config::{Device, LoaderConfig, ResolutionPolicy};
pub use error::SceneError;
pub use scene::Scene;
