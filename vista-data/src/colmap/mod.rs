//! COLMAP sparse model parsing
//!
//! Readers for the three files of a COLMAP sparse reconstruction
//! (`cameras`, `images`, `points3D`) in both the binary and the text layout.

pub(crate) mod binary;
mod camera;
mod image;
mod point;
mod text;

pub use binary::{read_cameras_binary, read_images_binary, read_points3d_binary};
pub use camera::{CameraModel, ColmapCamera};
pub use image::ColmapImage;
pub use point::Point3D;
pub use text::{read_cameras_text, read_images_text, read_points3d_text};

use std::collections::BTreeMap;

/// Intrinsics keyed by camera id.
pub type Cameras = BTreeMap<u32, ColmapCamera>;

/// Registered images keyed by image id.
pub type Images = BTreeMap<u32, ColmapImage>;
