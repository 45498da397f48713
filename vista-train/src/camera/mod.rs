//! Training cameras
//!
//! A [`Camera`] is one captured viewpoint with its ground-truth image decoded
//! at a particular resolution scale and the transforms the rasterizer needs.

mod json;
pub(crate) mod loader;

pub use json::{CameraJson, camera_to_json};
pub use loader::{camera_list_from_infos, load_camera, target_resolution};

use crate::Device;
use glam::{DMat3, DVec3, Mat4, Vec3, Vec4};
use image::Rgb32FImage;
use std::fmt;
use vista_data::CameraInfo;
use vista_data::graphics::world_to_view;

pub const ZNEAR: f32 = 0.01;
pub const ZFAR: f32 = 100.0;

/// Pose and field of view shared by camera descriptors and loaded cameras.
pub trait CameraPose {
    /// Camera-to-world rotation.
    fn rotation(&self) -> DMat3;
    /// COLMAP world-to-camera translation.
    fn translation(&self) -> DVec3;
    fn fov_x(&self) -> f64;
    fn fov_y(&self) -> f64;
    /// Image size `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);
    fn image_name(&self) -> &str;
}

impl CameraPose for CameraInfo {
    fn rotation(&self) -> DMat3 {
        self.rotation
    }

    fn translation(&self) -> DVec3 {
        self.translation
    }

    fn fov_x(&self) -> f64 {
        self.fov_x
    }

    fn fov_y(&self) -> f64 {
        self.fov_y
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn image_name(&self) -> &str {
        &self.image_name
    }
}

/// Perspective projection matching the rasterizer's conventions.
///
/// Maps view-space depth `znear..zfar` to `0..1` and keeps `w = z`.
pub fn projection_matrix(znear: f32, zfar: f32, fov_x: f32, fov_y: f32) -> Mat4 {
    let tan_half_fov_y = (fov_y / 2.0).tan();
    let tan_half_fov_x = (fov_x / 2.0).tan();

    let top = tan_half_fov_y * znear;
    let bottom = -top;
    let right = tan_half_fov_x * znear;
    let left = -right;

    Mat4::from_cols(
        Vec4::new(2.0 * znear / (right - left), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * znear / (top - bottom), 0.0, 0.0),
        Vec4::new(
            (right + left) / (right - left),
            (top + bottom) / (top - bottom),
            zfar / (zfar - znear),
            1.0,
        ),
        Vec4::new(0.0, 0.0, -(zfar * znear) / (zfar - znear), 0.0),
    )
}

/// A viewpoint ready for training.
///
/// Matrices are column-major, so their memory layout is what a row-vector
/// rasterizer expects for the transposed transforms.
#[derive(Clone)]
pub struct Camera {
    /// Position in the camera list this camera was built for.
    pub uid: usize,
    pub colmap_id: u32,
    pub rotation: DMat3,
    pub translation: DVec3,
    pub fov_x: f64,
    pub fov_y: f64,
    pub image_name: String,
    /// Ground truth, clamped to 0-1 and premultiplied by alpha when present.
    pub image: Rgb32FImage,
    pub image_width: u32,
    pub image_height: u32,
    pub device: Device,
    pub znear: f32,
    pub zfar: f32,
    pub world_view_transform: Mat4,
    pub projection_matrix: Mat4,
    pub full_proj_transform: Mat4,
    pub camera_center: Vec3,
}

impl Camera {
    /// Build a camera from a descriptor and an already resized image.
    pub fn new(uid: usize, info: &CameraInfo, image: Rgb32FImage, device: Device) -> Self {
        let (image_width, image_height) = image.dimensions();
        let world_view_transform =
            world_to_view(info.rotation, info.translation, DVec3::ZERO, 1.0).as_mat4();
        let projection_matrix =
            projection_matrix(ZNEAR, ZFAR, info.fov_x as f32, info.fov_y as f32);
        let full_proj_transform = projection_matrix * world_view_transform;
        let camera_center = world_view_transform.inverse().w_axis.truncate();

        Self {
            uid,
            colmap_id: info.uid,
            rotation: info.rotation,
            translation: info.translation,
            fov_x: info.fov_x,
            fov_y: info.fov_y,
            image_name: info.image_name.clone(),
            image,
            image_width,
            image_height,
            device,
            znear: ZNEAR,
            zfar: ZFAR,
            world_view_transform,
            projection_matrix,
            full_proj_transform,
            camera_center,
        }
    }

    /// The manifest record for this camera at its loaded size.
    pub fn to_json(&self, id: usize) -> CameraJson {
        camera_to_json(id, self)
    }
}

impl CameraPose for Camera {
    fn rotation(&self) -> DMat3 {
        self.rotation
    }

    fn translation(&self) -> DVec3 {
        self.translation
    }

    fn fov_x(&self) -> f64 {
        self.fov_x
    }

    fn fov_y(&self) -> f64 {
        self.fov_y
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    fn image_name(&self) -> &str {
        &self.image_name
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("uid", &self.uid)
            .field("colmap_id", &self.colmap_id)
            .field("image_name", &self.image_name)
            .field("image_width", &self.image_width)
            .field("image_height", &self.image_height)
            .field("device", &self.device)
            .field("camera_center", &self.camera_center)
            .finish()
    }
}
