//! Camera manifest records (`cameras.json`)

use super::CameraPose;
use glam::{DMat3, DMat4};
use serde::{Deserialize, Serialize};
use vista_data::graphics::fov2focal;

/// One entry of `cameras.json`: camera-to-world pose and pinhole focals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraJson {
    pub id: usize,
    pub img_name: String,
    pub width: u32,
    pub height: u32,
    pub position: [f64; 3],
    /// Camera-to-world rotation, row by row.
    pub rotation: [[f64; 3]; 3],
    pub fy: f64,
    pub fx: f64,
}

/// Serialize the pose of `camera` under manifest index `id`.
pub fn camera_to_json<C: CameraPose + ?Sized>(id: usize, camera: &C) -> CameraJson {
    let mut rt = DMat4::from_mat3(camera.rotation().transpose());
    rt.w_axis = camera.translation().extend(1.0);
    let c2w = rt.inverse();

    let (width, height) = camera.dimensions();
    CameraJson {
        id,
        img_name: camera.image_name().to_string(),
        width,
        height,
        position: c2w.w_axis.truncate().to_array(),
        rotation: DMat3::from_mat4(c2w).transpose().to_cols_array_2d(),
        fy: fov2focal(camera.fov_y(), height as f64),
        fx: fov2focal(camera.fov_x(), width as f64),
    }
}
