//! COLMAP registered image (extrinsics)

use glam::{DMat3, DQuat, DVec2, DVec3};

/// A registered image: the world-to-camera pose and its 2D observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapImage {
    pub id: u32,
    /// World-to-camera rotation.
    pub rotation: DQuat,
    /// World-to-camera translation.
    pub translation: DVec3,
    pub camera_id: u32,
    pub name: String,
    pub xys: Vec<DVec2>,
    /// `-1` marks an observation without a triangulated point.
    pub point3d_ids: Vec<i64>,
}

impl ColmapImage {
    /// Build the rotation from COLMAP's `(qw, qx, qy, qz)` ordering.
    pub fn quat_from_wxyz(w: f64, x: f64, y: f64, z: f64) -> DQuat {
        DQuat::from_xyzw(x, y, z, w)
    }

    pub fn rotation_matrix(&self) -> DMat3 {
        DMat3::from_quat(self.rotation.normalize())
    }
}
