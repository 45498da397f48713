//! COLMAP sparse 3D point

use glam::DVec3;

#[derive(Debug, Clone, PartialEq)]
pub struct Point3D {
    pub id: u64,
    pub position: DVec3,
    pub color: [u8; 3],
    /// Mean reprojection error.
    pub error: f64,
}
