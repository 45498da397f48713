//! PLY vertex data structures

use glam::Vec3;

/// One vertex of a point cloud PLY.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlyVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// 8-bit RGB as stored on disk.
    pub color: [u8; 3],
}
