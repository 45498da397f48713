//! Core CPU-side point cloud type.

use glam::Vec3;

/// A point cloud as stored in a scene's PLY file.
///
/// All three vectors have the same length. Colors are linear RGB in the
/// 0-1 range; normals are zero when the source carries none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicPointCloud {
    pub points: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

impl BasicPointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
