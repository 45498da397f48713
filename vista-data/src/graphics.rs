//! Camera geometry helpers shared by the dataset and training crates.

use glam::{DMat3, DMat4, DVec3};

/// Field of view (radians) covered by `pixels` at the given focal length.
pub fn focal2fov(focal: f64, pixels: f64) -> f64 {
    2.0 * (pixels / (2.0 * focal)).atan()
}

/// Focal length (pixels) giving the field of view `fov` over `pixels`.
pub fn fov2focal(fov: f64, pixels: f64) -> f64 {
    pixels / (2.0 * (fov / 2.0).tan())
}

/// World-to-view transform for a camera.
///
/// `rotation` is the camera-to-world rotation (the transpose of COLMAP's
/// world-to-camera rotation) and `translation` COLMAP's `tvec`. The camera
/// centre is shifted by `translate` and scaled by `scale` before the transform
/// is rebuilt.
pub fn world_to_view(rotation: DMat3, translation: DVec3, translate: DVec3, scale: f64) -> DMat4 {
    let mut rt = DMat4::from_mat3(rotation.transpose());
    rt.w_axis = translation.extend(1.0);

    let mut c2w = rt.inverse();
    let center = (c2w.w_axis.truncate() + translate) * scale;
    c2w.w_axis = center.extend(1.0);
    c2w.inverse()
}

/// Camera centre in world space.
pub fn camera_center(rotation: DMat3, translation: DVec3) -> DVec3 {
    world_to_view(rotation, translation, DVec3::ZERO, 1.0)
        .inverse()
        .w_axis
        .truncate()
}
