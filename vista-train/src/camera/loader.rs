//! Building cameras from descriptors at a resolution scale

use crate::camera::Camera;
use crate::config::{AUTO_MAX_WIDTH, LoaderConfig, ResolutionPolicy};
use crate::SceneError;
use image::imageops::FilterType;
use image::{DynamicImage, Rgb, Rgb32FImage};
use std::sync::Once;
use tracing::{debug, warn};
use vista_data::CameraInfo;

static LARGE_IMAGE_WARNING: Once = Once::new();

pub(crate) fn validate_scale(resolution_scale: f32) -> Result<(), SceneError> {
    if resolution_scale.is_finite() && resolution_scale > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidScale(resolution_scale))
    }
}

/// Size an image of native size `(width, height)` is loaded at.
///
/// Divisor policies round to the nearest pixel (ties to even); the other
/// policies truncate. Both sides are at least one pixel.
pub fn target_resolution(
    policy: ResolutionPolicy,
    (width, height): (u32, u32),
    resolution_scale: f32,
) -> (u32, u32) {
    let (w, h) = (width as f64, height as f64);
    let scale = resolution_scale as f64;

    let (target_w, target_h) = match policy {
        ResolutionPolicy::Divisor(divisor) => {
            let factor = scale * divisor as f64;
            ((w / factor).round_ties_even(), (h / factor).round_ties_even())
        }
        ResolutionPolicy::Auto | ResolutionPolicy::Width(_) => {
            let global_down = match policy {
                ResolutionPolicy::Width(target) => w / target as f64,
                _ if width > AUTO_MAX_WIDTH => w / AUTO_MAX_WIDTH as f64,
                _ => 1.0,
            };
            let factor = global_down * scale;
            ((w / factor).trunc(), (h / factor).trunc())
        }
    };
    ((target_w as u32).max(1), (target_h as u32).max(1))
}

fn ground_truth(image: &DynamicImage) -> Rgb32FImage {
    let has_alpha = image.color().has_alpha();
    let rgba = image.to_rgba32f();
    Rgb32FImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = if has_alpha { a.clamp(0.0, 1.0) } else { 1.0 };
        Rgb([
            r.clamp(0.0, 1.0) * alpha,
            g.clamp(0.0, 1.0) * alpha,
            b.clamp(0.0, 1.0) * alpha,
        ])
    })
}

/// Decode the image of `info` and build the camera at `resolution_scale`.
pub fn load_camera(
    config: &LoaderConfig,
    id: usize,
    info: &CameraInfo,
    resolution_scale: f32,
) -> Result<Camera, SceneError> {
    let policy = config.resolution.validate()?;
    let decoded = image::open(&info.image_path)?;
    let native = (decoded.width(), decoded.height());

    if policy == ResolutionPolicy::Auto && native.0 > AUTO_MAX_WIDTH {
        LARGE_IMAGE_WARNING.call_once(|| {
            warn!(
                "Encountered quite large input images (>{} pixels width), rescaling to {}. \
                 If this is not desired, please explicitly set the resolution to 1",
                AUTO_MAX_WIDTH, AUTO_MAX_WIDTH
            );
        });
    }

    let (width, height) = target_resolution(policy, native, resolution_scale);
    let resized = if (width, height) == native {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::CatmullRom)
    };

    debug!(
        "Loaded camera {} ({}) at {}x{}",
        id, info.image_name, width, height
    );
    Ok(Camera::new(id, info, ground_truth(&resized), config.device))
}

/// Build the cameras for `infos` at one resolution scale, in order.
#[tracing::instrument(skip_all, fields(count = infos.len(), resolution_scale = resolution_scale))]
pub fn camera_list_from_infos(
    infos: &[CameraInfo],
    resolution_scale: f32,
    config: &LoaderConfig,
) -> Result<Vec<Camera>, SceneError> {
    validate_scale(resolution_scale)?;
    infos
        .iter()
        .enumerate()
        .map(|(id, info)| load_camera(config, id, info, resolution_scale))
        .collect()
}
