//! Scene description read from a COLMAP dataset directory
//!
//! Expected layout:
//!
//! ```text
//! <source>/
//!   images/            (name configurable)
//!   sparse/0/
//!     cameras.{bin,txt}
//!     images.{bin,txt}
//!     points3D.{bin,txt}
//!     points3D.ply     (written on first load if missing)
//! ```

use crate::colmap::{self, Cameras, Images, Point3D};
use crate::graphics::{camera_center, focal2fov};
use crate::{BasicPointCloud, DataError, fetch_ply, store_ply};
use glam::{DMat3, DVec3, Vec3};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Every n-th camera (after sorting by name) is held out for evaluation.
pub const LLFF_HOLD: usize = 8;

/// Per-camera descriptor, independent of any resolution scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    /// COLMAP camera (intrinsics) id.
    pub uid: u32,
    /// Camera-to-world rotation, i.e. the transpose of COLMAP's rotation.
    pub rotation: DMat3,
    /// COLMAP world-to-camera translation.
    pub translation: DVec3,
    pub fov_y: f64,
    pub fov_x: f64,
    pub image_path: PathBuf,
    /// File name without extension.
    pub image_name: String,
    pub width: u32,
    pub height: u32,
}

impl CameraInfo {
    pub fn center(&self) -> DVec3 {
        camera_center(self.rotation, self.translation)
    }
}

/// Translation and radius that bring the camera centres into a unit-ish
/// sphere around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NerfNormalization {
    pub translate: DVec3,
    pub radius: f64,
}

/// Everything a training run needs from a reconstructed scene.
#[derive(Debug, Clone)]
pub struct SceneInfo {
    pub point_cloud: BasicPointCloud,
    pub train_cameras: Vec<CameraInfo>,
    pub test_cameras: Vec<CameraInfo>,
    pub nerf_normalization: NerfNormalization,
    pub ply_path: PathBuf,
}

/// Normalization derived from the spread of camera centres.
///
/// The radius is 10% larger than the distance from the mean centre to the
/// farthest camera.
pub fn nerfpp_norm(cameras: &[CameraInfo]) -> NerfNormalization {
    if cameras.is_empty() {
        return NerfNormalization {
            translate: DVec3::ZERO,
            radius: 0.0,
        };
    }

    let centers: Vec<DVec3> = cameras.iter().map(CameraInfo::center).collect();
    let mean = centers.iter().sum::<DVec3>() / centers.len() as f64;
    let diagonal = centers
        .iter()
        .map(|c| c.distance(mean))
        .fold(0.0, f64::max);

    NerfNormalization {
        translate: -mean,
        radius: diagonal * 1.1,
    }
}

fn read_model(sparse: &Path) -> Result<(Images, Cameras), DataError> {
    let binary = colmap::read_images_binary(&sparse.join("images.bin")).and_then(|images| {
        Ok((images, colmap::read_cameras_binary(&sparse.join("cameras.bin"))?))
    });
    match binary {
        Ok(model) => Ok(model),
        Err(e) => {
            debug!("Binary COLMAP model unavailable ({}), trying text", e);
            Ok((
                colmap::read_images_text(&sparse.join("images.txt"))?,
                colmap::read_cameras_text(&sparse.join("cameras.txt"))?,
            ))
        }
    }
}

fn read_points(sparse: &Path) -> Result<Vec<Point3D>, DataError> {
    let bin = sparse.join("points3D.bin");
    let txt = sparse.join("points3D.txt");
    if bin.is_file() {
        colmap::read_points3d_binary(&bin)
    } else if txt.is_file() {
        colmap::read_points3d_text(&txt)
    } else {
        Err(DataError::MissingPoints(sparse.to_path_buf()))
    }
}

/// Build one descriptor per registered image.
pub fn read_colmap_cameras(
    extrinsics: &Images,
    intrinsics: &Cameras,
    images_folder: &Path,
) -> Result<Vec<CameraInfo>, DataError> {
    extrinsics
        .values()
        .enumerate()
        .map(|(index, extr)| {
            debug!("Reading camera {}/{}", index + 1, extrinsics.len());
            let intr = intrinsics
                .get(&extr.camera_id)
                .ok_or(DataError::UnknownCameraId {
                    image_id: extr.id,
                    camera_id: extr.camera_id,
                })?;
            let (width, height) = match (u32::try_from(intr.width), u32::try_from(intr.height)) {
                (Ok(width), Ok(height)) => (width, height),
                _ => {
                    return Err(DataError::InvalidCameraSize {
                        camera_id: intr.id,
                        width: intr.width,
                        height: intr.height,
                    });
                }
            };
            let (focal_x, focal_y) = intr.pinhole_focal()?;

            let file_name = Path::new(&extr.name)
                .file_name()
                .ok_or_else(|| DataError::InvalidImageName(extr.name.clone()))?;
            let image_path = images_folder.join(file_name);
            // Everything before the first dot, so `a.b.png` is named `a`.
            let image_name = file_name
                .to_string_lossy()
                .split('.')
                .next()
                .unwrap_or_default()
                .to_string();

            Ok(CameraInfo {
                uid: intr.id,
                rotation: extr.rotation_matrix().transpose(),
                translation: extr.translation,
                fov_y: focal2fov(focal_y, height as f64),
                fov_x: focal2fov(focal_x, width as f64),
                image_path,
                image_name,
                width,
                height,
            })
        })
        .collect()
}

/// Read the scene description of a COLMAP dataset.
///
/// `images` names the image folder inside `path`. With `eval`, every
/// [`LLFF_HOLD`]-th camera becomes a test camera; otherwise all cameras are
/// used for training.
#[tracing::instrument(skip_all, fields(path = %path.display(), eval = eval))]
pub fn read_colmap_scene_info(path: &Path, images: &str, eval: bool) -> Result<SceneInfo, DataError> {
    let sparse = path.join("sparse").join("0");
    let (extrinsics, intrinsics) = read_model(&sparse)?;

    let mut cam_infos = read_colmap_cameras(&extrinsics, &intrinsics, &path.join(images))?;
    cam_infos.sort_by(|a, b| a.image_name.cmp(&b.image_name));

    let (train_cameras, test_cameras) = if eval {
        let (test, train): (Vec<_>, Vec<_>) = cam_infos
            .into_iter()
            .enumerate()
            .partition(|(index, _)| index % LLFF_HOLD == 0);
        (
            train.into_iter().map(|(_, c)| c).collect(),
            test.into_iter().map(|(_, c)| c).collect(),
        )
    } else {
        (cam_infos, Vec::new())
    };

    let nerf_normalization = nerfpp_norm(&train_cameras);

    let ply_path = sparse.join("points3D.ply");
    if !ply_path.exists() {
        info!("Converting sparse points to {}, only needed on first load", ply_path.display());
        let points = read_points(&sparse)?;
        let positions: Vec<Vec3> = points.iter().map(|p| p.position.as_vec3()).collect();
        let colors: Vec<[u8; 3]> = points.iter().map(|p| p.color).collect();
        store_ply(&ply_path, &positions, &colors)?;
    }
    let point_cloud = fetch_ply(&ply_path)?;

    info!(
        "Scene info: {} train cameras, {} test cameras, {} points",
        train_cameras.len(),
        test_cameras.len(),
        point_cloud.len()
    );

    Ok(SceneInfo {
        point_cloud,
        train_cameras,
        test_cameras,
        nerf_normalization,
        ply_path,
    })
}
