//! Scene loaded from a COLMAP dataset
//!
//! Loading reads the scene description, copies the sparse point cloud to
//! `<output>/input.ply`, writes the camera manifest `<output>/cameras.json`
//! and builds the train/test cameras for every requested resolution scale.

use crate::camera::loader::validate_scale;
use crate::camera::{Camera, CameraJson, camera_list_from_infos, camera_to_json};
use crate::{LoaderConfig, SceneError};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use vista_data::{BasicPointCloud, read_colmap_scene_info};

/// Point cloud copy written next to the manifest.
pub const INPUT_PLY: &str = "input.ply";
/// Camera manifest file name.
pub const CAMERAS_JSON: &str = "cameras.json";

type CamerasByScale = BTreeMap<OrderedFloat<f32>, Vec<Camera>>;

/// Cameras at each loaded resolution scale plus the scene's point cloud.
///
/// The train and test maps always hold the same set of scales.
pub struct Scene {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    /// Training iteration restored from a checkpoint, if any.
    pub loaded_iter: Option<u32>,
    /// Radius of the sphere enclosing the training cameras.
    pub cameras_extent: f64,
    pub point_cloud: BasicPointCloud,
    train_cameras: CamerasByScale,
    test_cameras: CamerasByScale,
}

impl Scene {
    /// Load a scene from `source_path`, writing its artifacts to `output_path`.
    ///
    /// With `shuffle`, train and test cameras are shuffled once with `rng`
    /// before any scale is built, so every scale shares the same order.
    #[tracing::instrument(skip_all, fields(source = %source_path.as_ref().display()))]
    pub fn load<R: Rng + ?Sized>(
        source_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        shuffle: bool,
        resolution_scales: &[f32],
        config: &LoaderConfig,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let source_path = source_path.as_ref().to_path_buf();
        let output_path = output_path.as_ref().to_path_buf();

        let sparse = source_path.join("sparse");
        if !sparse.exists() {
            return Err(SceneError::MissingSparseFolder(sparse));
        }
        for &scale in resolution_scales {
            validate_scale(scale)?;
        }
        let config = &config.validated()?;

        info!("Loading Scene Info");
        let mut scene_info = read_colmap_scene_info(&source_path, &config.images, config.eval)?;

        fs::create_dir_all(&output_path)?;
        fs::copy(&scene_info.ply_path, output_path.join(INPUT_PLY))?;

        let manifest: Vec<CameraJson> = scene_info
            .test_cameras
            .iter()
            .chain(&scene_info.train_cameras)
            .enumerate()
            .map(|(id, camera)| camera_to_json(id, camera))
            .collect();
        write_manifest(&output_path.join(CAMERAS_JSON), &manifest)?;

        if shuffle {
            scene_info.train_cameras.shuffle(rng);
            scene_info.test_cameras.shuffle(rng);
        }

        let cameras_extent = scene_info.nerf_normalization.radius;

        let mut train_cameras = CamerasByScale::new();
        let mut test_cameras = CamerasByScale::new();
        for &resolution_scale in resolution_scales {
            info!("Loading Training Cameras");
            train_cameras.insert(
                OrderedFloat(resolution_scale),
                camera_list_from_infos(&scene_info.train_cameras, resolution_scale, config)?,
            );
            info!("Loading Test Cameras");
            test_cameras.insert(
                OrderedFloat(resolution_scale),
                camera_list_from_infos(&scene_info.test_cameras, resolution_scale, config)?,
            );
        }

        Ok(Self {
            source_path,
            output_path,
            loaded_iter: None,
            cameras_extent,
            point_cloud: scene_info.point_cloud,
            train_cameras,
            test_cameras,
        })
    }

    /// [`Scene::load`] with a shuffle seeded from the operating system.
    pub fn load_from_entropy(
        source_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        shuffle: bool,
        resolution_scales: &[f32],
        config: &LoaderConfig,
    ) -> Result<Self, SceneError> {
        let mut rng = StdRng::from_os_rng();
        Self::load(
            source_path,
            output_path,
            shuffle,
            resolution_scales,
            config,
            &mut rng,
        )
    }

    /// Training cameras at `scale`.
    pub fn train_cameras(&self, scale: f32) -> Result<&[Camera], SceneError> {
        self.train_cameras
            .get(&OrderedFloat(scale))
            .map(Vec::as_slice)
            .ok_or(SceneError::UnknownScale(scale))
    }

    /// Test cameras at `scale`.
    pub fn test_cameras(&self, scale: f32) -> Result<&[Camera], SceneError> {
        self.test_cameras
            .get(&OrderedFloat(scale))
            .map(Vec::as_slice)
            .ok_or(SceneError::UnknownScale(scale))
    }

    /// Loaded resolution scales in ascending order.
    pub fn resolution_scales(&self) -> impl Iterator<Item = f32> + '_ {
        self.train_cameras.keys().map(|scale| scale.into_inner())
    }
}

fn write_manifest(path: &Path, manifest: &[CameraJson]) -> Result<(), SceneError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, manifest)?;
    out.flush()?;
    Ok(())
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = |map: &CamerasByScale| {
            map.iter()
                .map(|(scale, cameras)| (scale.into_inner(), cameras.len()))
                .collect::<Vec<_>>()
        };
        f.debug_struct("Scene")
            .field("source_path", &self.source_path)
            .field("output_path", &self.output_path)
            .field("cameras_extent", &self.cameras_extent)
            .field("point_cloud.len()", &self.point_cloud.len())
            .field("train_cameras", &counts(&self.train_cameras))
            .field("test_cameras", &counts(&self.test_cameras))
            .finish()
    }
}
