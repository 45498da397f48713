//! Loader configuration assembly and the load itself.

use crate::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use vista_train::{LoaderConfig, Scene, SceneError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

pub fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

fn read_config(path: &Path) -> Result<LoaderConfig, AppError> {
    let text = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
        path: path.display().to_string(),
        source,
    })
}

/// Config file values (or defaults) with command-line flags applied on top.
fn loader_config(args: &Args) -> Result<LoaderConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => LoaderConfig::default(),
    };
    if let Some(images) = &args.images {
        config.images = images.clone();
    }
    if args.eval {
        config.eval = true;
    }
    if let Some(resolution) = &args.resolution {
        config.resolution = resolution.parse()?;
    }
    if let Some(device) = &args.device {
        config.device = device.parse()?;
    }
    Ok(config)
}

pub fn run(args: Args) -> Result<(), AppError> {
    let config = loader_config(&args)?;
    info!("Loader config: {:?}", config);

    let shuffle = !args.no_shuffle;
    let scene = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            Scene::load(&args.source, &args.output, shuffle, &args.scales, &config, &mut rng)?
        }
        None => Scene::load_from_entropy(&args.source, &args.output, shuffle, &args.scales, &config)?,
    };

    info!(
        "Loaded {} points, cameras extent {:.4}",
        scene.point_cloud.len(),
        scene.cameras_extent
    );
    for scale in scene.resolution_scales() {
        let train = scene.train_cameras(scale)?;
        let test = scene.test_cameras(scale)?;
        let size = train
            .first()
            .or(test.first())
            .map(|camera| format!("{}x{}", camera.image_width, camera.image_height))
            .unwrap_or_else(|| "-".to_string());
        info!(
            "Scale {}: {} train / {} test cameras ({})",
            scale,
            train.len(),
            test.len(),
            size
        );
    }
    info!("Wrote {}", scene.output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use vista_train::{Device, ResolutionPolicy};

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loader.json");
        fs::write(
            &path,
            r#"{"images": "frames", "resolution": {"divisor": 4}, "device": "cpu"}"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "vista",
            "--source",
            "scene",
            "--output",
            "out",
            "--config",
            path.to_str().unwrap(),
            "--device",
            "gpu:1",
            "--eval",
        ]);
        let config = loader_config(&args).unwrap();
        assert_eq!(config.images, "frames");
        assert_eq!(config.resolution, ResolutionPolicy::Divisor(4));
        assert_eq!(config.device, Device::Gpu(1));
        assert!(config.eval);
    }

    #[test]
    fn test_scales_and_defaults() {
        let args = Args::parse_from(["vista", "-s", "scene", "-o", "out"]);
        assert_eq!(args.scales, [1.0]);
        assert!(!args.no_shuffle);
        assert_eq!(loader_config(&args).unwrap(), LoaderConfig::default());

        let args = Args::parse_from([
            "vista", "-s", "scene", "-o", "out", "--scale", "1", "--scale", "2", "-r", "800",
        ]);
        assert_eq!(args.scales, [1.0, 2.0]);
        assert_eq!(
            loader_config(&args).unwrap().resolution,
            ResolutionPolicy::Width(800)
        );
    }

    #[test]
    fn test_bad_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let args = Args::parse_from([
            "vista",
            "-s",
            "scene",
            "-o",
            "out",
            "--config",
            path.to_str().unwrap(),
        ]);
        assert!(matches!(loader_config(&args), Err(AppError::ConfigParse { .. })));

        let args = Args::parse_from(["vista", "-s", "scene", "-o", "out", "-r", "zero"]);
        assert!(matches!(loader_config(&args), Err(AppError::Scene(_))));
    }
}
