//! PLY file loading functions

use crate::{BasicPointCloud, DataError};
use glam::Vec3;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

// PLY file structure; only the vertex element is of interest
#[derive(Deserialize, Debug)]
struct PlyFile {
    #[serde(rename = "vertex")]
    vertex: Vec<HashMap<String, JsonValue>>,
}

fn get_f32(prop: Option<&JsonValue>) -> Option<f32> {
    prop.and_then(|v| match v {
        JsonValue::Number(n) => n.as_f64().map(|f| f as f32),
        _ => None,
    })
}

fn get_u8(prop: Option<&JsonValue>) -> Option<u8> {
    prop.and_then(|v| match v {
        JsonValue::Number(n) => n
            .as_u64()
            .map(|u| u as u8)
            .or_else(|| n.as_i64().map(|i| i as u8)),
        _ => None,
    })
}

/// Load a point cloud from a PLY file.
///
/// Positions are required. Colors are read from `red/green/blue` and
/// normalized to 0-1, defaulting to light grey; normals default to zero.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn fetch_ply(path: &Path) -> Result<BasicPointCloud, DataError> {
    debug!("Loading PLY point cloud from: {}", path.display());
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let ply_data: PlyFile = serde_ply::from_reader(reader).map_err(|e| {
        warn!("Failed to parse PLY file: {}", e);
        DataError::Ply(e.to_string())
    })?;

    let count = ply_data.vertex.len();
    let mut points = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(count);

    for (index, vertex) in ply_data.vertex.iter().enumerate() {
        let coord = |property: &'static str| {
            get_f32(vertex.get(property)).ok_or(DataError::MissingProperty { property, index })
        };
        points.push(Vec3::new(coord("x")?, coord("y")?, coord("z")?));

        let color = match (
            get_u8(vertex.get("red")),
            get_u8(vertex.get("green")),
            get_u8(vertex.get("blue")),
        ) {
            (Some(r), Some(g), Some(b)) => {
                Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
            }
            _ => Vec3::splat(0.8),
        };
        colors.push(color);

        let normal = |property: &str| get_f32(vertex.get(property)).unwrap_or(0.0);
        normals.push(Vec3::new(normal("nx"), normal("ny"), normal("nz")));
    }

    info!("PLY point cloud loaded: {} points", count);
    Ok(BasicPointCloud {
        points,
        colors,
        normals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store_ply;

    #[test]
    fn test_fetch_ply_reads_stored_cloud() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.ply");
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-0.5, 0.0, 4.25)];
        let colors = [[255, 0, 51], [0, 255, 102]];
        store_ply(&path, &positions, &colors).unwrap();

        let cloud = fetch_ply(&path).unwrap();
        assert_eq!(cloud.points, positions.to_vec());
        assert_eq!(cloud.normals, vec![Vec3::ZERO; 2]);
        assert!((cloud.colors[0] - Vec3::new(1.0, 0.0, 0.2)).length() < 1e-6);
        assert!((cloud.colors[1] - Vec3::new(0.0, 1.0, 0.4)).length() < 1e-6);
    }

    #[test]
    fn test_fetch_ply_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = fetch_ply(&dir.path().join("absent.ply")).unwrap_err();
        assert!(matches!(err, DataError::Io(_)), "{err}");
    }
}
