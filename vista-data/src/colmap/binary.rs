//! Binary COLMAP model readers (`*.bin`)
//!
//! All values are little-endian. Counts are `u64`, ids `i32` except for 3D
//! points which use `u64`.

use super::{CameraModel, Cameras, ColmapCamera, ColmapImage, Images, Point3D};
use crate::DataError;
use glam::{DVec2, DVec3};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

// Counts come from the file, so only this many entries are reserved up front.
const MAX_RESERVE: usize = 1 << 16;

fn reserve_for(count: u64) -> usize {
    usize::try_from(count).map_or(MAX_RESERVE, |count| count.min(MAX_RESERVE))
}

fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N], DataError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64, DataError> {
    Ok(u64::from_le_bytes(read_array(reader)?))
}

fn read_i64<R: Read>(reader: &mut R) -> Result<i64, DataError> {
    Ok(i64::from_le_bytes(read_array(reader)?))
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32, DataError> {
    Ok(i32::from_le_bytes(read_array(reader)?))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, DataError> {
    Ok(u32::from_le_bytes(read_array(reader)?))
}

fn read_f64<R: Read>(reader: &mut R) -> Result<f64, DataError> {
    Ok(f64::from_le_bytes(read_array(reader)?))
}

fn read_dvec3<R: Read>(reader: &mut R) -> Result<DVec3, DataError> {
    Ok(DVec3::new(
        read_f64(reader)?,
        read_f64(reader)?,
        read_f64(reader)?,
    ))
}

fn read_name<R: BufRead>(reader: &mut R) -> Result<String, DataError> {
    let mut bytes = Vec::new();
    reader.read_until(0, &mut bytes)?;
    if bytes.pop() != Some(0) {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    String::from_utf8(bytes)
        .map_err(|e| DataError::InvalidImageName(String::from_utf8_lossy(e.as_bytes()).into()))
}

fn open(path: &Path) -> Result<BufReader<File>, DataError> {
    debug!("Reading binary COLMAP file: {}", path.display());
    Ok(BufReader::new(File::open(path)?))
}

/// Read `cameras.bin`.
pub fn read_cameras_binary(path: &Path) -> Result<Cameras, DataError> {
    parse_cameras(&mut open(path)?)
}

/// Read `images.bin`.
pub fn read_images_binary(path: &Path) -> Result<Images, DataError> {
    parse_images(&mut open(path)?)
}

/// Read `points3D.bin`. Tracks are skipped.
pub fn read_points3d_binary(path: &Path) -> Result<Vec<Point3D>, DataError> {
    parse_points3d(&mut open(path)?)
}

pub(crate) fn parse_cameras<R: Read>(reader: &mut R) -> Result<Cameras, DataError> {
    let count = read_u64(reader)?;
    let mut cameras = Cameras::new();
    for _ in 0..count {
        let id = read_u32(reader)?;
        let model = CameraModel::from_id(read_i32(reader)?)?;
        let width = read_u64(reader)?;
        let height = read_u64(reader)?;
        let params = (0..model.num_params())
            .map(|_| read_f64(reader))
            .collect::<Result<Vec<_>, _>>()?;
        cameras.insert(
            id,
            ColmapCamera {
                id,
                model,
                width,
                height,
                params,
            },
        );
    }
    Ok(cameras)
}

pub(crate) fn parse_images<R: BufRead>(reader: &mut R) -> Result<Images, DataError> {
    let count = read_u64(reader)?;
    let mut images = Images::new();
    for _ in 0..count {
        let id = read_u32(reader)?;
        let (qw, qx, qy, qz) = (
            read_f64(reader)?,
            read_f64(reader)?,
            read_f64(reader)?,
            read_f64(reader)?,
        );
        let translation = read_dvec3(reader)?;
        let camera_id = read_u32(reader)?;
        let name = read_name(reader)?;

        let num_points2d = read_u64(reader)?;
        let mut xys = Vec::with_capacity(reserve_for(num_points2d));
        let mut point3d_ids = Vec::with_capacity(reserve_for(num_points2d));
        for _ in 0..num_points2d {
            xys.push(DVec2::new(read_f64(reader)?, read_f64(reader)?));
            point3d_ids.push(read_i64(reader)?);
        }

        images.insert(
            id,
            ColmapImage {
                id,
                rotation: ColmapImage::quat_from_wxyz(qw, qx, qy, qz),
                translation,
                camera_id,
                name,
                xys,
                point3d_ids,
            },
        );
    }
    Ok(images)
}

pub(crate) fn parse_points3d<R: Read>(reader: &mut R) -> Result<Vec<Point3D>, DataError> {
    let count = read_u64(reader)?;
    let mut points = Vec::with_capacity(reserve_for(count));
    for _ in 0..count {
        let id = read_u64(reader)?;
        let position = read_dvec3(reader)?;
        let color = read_array::<3, _>(reader)?;
        let error = read_f64(reader)?;

        // (image_id, point2d_idx) pairs, 8 bytes each
        let track_length = read_u64(reader)?;
        let track_bytes = track_length
            .checked_mul(8)
            .ok_or(DataError::InvalidCount {
                file: "points3D.bin",
                count: track_length,
            })?;
        let skipped = std::io::copy(&mut reader.by_ref().take(track_bytes), &mut std::io::sink())?;
        if skipped < track_bytes {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }

        points.push(Point3D {
            id,
            position,
            color,
            error,
        });
    }
    Ok(points)
}
