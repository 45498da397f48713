//! Text COLMAP model readers (`*.txt`)

use super::{CameraModel, Cameras, ColmapCamera, ColmapImage, Images, Point3D};
use crate::DataError;
use glam::{DVec2, DVec3};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Whitespace-separated fields of one line, with line-aware errors.
struct Fields<'a> {
    file: &'static str,
    line: usize,
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(file: &'static str, line: usize, text: &'a str) -> Self {
        Self {
            file,
            line,
            iter: text.split_whitespace(),
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> DataError {
        DataError::Malformed {
            file: self.file,
            line: self.line,
            reason: reason.into(),
        }
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str, DataError> {
        self.iter
            .next()
            .ok_or_else(|| self.malformed(format!("missing {what}")))
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T, DataError> {
        let raw = self.next_str(what)?;
        raw.parse()
            .map_err(|_| self.malformed(format!("invalid {what} '{raw}'")))
    }

    fn next_dvec3(&mut self, what: &str) -> Result<DVec3, DataError> {
        Ok(DVec3::new(self.next(what)?, self.next(what)?, self.next(what)?))
    }

    fn rest(&mut self) -> Vec<&'a str> {
        self.iter.by_ref().collect()
    }
}

/// Content lines with their 1-based line numbers, comments and blanks removed.
fn content_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<(usize, String), DataError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) => {
                let trimmed = line.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('#'))
                    .then(|| Ok((index + 1, trimmed.to_string())))
            }
            Err(e) => Some(Err(e.into())),
        })
}

fn open(path: &Path) -> Result<BufReader<File>, DataError> {
    debug!("Reading text COLMAP file: {}", path.display());
    Ok(BufReader::new(File::open(path)?))
}

/// Read `cameras.txt`.
pub fn read_cameras_text(path: &Path) -> Result<Cameras, DataError> {
    parse_cameras(open(path)?)
}

/// Read `images.txt`.
pub fn read_images_text(path: &Path) -> Result<Images, DataError> {
    parse_images(open(path)?)
}

/// Read `points3D.txt`. Tracks are skipped.
pub fn read_points3d_text(path: &Path) -> Result<Vec<Point3D>, DataError> {
    parse_points3d(open(path)?)
}

pub(crate) fn parse_cameras<R: BufRead>(reader: R) -> Result<Cameras, DataError> {
    let mut cameras = Cameras::new();
    for line in content_lines(reader) {
        let (number, text) = line?;
        let mut fields = Fields::new("cameras.txt", number, &text);

        let id = fields.next("CAMERA_ID")?;
        let model = CameraModel::from_name(fields.next_str("MODEL")?)?;
        let width = fields.next("WIDTH")?;
        let height = fields.next("HEIGHT")?;
        let params = fields
            .rest()
            .into_iter()
            .map(|raw| {
                raw.parse::<f64>()
                    .map_err(|_| fields.malformed(format!("invalid parameter '{raw}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if params.len() != model.num_params() {
            return Err(fields.malformed(format!(
                "{model:?} expects {} parameters, found {}",
                model.num_params(),
                params.len()
            )));
        }

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

/// Each image takes two lines: the pose, then its 2D observations. The
/// observation line may be empty, so it is consumed raw rather than through
/// `content_lines`.
pub(crate) fn parse_images<R: BufRead>(reader: R) -> Result<Images, DataError> {
    let mut images = Images::new();
    let mut lines = reader.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let mut fields = Fields::new("images.txt", index + 1, text);
        let id = fields.next("IMAGE_ID")?;
        let (qw, qx, qy, qz) = (
            fields.next("QW")?,
            fields.next("QX")?,
            fields.next("QY")?,
            fields.next("QZ")?,
        );
        let translation = fields.next_dvec3("T")?;
        let camera_id = fields.next("CAMERA_ID")?;
        // Names may contain spaces.
        let name = fields.rest().join(" ");
        if name.is_empty() {
            return Err(fields.malformed("missing NAME"));
        }

        let (xys, point3d_ids) = match lines.next() {
            Some((index, points_line)) => parse_observations(index + 1, &points_line?)?,
            None => (Vec::new(), Vec::new()),
        };

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

fn parse_observations(line: usize, text: &str) -> Result<(Vec<DVec2>, Vec<i64>), DataError> {
    let mut fields = Fields::new("images.txt", line, text);
    let mut xys = Vec::new();
    let mut ids = Vec::new();
    while fields.iter.clone().next().is_some() {
        xys.push(DVec2::new(fields.next("X")?, fields.next("Y")?));
        ids.push(fields.next("POINT3D_ID")?);
    }
    Ok((xys, ids))
}

pub(crate) fn parse_points3d<R: BufRead>(reader: R) -> Result<Vec<Point3D>, DataError> {
    let mut points = Vec::new();
    for line in content_lines(reader) {
        let (number, text) = line?;
        let mut fields = Fields::new("points3D.txt", number, &text);

        let id = fields.next("POINT3D_ID")?;
        let position = fields.next_dvec3("XYZ")?;
        let color = [fields.next("R")?, fields.next("G")?, fields.next("B")?];
        let error = fields.next("ERROR")?;

        points.push(Point3D {
            id,
            position,
            color,
            error,
        });
    }
    Ok(points)
}
