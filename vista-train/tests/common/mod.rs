//! On-disk COLMAP datasets for loader tests.

use image::{Rgb, RgbImage};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const WIDTH: u32 = 16;
pub const HEIGHT: u32 = 12;

pub struct Fixture {
    // Kept alive for the duration of the test.
    _dir: TempDir,
    pub source: PathBuf,
    pub output: PathBuf,
}

/// A text COLMAP model with one PINHOLE camera, one image per name (camera
/// centres spread along x) and three sparse points.
pub fn colmap_scene(names: &[&str]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("scene");
    let output = dir.path().join("output");
    let sparse = source.join("sparse").join("0");
    let images = source.join("images");
    fs::create_dir_all(&sparse).unwrap();
    fs::create_dir_all(&images).unwrap();

    fs::write(
        sparse.join("cameras.txt"),
        format!("# Camera list\n1 PINHOLE {WIDTH} {HEIGHT} 20 20 8 6\n"),
    )
    .unwrap();

    let mut images_txt = String::from("# Image list\n");
    for (i, name) in names.iter().enumerate() {
        images_txt.push_str(&format!("{} 1 0 0 0 {} 0 0 1 {}\n\n", i + 1, i, name));
        let shade = (i * 20 % 256) as u8;
        RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([shade, 255 - shade, 128]))
            .save(images.join(name))
            .unwrap();
    }
    fs::write(sparse.join("images.txt"), images_txt).unwrap();

    fs::write(
        sparse.join("points3D.txt"),
        "# 3D point list\n\
         1 0 0 0 255 0 0 0.1 1 0\n\
         2 1 0 0 0 255 0 0.1 1 1\n\
         3 0 1 0 0 0 255 0.1 1 2\n",
    )
    .unwrap();

    Fixture {
        _dir: dir,
        source,
        output,
    }
}

/// Names `00.png`, `01.png`, ... in sorted order.
pub fn numbered(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{i:02}.png")).collect()
}
