//! PLY file writing

use crate::DataError;
use crate::ply::PlyVertex;
use glam::Vec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn write_header<W: Write>(out: &mut W, count: usize) -> std::io::Result<()> {
    writeln!(out, "ply")?;
    writeln!(out, "format binary_little_endian 1.0")?;
    writeln!(out, "element vertex {}", count)?;
    for axis in ["x", "y", "z", "nx", "ny", "nz"] {
        writeln!(out, "property float {}", axis)?;
    }
    for channel in ["red", "green", "blue"] {
        writeln!(out, "property uchar {}", channel)?;
    }
    writeln!(out, "end_header")
}

fn write_vertex<W: Write>(out: &mut W, vertex: &PlyVertex) -> std::io::Result<()> {
    for value in vertex.position.to_array().into_iter().chain(vertex.normal.to_array()) {
        out.write_all(&value.to_le_bytes())?;
    }
    out.write_all(&vertex.color)
}

/// Write positions and 8-bit colors as a binary PLY with zero normals.
///
/// `positions` and `colors` must have the same length.
pub fn store_ply(path: &Path, positions: &[Vec3], colors: &[[u8; 3]]) -> Result<(), DataError> {
    if positions.len() != colors.len() {
        return Err(DataError::Ply(format!(
            "{} positions but {} colors",
            positions.len(),
            colors.len()
        )));
    }

    debug!("Writing {} points to {}", positions.len(), path.display());
    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, positions.len())?;
    for (position, color) in positions.iter().zip(colors) {
        let vertex = PlyVertex {
            position: *position,
            normal: Vec3::ZERO,
            color: *color,
        };
        write_vertex(&mut out, &vertex)?;
    }
    out.flush()?;
    Ok(())
}
