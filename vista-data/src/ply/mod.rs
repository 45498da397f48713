//! PLY point cloud reading and writing

mod loader;
mod vertex;
mod writer;

pub use loader::fetch_ply;
pub use vertex::PlyVertex;
pub use writer::store_ply;
