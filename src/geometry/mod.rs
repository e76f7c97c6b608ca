//! Geometry module for vertex data and mesh construction.

mod mesh;
mod vertex;

pub use mesh::Mesh;
pub use vertex::{PositionVertex, Vertex, VERTEX_STRIDE_FLOATS};
