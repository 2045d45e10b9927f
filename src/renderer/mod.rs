//! WebGPU rendering module
//!
//! Draws each frame as flat-colored quads built from a [`crate::sim::Snapshot`].

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use shapes::scene_vertices;
pub use vertex::Vertex;
