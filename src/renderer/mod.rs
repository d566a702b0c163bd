//! WebGPU rendering module
//!
//! The board is built from flat-colored triangles in grid units (one unit per
//! cell, y-up) and mapped to NDC in the pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, grid_to_ndc, screen_to_grid};
pub use scene::scene_vertices;
pub use vertex::Vertex;
