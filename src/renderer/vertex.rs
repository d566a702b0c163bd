//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GRID_LINE: [f32; 4] = [0.0, 0.0, 0.0, 0.06];
    pub const SNAKE_HEAD: [f32; 4] = [0.18, 0.55, 0.24, 1.0];
    pub const SNAKE_BODY: [f32; 4] = [0.30, 0.69, 0.31, 1.0];
    pub const SNAKE_TAIL: [f32; 4] = [0.45, 0.78, 0.40, 1.0];
    pub const SNAKE_DEAD: [f32; 4] = [0.55, 0.55, 0.55, 1.0];
    pub const EYE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EYE_PUPIL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const APPLE: [f32; 4] = [0.86, 0.12, 0.15, 1.0];
    pub const APPLE_LEAF: [f32; 4] = [0.20, 0.62, 0.20, 1.0];
    pub const APPLE_STEM: [f32; 4] = [0.40, 0.26, 0.13, 1.0];
}
