/// Vertex layout of the textured quad

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use crate::renderer::TextureFormat;

/// One quad vertex: clip-space position and texture coordinate
///
/// Laid out as 4 consecutive `f32` (stride 16), matching the pipeline's
/// vertex input: location 0 = position, location 1 = texcoord.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec2,
    pub tex_coord: Vec2,
}

/// Vertex attribute description (backend-agnostic)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: TextureFormat,
    pub offset: u32,
}

impl Vertex {
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;

    /// Four vertices drawn as a triangle strip; texcoords overshoot [0, 1] so the
    /// clamp-to-edge sampler is visible around the border
    pub const QUAD: [Vertex; 4] = [
        Vertex::new(-0.7, -0.7, -0.1, -0.1),
        Vertex::new(-0.7, 0.7, -0.1, 1.1),
        Vertex::new(0.7, -0.7, 1.1, -0.1),
        Vertex::new(0.7, 0.7, 1.1, 1.1),
    ];

    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            tex_coord: Vec2::new(u, v),
        }
    }

    /// Attribute layout consumed by the pipeline
    pub fn attributes() -> [VertexAttribute; 2] {
        [
            VertexAttribute {
                location: 0,
                format: TextureFormat::R32G32_SFLOAT,
                offset: std::mem::offset_of!(Vertex, position) as u32,
            },
            VertexAttribute {
                location: 1,
                format: TextureFormat::R32G32_SFLOAT,
                offset: std::mem::offset_of!(Vertex, tex_coord) as u32,
            },
        ]
    }

    /// Reinterpret a vertex slice as raw bytes for upload
    pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
