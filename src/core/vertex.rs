//! Vertex types
//!
//! Positions and texture coordinates live in separate buffers, so each type
//! describes a single attribute.

use bytemuck::{Pod, Zeroable};

/// Vertex position.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexP {
    pub position: [f32; 3],
}

impl VertexP {
    pub const fn new(position: [f32; 3]) -> Self {
        Self { position }
    }

    /// Attribute read from this buffer at `shader_location`.
    pub const fn attribute(shader_location: u32) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            offset: 0,
            shader_location,
            format: wgpu::VertexFormat::Float32x3,
        }
    }
}

/// Texture coordinate, `v = 0` at the top of the image.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexUv {
    pub uv: [f32; 2],
}

impl VertexUv {
    pub const fn new(uv: [f32; 2]) -> Self {
        Self { uv }
    }

    /// Attribute read from this buffer at `shader_location`.
    pub const fn attribute(shader_location: u32) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            offset: 0,
            shader_location,
            format: wgpu::VertexFormat::Float32x2,
        }
    }
}

/// Layout for a buffer holding one `V` per vertex.
pub fn layout_for<V: Pod>(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<V>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(std::mem::size_of::<VertexP>(), 12); // 3 floats * 4 bytes
        assert_eq!(std::mem::size_of::<VertexUv>(), 8); // 2 floats * 4 bytes
    }

    #[test]
    fn test_layout_stride_matches_type() {
        let attributes = [VertexUv::attribute(1)];
        let layout = layout_for::<VertexUv>(&attributes);
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes[0].shader_location, 1);
    }
}
