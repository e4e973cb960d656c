//! In-memory device that records what the renderer asks of the GPU.

use super::{DrawCall, GraphicsDevice};
use crate::core::render_states::ClearState;
use crate::error::{ShaderError, TextureError};
use crate::renderer::program::{ProgramLayout, ShaderSource};
use crate::renderer::texture::DecodedImage;
use bytemuck::Pod;
use glam::Mat4;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBuffer {
    pub label: String,
    pub vertices: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedProgram {
    pub layout: ProgramLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedTexture {
    pub id: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub clear: ClearState,
    pub projection: Mat4,
    pub model_view: Mat4,
    pub texture: Option<RecordedTexture>,
    pub vertex_count: u32,
    pub position_vertices: usize,
    pub tex_coord_vertices: usize,
}

#[derive(Debug)]
pub struct RecordingDevice {
    pub buffers: Vec<RecordedBuffer>,
    pub programs: usize,
    pub draws: Vec<RecordedDraw>,
    textures: usize,
    link_error: Option<String>,
    max_texture_dimension: u32,
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self {
            buffers: Vec::new(),
            programs: 0,
            draws: Vec::new(),
            textures: 0,
            link_error: None,
            max_texture_dimension: wgpu::Limits::default().max_texture_dimension_2d,
        }
    }
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose program linking always fails.
    pub fn failing_link(message: &str) -> Self {
        Self {
            link_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// A device holding textures of at most `max` texels per side.
    pub fn with_max_texture_dimension(max: u32) -> Self {
        Self {
            max_texture_dimension: max,
            ..Self::default()
        }
    }

    pub fn textures_created(&self) -> usize {
        self.textures
    }
}

impl GraphicsDevice for RecordingDevice {
    type Buffer = RecordedBuffer;
    type Program = RecordedProgram;
    type Texture = RecordedTexture;
    type Target<'a> = ();

    fn create_vertex_buffer<V: Pod>(&mut self, label: &str, vertices: &[V]) -> RecordedBuffer {
        let buffer = RecordedBuffer {
            label: label.to_string(),
            vertices: vertices.len(),
        };
        self.buffers.push(buffer.clone());
        buffer
    }

    fn create_program(
        &mut self,
        _source: &ShaderSource<'_>,
        layout: &ProgramLayout,
    ) -> Result<RecordedProgram, ShaderError> {
        if let Some(message) = &self.link_error {
            return Err(ShaderError::Link(message.clone()));
        }
        self.programs += 1;
        Ok(RecordedProgram { layout: *layout })
    }

    fn create_texture(
        &mut self,
        _program: &RecordedProgram,
        image: &DecodedImage,
    ) -> Result<RecordedTexture, TextureError> {
        image.check_fits(self.max_texture_dimension)?;
        self.textures += 1;
        Ok(RecordedTexture {
            id: self.textures,
            width: image.width(),
            height: image.height(),
        })
    }

    fn draw(&mut self, _target: &(), call: &DrawCall<'_, Self>) {
        self.draws.push(RecordedDraw {
            clear: call.clear,
            projection: call.projection,
            model_view: call.model_view,
            texture: call.texture.copied(),
            vertex_count: call.vertex_count,
            position_vertices: call.positions.vertices,
            tex_coord_vertices: call.tex_coords.vertices,
        });
    }
}
