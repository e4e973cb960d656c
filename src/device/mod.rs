//! Graphics device seam
//!
//! The renderer talks to the GPU only through [`GraphicsDevice`]: buffer
//! upload, program creation, texture upload and draw submission.

mod wgpu_device;

#[cfg(test)]
pub(crate) mod recording;

pub use wgpu_device::{WgpuDevice, WgpuProgram, WgpuTexture};

use crate::core::render_states::ClearState;
use crate::error::{ShaderError, TextureError};
use crate::renderer::program::{ProgramLayout, ShaderSource};
use crate::renderer::texture::DecodedImage;
use bytemuck::Pod;
use glam::Mat4;

/// Everything one frame's draw needs.
pub struct DrawCall<'a, D: GraphicsDevice + ?Sized> {
    pub clear: ClearState,
    pub program: &'a D::Program,
    pub positions: &'a D::Buffer,
    pub tex_coords: &'a D::Buffer,
    pub projection: Mat4,
    pub model_view: Mat4,
    /// `None` until the texture has loaded; nothing is sampled then.
    pub texture: Option<&'a D::Texture>,
    pub vertex_count: u32,
}

/// GPU resource creation and draw submission.
pub trait GraphicsDevice {
    type Buffer;
    type Program;
    type Texture;
    /// Per-frame destination of [`GraphicsDevice::draw`].
    type Target<'a>;

    /// Upload static vertex data.
    fn create_vertex_buffer<V: Pod>(&mut self, label: &str, vertices: &[V]) -> Self::Buffer;

    /// Compile and link a program whose locations were already resolved into `layout`.
    fn create_program(
        &mut self,
        source: &ShaderSource<'_>,
        layout: &ProgramLayout,
    ) -> Result<Self::Program, ShaderError>;

    /// Upload decoded pixels, ready to be sampled by `program`.
    ///
    /// Images the device cannot hold are rejected, never uploaded.
    fn create_texture(
        &mut self,
        program: &Self::Program,
        image: &DecodedImage,
    ) -> Result<Self::Texture, TextureError>;

    /// Clear the target and draw the call's vertices as a triangle list.
    fn draw(&mut self, target: &Self::Target<'_>, call: &DrawCall<'_, Self>);
}
