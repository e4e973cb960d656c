//! wgpu implementation of the device seam

use super::{DrawCall, GraphicsDevice};
use crate::context::WgpuContext;
use crate::core::buffer::{RawUniformBuffer, VertexBuffer};
use crate::core::pipeline::{create_shader_module, PipelineBuilder};
use crate::core::render_states::{CullState, DepthState};
use crate::core::render_target::RenderTarget;
use crate::core::texture::Texture2D;
use crate::core::vertex::{layout_for, VertexP, VertexUv};
use crate::error::{ShaderError, TextureError};
use crate::renderer::program::{
    ProgramLayout, ShaderSource, TEXTURED_ENTRY, UNTEXTURED_ENTRY, VERTEX_ENTRY,
};
use crate::renderer::texture::DecodedImage;
use bytemuck::Pod;
use tracing::debug;

type MatrixUniform = [[f32; 4]; 4];

/// Draws into a window surface of a fixed colour format.
pub struct WgpuDevice {
    ctx: WgpuContext,
    surface_format: wgpu::TextureFormat,
}

impl WgpuDevice {
    pub fn new(ctx: WgpuContext, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            ctx,
            surface_format,
        }
    }

    pub fn context(&self) -> &WgpuContext {
        &self.ctx
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }
}

/// Linked cube program: one pipeline per fragment entry point, sharing the
/// transform uniforms.
pub struct WgpuProgram {
    textured: wgpu::RenderPipeline,
    untextured: wgpu::RenderPipeline,
    projection: RawUniformBuffer,
    model_view: RawUniformBuffer,
    transform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    layout: ProgramLayout,
}

impl WgpuProgram {
    pub fn layout(&self) -> &ProgramLayout {
        &self.layout
    }
}

/// An uploaded texture bound for sampling by the program it was created for.
pub struct WgpuTexture {
    texture: Texture2D,
    bind_group: wgpu::BindGroup,
}

impl WgpuTexture {
    pub fn size(&self) -> (u32, u32) {
        self.texture.size()
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Run `f` inside a validation error scope and return what wgpu reported.
fn capture_validation<R>(ctx: &WgpuContext, f: impl FnOnce() -> R) -> (R, Option<wgpu::Error>) {
    let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    (value, pollster::block_on(scope.pop()))
}

impl GraphicsDevice for WgpuDevice {
    type Buffer = VertexBuffer;
    type Program = WgpuProgram;
    type Texture = WgpuTexture;
    type Target<'a> = RenderTarget<'a>;

    fn create_vertex_buffer<V: Pod>(&mut self, label: &str, vertices: &[V]) -> VertexBuffer {
        VertexBuffer::new(&self.ctx, vertices, Some(label))
    }

    fn create_program(
        &mut self,
        source: &ShaderSource<'_>,
        layout: &ProgramLayout,
    ) -> Result<WgpuProgram, ShaderError> {
        let (program, error) = capture_validation(&self.ctx, || {
            link_program(&self.ctx, self.surface_format, source, layout)
        });
        if let Some(e) = error {
            return Err(ShaderError::Link(e.to_string()));
        }
        let program = program?;
        debug!("cube pipelines created");
        Ok(program)
    }

    fn create_texture(
        &mut self,
        program: &WgpuProgram,
        image: &DecodedImage,
    ) -> Result<WgpuTexture, TextureError> {
        image.check_fits(self.ctx.device.limits().max_texture_dimension_2d)?;

        let (texture, error) =
            capture_validation(&self.ctx, || upload_texture(&self.ctx, program, image));
        match error {
            Some(e) => Err(TextureError::Upload(e.to_string())),
            None => Ok(texture),
        }
    }

    fn draw(&mut self, target: &RenderTarget<'_>, call: &DrawCall<'_, Self>) {
        let program = call.program;
        program
            .projection
            .write(&self.ctx, &call.projection.to_cols_array_2d());
        program
            .model_view
            .write(&self.ctx, &call.model_view.to_cols_array_2d());

        let mut encoder = self.ctx.create_encoder(Some("cube frame encoder"));
        {
            let mut pass = target.begin_render_pass(&mut encoder, call.clear);

            match call.texture {
                Some(texture) => {
                    pass.set_pipeline(&program.textured);
                    pass.set_bind_group(ProgramLayout::TEXTURE_GROUP, &texture.bind_group, &[]);
                }
                None => pass.set_pipeline(&program.untextured),
            }
            pass.set_bind_group(
                ProgramLayout::TRANSFORM_GROUP,
                &program.transform_bind_group,
                &[],
            );
            pass.set_vertex_buffer(0, call.positions.slice());
            pass.set_vertex_buffer(1, call.tex_coords.slice());
            pass.draw(0..call.vertex_count, 0..1);
        }
        self.ctx.submit(std::iter::once(encoder.finish()));
    }
}

fn link_program(
    ctx: &WgpuContext,
    surface_format: wgpu::TextureFormat,
    source: &ShaderSource<'_>,
    layout: &ProgramLayout,
) -> Result<WgpuProgram, ShaderError> {
    let vertex_module = create_shader_module(ctx, "cube vertex shader", source.vertex);
    let fragment_module = create_shader_module(ctx, "cube fragment shader", source.fragment);

    // Transform group (group 0)
    let transform_layout = ctx
        .device
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cube transform bind group layout"),
            entries: &[
                uniform_entry(layout.projection.binding),
                uniform_entry(layout.model_view.binding),
            ],
        });

    // Texture group (group 1)
    let texture_layout = ctx
        .device
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cube texture bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: layout.texture.binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: layout.sampler.binding,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

    let position_attributes = [VertexP::attribute(layout.position)];
    let tex_coord_attributes = [VertexUv::attribute(layout.tex_coord)];

    let pipeline = |label: &'static str, entry: &'static str, textured: bool| {
        let mut builder = PipelineBuilder::new(ctx)
            .label(label)
            .vertex(&vertex_module, VERTEX_ENTRY)
            .fragment(&fragment_module, entry)
            .vertex_layout(layout_for::<VertexP>(&position_attributes))
            .vertex_layout(layout_for::<VertexUv>(&tex_coord_attributes))
            .bind_group_layout(&transform_layout)
            .color_format(surface_format)
            .depth(DepthState::less_equal())
            .cull(CullState::Back)
            .front_face(wgpu::FrontFace::Cw);
        if textured {
            builder = builder.bind_group_layout(&texture_layout);
        }
        builder
            .build()
            .map_err(|e| ShaderError::Link(format!("{e:#}")))
    };

    let textured = pipeline("cube textured pipeline", TEXTURED_ENTRY, true)?;
    let untextured = pipeline("cube untextured pipeline", UNTEXTURED_ENTRY, false)?;

    let projection = RawUniformBuffer::for_type::<MatrixUniform>(ctx, Some("cube projection"));
    let model_view = RawUniformBuffer::for_type::<MatrixUniform>(ctx, Some("cube model view"));

    let transform_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("cube transform bind group"),
        layout: &transform_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: layout.projection.binding,
                resource: projection.buffer().as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: layout.model_view.binding,
                resource: model_view.buffer().as_entire_binding(),
            },
        ],
    });

    Ok(WgpuProgram {
        textured,
        untextured,
        projection,
        model_view,
        transform_bind_group,
        texture_layout,
        layout: *layout,
    })
}

fn upload_texture(ctx: &WgpuContext, program: &WgpuProgram, image: &DecodedImage) -> WgpuTexture {
    let texture = Texture2D::from_rgba8(
        ctx,
        image.width(),
        image.height(),
        image.pixels(),
        Some("cube texture"),
    );

    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("cube texture bind group"),
        layout: &program.texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: program.layout.texture.binding,
                resource: wgpu::BindingResource::TextureView(texture.view()),
            },
            wgpu::BindGroupEntry {
                binding: program.layout.sampler.binding,
                resource: wgpu::BindingResource::Sampler(texture.sampler()),
            },
        ],
    });

    WgpuTexture {
        texture,
        bind_group,
    }
}
