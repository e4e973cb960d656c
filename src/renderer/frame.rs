//! Renderer setup and the per-frame loop body
//!
//! A [`Renderer`] only exists once setup has fully succeeded, so holding one
//! means the loop is running and every frame is safe to draw.

use super::geometry::GeometryBuffers;
use super::input::InputState;
use super::program::ShaderProgram;
use super::settings::SceneSettings;
use super::texture::{CubeTexture, LoadState, TextureHandle};
use super::transform::TransformState;
use super::viewer::{Projection, Viewport};
use crate::core::render_states::ClearState;
use crate::device::{DrawCall, GraphicsDevice};
use crate::error::SetupError;
use glam::Mat4;
use tracing::{debug, info};

/// Everything the loop reads and writes between frames.
pub struct RendererState<D: GraphicsDevice> {
    transform: TransformState,
    projection: Mat4,
    geometry: GeometryBuffers<D::Buffer>,
    program: ShaderProgram<D::Program>,
    texture: CubeTexture<D::Texture>,
    settings: SceneSettings,
    frames: u64,
}

impl<D: GraphicsDevice> RendererState<D> {
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Fixed at setup.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn texture_state(&self) -> LoadState {
        self.texture.state()
    }

    pub fn program(&self) -> &ShaderProgram<D::Program> {
        &self.program
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// A running cube renderer.
pub struct Renderer<D: GraphicsDevice> {
    device: D,
    state: RendererState<D>,
}

impl<D: GraphicsDevice> Renderer<D> {
    /// Build every GPU resource and enter the running state.
    ///
    /// On error nothing is returned to draw with, so no frame can be issued.
    pub fn start(
        mut device: D,
        settings: SceneSettings,
        viewport: Viewport,
        texture: TextureHandle,
    ) -> Result<Self, SetupError> {
        let projection = Projection::perspective(
            settings.fov_degrees,
            viewport.aspect(),
            settings.near,
            settings.far,
        )?;
        debug!(?projection, "projection fixed");

        let geometry = GeometryBuffers::build(&mut device);
        let program = ShaderProgram::build(&mut device, &settings.shader)?;
        let texture = CubeTexture::commit(texture);

        info!(
            width = viewport.width,
            height = viewport.height,
            texture = texture.label(),
            "renderer running"
        );

        Ok(Self {
            state: RendererState {
                transform: TransformState::new(settings.start_position),
                projection: projection.matrix(),
                geometry,
                program,
                texture,
                settings,
                frames: 0,
            },
            device,
        })
    }

    /// Advance the cube from `input`, then draw it into `target`.
    pub fn frame(&mut self, target: &D::Target<'_>, input: &InputState) {
        self.update(input);
        self.draw(target);
        self.state.frames += 1;
    }

    fn update(&mut self, input: &InputState) {
        let settings = &self.state.settings;
        self.state
            .transform
            .update(input, settings.move_speed, settings.rotate_speed);
    }

    fn draw(&mut self, target: &D::Target<'_>) {
        let state = &mut self.state;
        let model_view = state.transform.model_view_matrix();

        state
            .texture
            .poll(&mut self.device, state.program.handle());

        let call = DrawCall {
            clear: ClearState::color_and_depth(state.settings.clear_color, 1.0),
            program: state.program.handle(),
            positions: state.geometry.positions(),
            tex_coords: state.geometry.tex_coords(),
            projection: state.projection,
            model_view,
            texture: state.texture.bound(),
            vertex_count: state.geometry.vertex_count(),
        };
        self.device.draw(target, &call);
    }

    pub fn state(&self) -> &RendererState<D> {
        &self.state
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}
