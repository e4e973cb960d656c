//! Scene settings
//!
//! Configuration for the cube, its camera and its controls.

use super::program::ShaderSource;
use glam::Vec3;

/// Settings consumed by [`Renderer::start`](super::Renderer::start).
#[derive(Debug, Clone)]
pub struct SceneSettings {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Where the cube starts, relative to the viewer.
    pub start_position: Vec3,
    /// Distance moved per frame while a movement control is held.
    pub move_speed: f32,
    /// Radians rotated per frame while a rotation control is held.
    pub rotate_speed: f32,
    /// Colour the frame is cleared to.
    pub clear_color: [f32; 4],
    /// Cube shader stages.
    pub shader: ShaderSource<'static>,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
            start_position: Vec3::new(0.0, 0.0, -5.0),
            move_speed: 0.05,
            rotate_speed: 0.05,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            shader: ShaderSource::CUBE,
        }
    }
}

impl SceneSettings {
    /// Create new scene settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vertical field of view.
    pub fn fov_degrees(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    /// Set the near and far clipping planes.
    pub fn clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Set the starting position.
    pub fn start_position(mut self, position: Vec3) -> Self {
        self.start_position = position;
        self
    }

    /// Set the per-frame movement step.
    pub fn move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Set the per-frame rotation step.
    pub fn rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Set the clear colour.
    pub fn clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Replace the cube shader.
    pub fn shader(mut self, shader: ShaderSource<'static>) -> Self {
        self.shader = shader;
        self
    }
}
