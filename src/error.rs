//! Error types
//!
//! Setup can fail; the running frame loop cannot.

use std::fmt;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failure to compile, validate or link the cube shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to parse: {message}")]
    Parse { stage: ShaderStage, message: String },
    #[error("{stage} shader failed validation: {message}")]
    Validation { stage: ShaderStage, message: String },
    #[error("{stage} shader has no entry point `{name}`")]
    MissingEntryPoint { stage: ShaderStage, name: &'static str },
    #[error("vertex shader has no input named `{0}`")]
    MissingInput(&'static str),
    #[error("shader has no resource binding named `{0}`")]
    MissingBinding(&'static str),
    #[error("binding `{name}` is in bind group {found}, expected {expected}")]
    BindGroup {
        name: &'static str,
        expected: u32,
        found: u32,
    },
    #[error("binding `{name}` must be {expected}")]
    BindingType {
        name: &'static str,
        expected: &'static str,
    },
    #[error("program failed to link: {0}")]
    Link(String),
}

/// Failure while bringing the renderer from setup to running.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("graphics unavailable: {0}")]
    Graphics(String),
    #[error("invalid projection (fov {fov_degrees}°, aspect {aspect}, near {near}, far {far})")]
    InvalidProjection {
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Failure to produce texture pixels.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("pixel buffer of {len} bytes does not match a {width}x{height} RGBA8 image")]
    InvalidDimensions { width: u32, height: u32, len: usize },
    #[error("{width}x{height} image exceeds the device limit of {max} texels per side")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("texture upload failed: {0}")]
    Upload(String),
    #[error("texture source went away before delivering an image")]
    Disconnected,
}
