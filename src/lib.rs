//! Texcube
//!
//! A keyboard-controlled, textured cube rendered with wgpu.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **context** - Core wgpu wrapper (Device, Queue)
//! 2. **core** - GPU primitives (buffers, textures, pipelines)
//! 3. **device** - The seam the renderer draws through, and its wgpu implementation
//! 4. **renderer** - Cube geometry, shader program, texture loading, transforms and the frame loop
//! 5. **window** - Window management with winit (feature = "window")

pub mod context;
pub mod core;
pub mod device;
pub mod error;
pub mod renderer;

#[cfg(feature = "window")]
pub mod window;

#[cfg(feature = "window")]
mod app;

// Re-export commonly used types
pub use context::WgpuContext;

pub use core::{
    ClearState, CullState, DepthState, DepthTexture, PipelineBuilder, RawUniformBuffer,
    RenderTarget, Texture2D, VertexBuffer, VertexP, VertexUv,
};

pub use device::{DrawCall, GraphicsDevice, WgpuDevice, WgpuProgram, WgpuTexture};

pub use error::{SetupError, ShaderError, ShaderStage, TextureError};

pub use renderer::{
    Control, ControlPair, CubeMesh, CubeTexture, DecodedImage, GeometryBuffers, InputState,
    LoadState, ProgramLayout, Projection, Renderer, RendererState, ResourceSlot, SceneSettings,
    ShaderProgram, ShaderSource, TextureHandle, TextureSender, TransformState, Viewport,
    CUBE_VERTEX_COUNT,
};

#[cfg(feature = "window")]
pub use window::{
    screen_target, FrameInput, FrameOutput, InputTracker, Key, KeyBindings, SetupInput, Window,
    WindowSettings,
};

#[cfg(feature = "window")]
pub use app::run;

// Re-export glam for convenience
pub use glam;
