//! Cube renderer
//!
//! Device-independent scene logic: geometry, program, texture, transform and
//! the frame loop that ties them together.

pub mod frame;
pub mod geometry;
pub mod input;
pub mod program;
pub mod settings;
pub mod texture;
pub mod transform;
pub mod viewer;

pub use frame::{Renderer, RendererState};
pub use geometry::{CubeMesh, GeometryBuffers, CUBE_VERTEX_COUNT};
pub use input::{Control, ControlPair, InputState};
pub use program::{ProgramLayout, ResourceSlot, ShaderProgram, ShaderSource};
pub use settings::SceneSettings;
pub use texture::{CubeTexture, DecodedImage, LoadState, TextureHandle, TextureSender};
pub use transform::TransformState;
pub use viewer::{Projection, Viewport};
