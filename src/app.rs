//! Windowed cube viewer

use crate::device::WgpuDevice;
use crate::renderer::{Renderer, SceneSettings, TextureHandle};
use crate::window::{screen_target, FrameOutput, Window, WindowSettings};
use std::path::Path;
use tracing::info;

/// Open a window and spin the cube until it is closed.
///
/// Decoding of `texture_path` starts before the window opens; the cube is
/// drawn untextured until it finishes, and stays untextured if it fails.
pub fn run(
    window_settings: WindowSettings,
    scene_settings: SceneSettings,
    texture_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let texture = TextureHandle::begin_load(texture_path);
    info!(texture = texture.label(), "loading texture");

    Window::new(window_settings).run(
        move |setup| {
            let device = WgpuDevice::new(setup.ctx.clone(), setup.surface_format);
            let renderer = Renderer::start(device, scene_settings, setup.viewport, texture)?;
            Ok(renderer)
        },
        |renderer: &mut Renderer<WgpuDevice>, frame| {
            let target = screen_target(&frame);
            renderer.frame(&target, &frame.input);
            FrameOutput::new()
        },
    )
}
