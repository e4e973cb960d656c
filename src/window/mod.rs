//! Window management module
//!
//! Provides a convenient abstraction over winit for window creation and event handling.

pub mod event;
pub mod frame_io;
pub mod settings;

pub use event::{InputTracker, Key, KeyBindings};
pub use frame_io::{FrameInput, FrameOutput, Viewport};
pub use settings::WindowSettings;

use crate::context::WgpuContext;
use crate::core::texture::DepthTexture;
use crate::core::RenderTarget;
use crate::error::SetupError;
use std::sync::Arc;
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// What the setup callback gets once the GPU is ready.
pub struct SetupInput<'a> {
    /// The wgpu context.
    pub ctx: &'a WgpuContext,
    /// The surface format.
    pub surface_format: wgpu::TextureFormat,
    /// The initial viewport.
    pub viewport: Viewport,
}

/// A window with GPU rendering context.
pub struct Window {
    settings: WindowSettings,
}

impl Window {
    /// Create a new window with the given settings.
    pub fn new(settings: WindowSettings) -> Self {
        Self { settings }
    }

    /// Run the render loop.
    ///
    /// `setup` runs once the window and GPU exist. If it fails, the loop
    /// exits before any frame is drawn and its error is returned. `frame`
    /// then runs once per redraw.
    pub fn run<S, Setup, F>(self, setup: Setup, frame: F) -> anyhow::Result<()>
    where
        Setup: FnOnce(SetupInput<'_>) -> anyhow::Result<S>,
        F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput,
    {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            tracker: InputTracker::new(self.settings.bindings.clone()),
            settings: self.settings,
            setup: Some(setup),
            frame,
            state: None,
            graphics: None,
            error: None,
        };

        event_loop.run_app(&mut app)?;

        match app.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct Graphics {
    window: Arc<winit::window::Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    ctx: WgpuContext,
    depth_texture: DepthTexture,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> Result<Self, SetupError> {
        let window_attrs = winit::window::WindowAttributes::default()
            .with_title(&settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(settings.size.0, settings.size.1))
            .with_resizable(settings.resizable);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| SetupError::Graphics(format!("failed to create window: {e}")))?,
        );

        // Create wgpu instance and surface
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| SetupError::Graphics(format!("failed to create surface: {e}")))?;

        let (ctx, adapter) = WgpuContext::request_blocking(&instance, Some(&surface))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| SetupError::Graphics("surface supports no formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&ctx.device, &config);

        let depth_texture =
            DepthTexture::new(&ctx, config.width, config.height, Some("depth texture"));

        info!(?format, width = config.width, height = config.height, "surface configured");

        Ok(Self {
            window,
            surface,
            config,
            ctx,
            depth_texture,
        })
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.ctx.device, &self.config);
    }
}

struct App<S, Setup, F> {
    settings: WindowSettings,
    setup: Option<Setup>,
    frame: F,
    state: Option<S>,
    graphics: Option<Graphics>,
    tracker: InputTracker,
    error: Option<anyhow::Error>,
}

impl<S, Setup, F> App<S, Setup, F>
where
    Setup: FnOnce(SetupInput<'_>) -> anyhow::Result<S>,
    F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("setup failed: {e:#}");
        self.error = Some(e);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(graphics), Some(state)) = (&self.graphics, &mut self.state) else {
            return;
        };

        let surface_texture = match graphics.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost, reconfiguring");
                graphics.reconfigure();
                return;
            }
            Err(e) => {
                error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame_input = FrameInput {
            input: self.tracker.snapshot(),
            viewport: graphics.viewport(),
            ctx: &graphics.ctx,
            surface_view: &view,
            depth_texture: &graphics.depth_texture,
            surface_format: graphics.config.format,
        };

        let output = (self.frame)(state, frame_input);

        surface_texture.present();

        if output.exit {
            event_loop.exit();
        }
    }
}

impl<S, Setup, F> ApplicationHandler for App<S, Setup, F>
where
    Setup: FnOnce(SetupInput<'_>) -> anyhow::Result<S>,
    F: FnMut(&mut S, FrameInput<'_>) -> FrameOutput,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        let Some(setup) = self.setup.take() else {
            return;
        };

        let graphics = match Graphics::new(event_loop, &self.settings) {
            Ok(graphics) => graphics,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let input = SetupInput {
            ctx: &graphics.ctx,
            surface_format: graphics.config.format,
            viewport: graphics.viewport(),
        };

        match setup(input) {
            Ok(state) => self.state = Some(state),
            Err(e) => return self.fail(event_loop, e),
        }

        self.graphics = Some(graphics);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    graphics.config.width = size.width;
                    graphics.config.height = size.height;
                    graphics.reconfigure();
                    graphics
                        .depth_texture
                        .resize(&graphics.ctx, size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.tracker.release_all();
            }
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } => {
                let Some(key) = Key::from_winit(&key_event.logical_key) else {
                    return;
                };
                let pressed = key_event.state == ElementState::Pressed;
                if key == Key::Escape && pressed {
                    event_loop.exit();
                    return;
                }
                self.tracker.key(key, pressed);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}

/// Create a render target from frame input.
pub fn screen_target<'a>(input: &'a FrameInput<'a>) -> RenderTarget<'a> {
    RenderTarget::from_surface(
        input.surface_view,
        Some(input.depth_texture),
        input.viewport.width,
        input.viewport.height,
        input.surface_format,
    )
}
