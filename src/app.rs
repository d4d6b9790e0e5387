//! Application event loop: window setup, input routing and the frame loop.
//!
//! The loop follows a fixed pattern each frame:
//! 1. Collect window/device events (camera keys, mouse deltas, overlay keys)
//! 2. Clamp settings and refresh the camera/projection from them
//! 3. Render the frame through the [`Renderer`]
//! 4. Present and request the next redraw
//!
//! Escape closes the settings overlay when it is open, otherwise it quits.
//! F1 or Q toggles the overlay; while it is open the cursor is released and
//! camera input is ignored.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use crate::context::Context;
use crate::renderer::{FrameStats, Renderer};
use crate::scene::material::{texture_group_layout, FallbackMaps};
use crate::scene::Scene;
use crate::settings::Settings;

/// Everything a scene constructor needs to upload geometry and materials.
pub struct SceneAssets<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub material_layout: &'a wgpu::BindGroupLayout,
    pub transform_layout: &'a wgpu::BindGroupLayout,
    pub fallbacks: &'a FallbackMaps,
}

/// Async scene constructor, resolved once the GPU context exists.
pub type SceneConstructor = Box<
    dyn for<'a> FnOnce(
        SceneAssets<'a>,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Scene>> + 'a>>,
>;

/// Callback drawing the settings overlay over the composited frame.
pub type OverlayFn = Box<dyn FnMut(&mut wgpu::RenderPass, &FrameStats)>;

/// Rolling frames-per-second counter for the overlay.
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: 0,
            elapsed: Duration::ZERO,
            fps: 0.0,
        }
    }

    /// Count one frame. Returns the refreshed rate once per second.
    pub fn tick(&mut self, dt: Duration) -> Option<f32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= Duration::from_secs(1) {
            self.fps = self.frames as f32 / self.elapsed.as_secs_f32();
            self.frames = 0;
            self.elapsed = Duration::ZERO;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

struct AppState {
    ctx: Context,
    renderer: Renderer,
    scene: Scene,
}

struct App {
    async_runtime: tokio::runtime::Runtime,
    constructor: Option<SceneConstructor>,
    state: Option<AppState>,
    settings: Settings,
    overlay: Option<OverlayFn>,
    overlay_open: bool,
    fps: FpsCounter,
    last_time: Instant,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(constructor: SceneConstructor, overlay: Option<OverlayFn>) -> anyhow::Result<Self> {
        Ok(Self {
            async_runtime: tokio::runtime::Runtime::new()?,
            constructor: Some(constructor),
            state: None,
            settings: Settings::default(),
            overlay,
            overlay_open: false,
            fps: FpsCounter::new(),
            last_time: Instant::now(),
            startup_error: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attributes = Window::default_attributes().with_title("hallway");
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let ctx = self
            .async_runtime
            .block_on(Context::new(window, &self.settings))?;
        let renderer = Renderer::new(&ctx.device, &ctx.config, &ctx.camera.bind_group_layout);

        let fallbacks = FallbackMaps::new(&ctx.device, &ctx.queue);
        let material_layout = texture_group_layout(&ctx.device);
        let constructor = self
            .constructor
            .take()
            .expect("scene constructor consumed twice");
        let scene = self.async_runtime.block_on(constructor(SceneAssets {
            device: &ctx.device,
            queue: &ctx.queue,
            material_layout: &material_layout,
            transform_layout: &renderer.transform_layout,
            fallbacks: &fallbacks,
        }))?;

        Ok(AppState {
            ctx,
            renderer,
            scene,
        })
    }

    /// Flip the overlay and hand the cursor to whichever side owns it now.
    fn set_overlay(&mut self, open: bool) {
        self.overlay_open = open;
        let Some(state) = &mut self.state else { return };
        state.ctx.camera.controller.enabled = !open;

        let window = state.ctx.window();
        if open {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("can't release cursor: {e}");
            }
            window.set_cursor_visible(true);
        } else {
            grab_cursor(window);
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => {
                if self.overlay_open {
                    self.set_overlay(false);
                } else {
                    event_loop.exit();
                }
            }
            KeyCode::F1 | KeyCode::KeyQ => self.set_overlay(!self.overlay_open),
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();

        let overlay_open = self.overlay_open;
        let Some(state) = &mut self.state else { return };

        self.settings.clamp();
        state
            .ctx
            .projection
            .set_fovy(cgmath::Deg(self.settings.fov_deg));
        state.ctx.update_camera(dt);
        for light in &mut state.scene.lights {
            light.apply_settings(&self.settings);
        }

        let overlay = if overlay_open {
            self.overlay.as_deref_mut()
        } else {
            None
        };
        match state
            .renderer
            .render(&state.ctx, &state.scene, &self.settings, overlay)
        {
            Ok(stats) => {
                if let Some(fps) = self.fps.tick(dt) {
                    log::debug!(
                        "{fps:.0} fps, {} scene / {} bright / {} blur draws",
                        stats.scene_draws,
                        stats.bright_draws,
                        stats.blur_draws
                    );
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window().inner_size();
                state.ctx.resize(size.width, size.height);
            }
            Err(e) => log::error!("unable to render: {e}"),
        }

        state.ctx.window().request_redraw();
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(state) => {
                grab_cursor(state.ctx.window());
                state.ctx.window().request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("startup failed: {e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else { return };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let Some(state) = &mut self.state {
            if !self.overlay_open {
                state.ctx.camera.controller.handle_window_events(&event);
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.ctx.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Open a window and drive the frame loop until the user quits.
///
/// The scene constructor runs once the GPU context is ready; the optional
/// overlay callback draws over the composited frame while the overlay is
/// toggled on. Fatal startup errors bubble out of this function.
pub fn run(constructor: SceneConstructor, overlay: Option<OverlayFn>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    // Test runs need an event loop off the main thread, which only the
    // Wayland/Windows backends allow.
    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::builder()
            .with_any_thread(true)
            .build()
            .expect("Failed to create an event loop")
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::builder()
            .with_any_thread(true)
            .build()
            .expect("Failed to create an event loop")
    };

    #[cfg(any(
        not(feature = "integration-tests"),
        not(any(target_os = "linux", target_os = "windows"))
    ))]
    let event_loop = EventLoop::new()?;

    let mut app = App::new(constructor, overlay)?;
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.startup_error.take() {
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::new();
        for _ in 0..59 {
            assert_eq!(counter.tick(Duration::from_millis(16)), None);
        }
        let fps = counter.tick(Duration::from_millis(60)).expect("one second elapsed");
        assert!((fps - 59.0).abs() < 5.0, "unexpected rate {fps}");
        assert_eq!(counter.fps(), fps);
    }

    #[test]
    fn fps_counter_resets_after_reporting() {
        let mut counter = FpsCounter::new();
        counter.tick(Duration::from_secs(2));
        assert_eq!(counter.tick(Duration::from_millis(1)), None);
    }
}
