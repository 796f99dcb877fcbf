//! Application event loop.
//!
//! [`App`] owns the window, the GPU context and the per-frame state. Each
//! redraw follows the same order:
//! 1. Measure the time since the previous frame
//! 2. Fire the actions of all held keys
//! 3. Render and present the frame
//! 4. Stop if a close was requested, otherwise ask for the next redraw
//!
//! Raw mouse motion and scroll events are applied to the camera as they arrive.

use std::{process::ExitCode, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window},
};

use crate::{
    context::{Context, Settings},
    data_structures::scene::{self, SceneEntry},
    input::{self, FrameState, HeldKeys, KeyBindings},
    render,
};

pub struct AppState {
    pub(crate) ctx: Context,
    scene: Vec<SceneEntry>,
    frame: FrameState,
    held: HeldKeys,
    bindings: KeyBindings,
}

impl AppState {
    async fn new(window: Arc<Window>, settings: Settings) -> anyhow::Result<Self> {
        let scene = scene::diorama();
        let frame = FrameState::new();
        let ctx = Context::new(window, settings, &scene).await?;
        Ok(Self {
            ctx,
            scene,
            frame,
            held: HeldKeys::default(),
            bindings: KeyBindings::default(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            log::debug!("surface resized to {width}x{height}");
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        render::render_frame(&mut self.ctx, &self.scene, self.frame.projection, self.frame.uv_scale)
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    settings: Settings,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
    last_time: Instant,
}

impl App {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            settings,
            state: None,
            error: None,
            last_time: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        capture_cursor(&window);

        let settings = self.settings.clone();
        let state = self.async_runtime.block_on(AppState::new(window, settings))?;
        log::info!("scene ready with {} entries", state.scene.len());
        Ok(state)
    }
}

/// Hide the cursor and keep it inside the window.
fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(e) = grabbed {
        log::warn!("could not capture the cursor: {e}");
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
                state.ctx.window.request_redraw();
                self.state = Some(state);
                self.last_time = Instant::now();
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::Focused(false) => state.held.clear(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    state.held.update(code, event.state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                state.frame.cursor.on_cursor_moved(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state
                    .ctx
                    .camera
                    .camera
                    .process_mouse_scroll(input::scroll_lines(delta));
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => input::log_mouse_button(button, button_state),
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                state.frame.delta_time = now - self.last_time;
                self.last_time = now;

                state
                    .frame
                    .process_held_keys(&state.bindings, &state.held, &mut state.ctx.camera.camera);

                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        log::warn!("surface lost, reconfiguring");
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }

                if state.frame.close_requested {
                    event_loop.exit();
                } else {
                    state.ctx.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            state
                .frame
                .process_mouse_motion(delta, &mut state.ctx.camera.camera);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state.take().is_some() {
            log::info!("shutting down");
        }
    }
}

/// Open the window, run until closed, and report the first startup error.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    let logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
    if let Err(e) = logger {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Log a failed run and turn the outcome into the process exit status.
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_error_fails_the_process() {
        let error = anyhow::anyhow!("missing texture").context("loading materials");
        assert_eq!(exit_code(Err(error)), ExitCode::FAILURE);
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
    }
}
