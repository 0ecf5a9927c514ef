//! Native window and event loop
//!
//! Drives the game from winit: collects input, runs one tick per loop
//! iteration, then redraws. GPU resources live in a `Session` created on
//! the first `resumed` and dropped when the loop exits.

pub mod input;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Fullscreen, Window, WindowId};

use crate::consts::*;
use crate::renderer::{RenderBackend, Scene, WgpuBackend};
use crate::settings::Settings;
use crate::sim::{GameState, tick};
use input::{InputTracker, WindowCommand};

/// Open the window and play until it closes
pub fn run(settings: Settings) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        settings,
        runner: Runner::Uninitialized,
        error: None,
    };
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    settings: Settings,
    runner: Runner,
    /// Fatal error that stopped the loop
    error: Option<anyhow::Error>,
}

enum Runner {
    Uninitialized,
    Initialized(Session),
}

/// Everything that lives for one play session
struct Session {
    window: Arc<Window>,
    backend: WgpuBackend,
    scene: Scene,
    state: GameState,
    input: InputTracker,
    last_instant: Instant,
}

impl Session {
    fn new(event_loop: &ActiveEventLoop, settings: &Settings) -> anyhow::Result<Self> {
        let mut attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .with_resizable(true);
        if settings.start_fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let mut backend = pollster::block_on(WgpuBackend::new(
            window.clone(),
            size.width,
            size.height,
            settings.vsync,
        ))
        .context("failed to initialize renderer")?;
        let scene = Scene::new(&mut backend, settings.ball_segments)
            .context("failed to upload shapes")?;

        let seed = settings.seed_or_random();
        log::info!("Game initialized with seed: {}", seed);
        let mut state = GameState::new(seed);
        state.resize(size.width, size.height);

        Ok(Self {
            window,
            backend,
            scene,
            state,
            input: InputTracker::new(size.height),
            last_instant: Instant::now(),
        })
    }

    fn toggle_fullscreen(&self) {
        match self.window.fullscreen() {
            Some(_) => {
                log::info!("Leaving fullscreen");
                self.window.set_fullscreen(None);
            }
            None => {
                log::info!("Entering fullscreen");
                self.window
                    .set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Runner::Uninitialized = &self.runner else {
            return;
        };

        match Session::new(event_loop, &self.settings) {
            Ok(session) => {
                log::info!("Flick Pong running");
                self.runner = Runner::Initialized(session);
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Runner::Initialized(session) = &mut self.runner else {
            return;
        };

        let now = Instant::now();
        let dt = now.duration_since(session.last_instant).as_secs_f32() * 1000.0;
        session.last_instant = now;

        let input = session.input.take();
        for event in tick(&mut session.state, &input, dt) {
            log::debug!("{:?}", event);
        }

        session.window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Runner::Initialized(session) = &mut self.runner else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                session.backend.resize(size.width, size.height);
                session.input.resized(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                match session.input.key(code, event.state.is_pressed()) {
                    Some(WindowCommand::ToggleFullscreen) => session.toggle_fullscreen(),
                    Some(WindowCommand::Quit) => {
                        log::info!("Quit requested");
                        event_loop.exit();
                    }
                    None => {}
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                session
                    .input
                    .cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                session
                    .input
                    .primary_button(state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                session.window.pre_present_notify();
                if let Err(e) = session.scene.draw(&mut session.backend, &session.state) {
                    log::error!("Render error: {}", e);
                    self.error = Some(anyhow::Error::new(e).context("frame failed"));
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release GPU resources before the window goes away
        self.runner = Runner::Uninitialized;
        log::info!("Shut down");
    }
}
