use crate::config::{AppConfig, AppConfigOverrides};
use crate::debug_draw::colors;
use crate::harness::Harness;
use crate::input::{ActionBindings, Input, InputEvent};
use crate::physics::RapierWorld;
use crate::renderer::{paint_overlay, render_overlay, WindowSurface};
use crate::time::Time;

use anyhow::{Context, Result};
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};

use egui::Context as EguiCtx;
use egui_wgpu::{Renderer as EguiRenderer, RendererOptions, ScreenDescriptor};
use egui_winit::State as EguiWinit;

#[cfg(feature = "gamepad")]
use crate::input::GamepadPoller;

const APP_CONFIG_PATH: &str = "config/app.json";
const INPUT_CONFIG_PATH: &str = "config/input.json";
/// Radians of orbit per pixel of right-drag.
const ORBIT_SENSITIVITY: f32 = 0.005;

pub async fn run() -> Result<()> {
    run_with_overrides(AppConfigOverrides::default()).await
}

pub async fn run_with_overrides(overrides: AppConfigOverrides) -> Result<()> {
    let mut config = AppConfig::load_or_default(APP_CONFIG_PATH);
    if !overrides.is_empty() {
        log::info!(target: "jenga_lab::config", "CLI overrides: {}", overrides.applied_fields().join(", "));
    }
    config.apply_overrides(&overrides);
    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

pub struct App {
    surface: WindowSurface,
    harness: Harness<RapierWorld>,
    input: Input,
    #[cfg(feature = "gamepad")]
    gamepad: Option<GamepadPoller>,
    time: Time,
    should_close: bool,

    // egui
    egui_ctx: EguiCtx,
    egui_winit: Option<EguiWinit>,
    egui_renderer: Option<EguiRenderer>,
    egui_screen: Option<ScreenDescriptor>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let world = RapierWorld::new(&config.physics).context("Failed to create physics world")?;
        log::info!(target: "jenga_lab::physics", "Physics worker threads: {}", world.worker_threads());
        let bindings = ActionBindings::load_or_default(INPUT_CONFIG_PATH);
        let harness = Harness::new(world, &config, bindings);
        Ok(Self {
            surface: WindowSurface::new(&config.window),
            harness,
            input: Input::new(),
            #[cfg(feature = "gamepad")]
            gamepad: match GamepadPoller::new() {
                Ok(poller) => Some(poller),
                Err(err) => {
                    log::warn!(target: "jenga_lab::input", "{err:?}. Continuing without gamepad input.");
                    None
                }
            },
            time: Time::new(),
            should_close: false,
            egui_ctx: EguiCtx::default(),
            egui_winit: None,
            egui_renderer: None,
            egui_screen: None,
        })
    }

    fn update_camera(&mut self) {
        if self.input.right_held() {
            let (dx, dy) = self.input.mouse_delta;
            self.harness.camera_mut().orbit(Vec2::new(dx, dy) * ORBIT_SENSITIVITY);
        }
    }

    fn render(&mut self) -> Result<()> {
        let frame = self.surface.acquire_surface_frame()?;
        let (Some(window), Some(state)) = (self.surface.window(), self.egui_winit.as_mut()) else {
            frame.present();
            return Ok(());
        };
        let raw_input = state.take_egui_input(window);
        let labels = self.harness.hud_labels();
        let harness = &self.harness;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            paint_overlay(ctx, harness.camera(), harness.viewport(), harness.draw_list(), &labels);
        });
        let egui::FullOutput { platform_output, textures_delta, shapes, .. } = full_output;
        state.handle_platform_output(window, platform_output);

        let (Some(painter), Some(screen)) = (self.egui_renderer.as_mut(), self.egui_screen.as_ref()) else {
            frame.present();
            return Ok(());
        };
        let device = self.surface.device()?;
        let queue = self.surface.queue()?;
        for (id, delta) in &textures_delta.set {
            painter.update_texture(device, queue, *id, delta);
        }
        let meshes = self.egui_ctx.tessellate(shapes, screen.pixels_per_point);
        render_overlay(device, queue, painter, &meshes, screen, frame, colors::BACKGROUND)?;
        for id in &textures_delta.free {
            painter.free_texture(id);
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.surface.ensure_window(event_loop) {
            log::error!(target: "jenga_lab::renderer", "Renderer initialization error: {err:?}");
            self.should_close = true;
            return;
        }
        self.harness.set_viewport(self.surface.size());

        if self.egui_winit.is_none() {
            if let Some(window) = self.surface.window() {
                let state = EguiWinit::new(
                    self.egui_ctx.clone(),
                    egui::ViewportId::ROOT,
                    window,
                    Some(self.surface.pixels_per_point()),
                    window.theme(),
                    None,
                );
                self.egui_winit = Some(state);
            }
        }

        let egui_renderer = match (self.surface.device(), self.surface.surface_format()) {
            (Ok(device), Ok(format)) => EguiRenderer::new(device, format, RendererOptions::default()),
            (Err(err), _) | (_, Err(err)) => {
                log::error!(target: "jenga_lab::renderer", "Unable to initialize egui renderer: {err:?}");
                self.should_close = true;
                return;
            }
        };
        self.egui_renderer = Some(egui_renderer);
        let size = self.surface.size();
        self.egui_screen = Some(ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.surface.pixels_per_point(),
        });
    }

    fn window_event(&mut self, _el: &ActiveEventLoop, id: winit::window::WindowId, event: WindowEvent) {
        if let (Some(window), Some(state)) = (self.surface.window(), self.egui_winit.as_mut()) {
            if id == window.id() {
                let _ = state.on_window_event(window, &event);
            }
        }
        self.input.push(InputEvent::from_window_event(&event));

        match &event {
            WindowEvent::CloseRequested => self.should_close = true,
            WindowEvent::Resized(size) => {
                self.surface.resize(*size);
                self.harness.set_viewport(*size);
                if let Some(sd) = &mut self.egui_screen {
                    sd.size_in_pixels = [size.width, size.height];
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _e: &ActiveEventLoop, _dev: winit::event::DeviceId, ev: DeviceEvent) {
        self.input.push(InputEvent::from_device_event(&ev));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_close {
            event_loop.exit();
            return;
        }
        self.time.tick();
        let dt = self.time.delta_seconds();

        #[cfg(feature = "gamepad")]
        if let Some(gamepad) = self.gamepad.as_mut() {
            gamepad.poll(&mut self.input);
        }
        self.update_camera();
        let snapshot = self.input.snapshot();
        let outcome = self.harness.frame(snapshot, dt);
        if outcome.exit {
            self.should_close = true;
            event_loop.exit();
            return;
        }

        if let Err(err) = self.render() {
            log::warn!(target: "jenga_lab::renderer", "Render error: {err:?}");
        }
        if let Some(w) = self.surface.window() {
            w.request_redraw();
        }
        self.input.clear_frame();
    }
}
