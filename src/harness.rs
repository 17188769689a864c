//! Headless per-frame control loop.
//!
//! Frame order: input transitions, grab update, scene switching, clamped physics step,
//! overlay aggregation, HUD. The window host feeds snapshots in and paints the outputs.

use crate::camera3d::Camera3D;
use crate::config::AppConfig;
use crate::debug_draw::DebugDrawList;
use crate::debug_overlay::{DebugVisualizationAggregator, FrameContext};
use crate::grab::{GrabInput, PickAndDragController, PointerRay};
use crate::hud::{FrameRateCounter, HudLabel, HudText};
use crate::input::{Action, ActionBindings, InputEdgeTracker, InputSnapshot};
use crate::physics::PhysicsWorld;
use crate::scenes::{SceneKind, SceneLifecycleManager};
use crate::time::clamp_step;
use glam::Vec2;
use winit::dpi::PhysicalSize;

/// Insertion ordinals made static by the demo pin action.
pub const DEMO_PIN_ORDINALS: [usize; 2] = [8, 9];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    /// Step handed to the physics world; zero when the frame ended before stepping.
    pub step_dt: f32,
    pub exit: bool,
    pub hud_refreshed: bool,
    pub active_bodies: usize,
}

pub struct Harness<W: PhysicsWorld> {
    world: W,
    camera: Camera3D,
    viewport: PhysicalSize<u32>,
    bindings: ActionBindings,
    edges: InputEdgeTracker,
    grab: PickAndDragController,
    scenes: SceneLifecycleManager,
    overlay: DebugVisualizationAggregator,
    hud: HudText,
    fps: FrameRateCounter,
    draw_list: DebugDrawList,
    multithreaded: bool,
    max_step: f32,
    exit_requested: bool,
}

impl<W: PhysicsWorld> Harness<W> {
    pub fn new(world: W, config: &AppConfig, bindings: ActionBindings) -> Self {
        let start = match config.scene.as_deref() {
            Some(name) => match SceneKind::ALL.iter().position(|kind| Some(*kind) == SceneKind::from_name(name)) {
                Some(index) => index,
                None => {
                    log::warn!(target: "jenga_lab::scenes", "Unknown scene '{name}', starting with the first scene");
                    0
                }
            },
            None => 0,
        };
        Self::with_scenes(world, config, bindings, SceneLifecycleManager::new(SceneKind::ALL.to_vec(), start))
    }

    pub fn with_scenes(
        mut world: W,
        config: &AppConfig,
        bindings: ActionBindings,
        mut scenes: SceneLifecycleManager,
    ) -> Self {
        scenes.build_current(&mut world);
        Self {
            world,
            camera: Camera3D::from_config(&config.camera),
            viewport: PhysicalSize::new(config.window.width, config.window.height),
            bindings,
            edges: InputEdgeTracker::default(),
            grab: PickAndDragController::new(&config.grab),
            scenes,
            overlay: DebugVisualizationAggregator::new(&config.hud),
            hud: HudText::default(),
            fps: FrameRateCounter::default(),
            draw_list: DebugDrawList::default(),
            multithreaded: config.physics.multithreaded,
            max_step: config.physics.max_step,
            exit_requested: false,
        }
    }

    /// Runs one frame against `snapshot`; `dt` is the raw wall-clock delta.
    pub fn frame(&mut self, snapshot: InputSnapshot, dt: f32) -> FrameOutcome {
        self.edges.begin_frame(snapshot);
        let outcome = self.run_frame(dt);
        self.edges.end_frame();
        outcome
    }

    fn run_frame(&mut self, dt: f32) -> FrameOutcome {
        if self.pressed(Action::Exit) {
            log::info!(target: "jenga_lab::harness", "Exit requested");
            self.exit_requested = true;
            return FrameOutcome { exit: true, ..FrameOutcome::default() };
        }

        if self.pressed(Action::ToggleMultithreading) {
            self.multithreaded = !self.multithreaded;
            log::info!(target: "jenga_lab::harness", "Multithreaded stepping: {}", self.multithreaded);
        }

        let snapshot = self.edges.current();
        let grab_input = GrabInput {
            pressed: self.pressed(Action::Grab),
            held: self.edges.held(self.bindings.binding(Action::Grab)),
            ray: self.pointer_ray(Vec2::new(snapshot.pointer.0, snapshot.pointer.1)),
            scroll: snapshot.scroll,
        };
        self.grab.update(&mut self.world, grab_input);

        if self.pressed(Action::DemoPin) {
            self.demo_pin();
        }

        if self.pressed(Action::NextScene) {
            self.grab.release(&mut self.world);
            self.scenes.next(&mut self.world);
        }
        if self.pressed(Action::PreviousScene) {
            self.grab.release(&mut self.world);
            self.scenes.previous(&mut self.world);
        }

        let step_dt = clamp_step(dt, self.max_step);
        self.world.step(step_dt, self.multithreaded);

        self.draw_list.clear();
        let frame = FrameContext { dt, scene_name: self.scenes.current_name(), multithreaded: self.multithreaded };
        let report = self.overlay.aggregate(&self.world, frame, &mut self.draw_list, &mut self.hud);
        if let Some(scene) = self.scenes.active() {
            scene.draw(&self.world, &mut self.draw_list);
        }
        self.fps.tick(dt);

        FrameOutcome { step_dt, exit: false, hud_refreshed: report.hud_refreshed, active_bodies: report.active_bodies }
    }

    fn pressed(&self, action: Action) -> bool {
        self.edges.just_pressed(self.bindings.binding(action))
    }

    fn pointer_ray(&self, pointer: Vec2) -> Option<PointerRay> {
        self.camera
            .screen_ray(pointer, self.viewport)
            .map(|(origin, direction)| PointerRay { origin, direction })
    }

    /// Makes the bodies at fixed insertion ordinals static; missing ordinals are skipped.
    pub fn demo_pin(&mut self) {
        let bodies = self.world.bodies();
        for ordinal in DEMO_PIN_ORDINALS {
            if let Some(body) = bodies.get(ordinal) {
                self.world.set_body_static(body.id, true);
            }
        }
    }

    pub fn hud_labels(&self) -> Vec<HudLabel> {
        self.hud.layout(self.fps.rate())
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn scenes(&self) -> &SceneLifecycleManager {
        &self.scenes
    }

    pub fn grab(&self) -> &PickAndDragController {
        &self.grab
    }

    pub fn hud(&self) -> &HudText {
        &self.hud
    }

    pub fn draw_list(&self) -> &DebugDrawList {
        &self.draw_list
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.camera
    }

    pub fn viewport(&self) -> PhysicalSize<u32> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: PhysicalSize<u32>) {
        self.viewport = viewport;
    }

    pub fn multithreaded(&self) -> bool {
        self.multithreaded
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
