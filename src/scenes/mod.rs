//! Prebuilt scene configurations and the manager that cycles between them.

mod jenga;
mod pendulum;
mod pyramid;

use crate::debug_draw::DebugDrawer;
use crate::physics::{BodyDesc, BodyId, Material, PhysicsWorld};
use glam::Vec3;

pub use pendulum::Suspension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Jenga,
    Pyramid,
    Pendulum,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [SceneKind::Jenga, SceneKind::Pyramid, SceneKind::Pendulum];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Jenga => "Jenga",
            SceneKind::Pyramid => "Pyramid",
            SceneKind::Pendulum => "Pendulum",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn build(self, world: &mut dyn PhysicsWorld) -> BuiltScene {
        let ground = add_ground(world);
        let mut scene = BuiltScene { kind: self, ground, bodies: Vec::new(), suspensions: Vec::new() };
        match self {
            SceneKind::Jenga => jenga::build(world, &mut scene),
            SceneKind::Pyramid => pyramid::build(world, &mut scene),
            SceneKind::Pendulum => pendulum::build(world, &mut scene),
        }
        scene
    }
}

/// Handles of what a scene put into the world.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltScene {
    pub kind: SceneKind,
    pub ground: BodyId,
    /// Bodies other than the ground, in insertion order.
    pub bodies: Vec<BodyId>,
    pub suspensions: Vec<Suspension>,
}

impl BuiltScene {
    pub fn body_count(&self) -> usize {
        self.bodies.len() + 1
    }

    /// Extra per-frame primitives contributed by the scene.
    pub fn draw(&self, world: &dyn PhysicsWorld, drawer: &mut dyn DebugDrawer) {
        for suspension in &self.suspensions {
            suspension.draw(world, drawer);
        }
    }
}

/// Static 100x10x100 slab whose top face is the plane y = 0.
pub fn add_ground(world: &mut dyn PhysicsWorld) -> BodyId {
    world.add_body(
        BodyDesc::cuboid(Vec3::new(100.0, 10.0, 100.0))
            .at(Vec3::new(0.0, -5.0, 0.0))
            .fixed()
            .material(Material { restitution: 0.0, friction: 0.0 }),
    )
}

/// Owns the active scene index and rebuilds the world on transitions.
#[derive(Debug, Clone)]
pub struct SceneLifecycleManager {
    scenes: Vec<SceneKind>,
    index: usize,
    active: Option<BuiltScene>,
}

impl SceneLifecycleManager {
    pub fn new(scenes: Vec<SceneKind>, start: usize) -> Self {
        let index = if scenes.is_empty() { 0 } else { start % scenes.len() };
        Self { scenes, index, active: None }
    }

    pub fn with_all_scenes() -> Self {
        Self::new(SceneKind::ALL.to_vec(), 0)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn current(&self) -> Option<SceneKind> {
        self.scenes.get(self.index).copied()
    }

    pub fn current_name(&self) -> &'static str {
        self.current().map(SceneKind::name).unwrap_or("None")
    }

    pub fn active(&self) -> Option<&BuiltScene> {
        self.active.as_ref()
    }

    /// Builds the scene at the current index.
    pub fn build_current(&mut self, world: &mut dyn PhysicsWorld) {
        self.active = self.current().map(|kind| kind.build(world));
        if let Some(scene) = &self.active {
            log::info!(
                target: "jenga_lab::scenes",
                "Built scene '{}' with {} bodies",
                scene.kind.name(),
                scene.body_count()
            );
        }
    }

    pub fn next(&mut self, world: &mut dyn PhysicsWorld) {
        self.switch(world, 1);
    }

    pub fn previous(&mut self, world: &mut dyn PhysicsWorld) {
        self.switch(world, self.scenes.len().saturating_sub(1));
    }

    fn switch(&mut self, world: &mut dyn PhysicsWorld, offset: usize) {
        if self.scenes.is_empty() {
            return;
        }
        world.clear();
        self.active = None;
        self.index = (self.index + offset) % self.scenes.len();
        self.build_current(world);
    }
}
