//! Boundary between the harness and the physics engine.
//!
//! Everything the control loop knows about the simulation goes through [`PhysicsWorld`]; the
//! rapier-backed implementation lives in [`rapier`]. Handles are opaque ids minted by the
//! world, never reused, so a stale id simply stops resolving once its body is gone.

pub mod rapier;

use crate::debug_draw::{Color, DebugDrawer};
use glam::{Quat, Vec3};

pub use rapier::RapierWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self { restitution: 0.0, friction: 0.5 }
    }
}

/// Construction parameters for a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: BodyShape,
    pub position: Vec3,
    pub rotation: Quat,
    pub is_static: bool,
    pub material: Material,
}

impl BodyDesc {
    /// Box with the given full edge lengths.
    pub fn cuboid(size: Vec3) -> Self {
        Self::with_shape(BodyShape::Cuboid { half_extents: size * 0.5 })
    }

    pub fn ball(radius: f32) -> Self {
        Self::with_shape(BodyShape::Ball { radius })
    }

    fn with_shape(shape: BodyShape) -> Self {
        Self {
            shape,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            is_static: false,
            material: Material::default(),
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box; merging anything into it yields that thing.
    pub const EMPTY: Aabb = Aabb { min: Vec3::splat(f32::MAX), max: Vec3::splat(f32::MIN) };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }
}

/// Snapshot of one rigid body as seen after the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub id: BodyId,
    pub shape: BodyShape,
    pub position: Vec3,
    pub rotation: Quat,
    pub is_static: bool,
    pub is_active: bool,
    pub aabb: Aabb,
}

impl BodyState {
    pub fn to_local(&self, world_point: Vec3) -> Vec3 {
        self.rotation.inverse() * (world_point - self.position)
    }

    pub fn to_world(&self, local_point: Vec3) -> Vec3 {
        self.position + self.rotation * local_point
    }

    /// Wireframe of the body's collision shape.
    pub fn debug_draw(&self, drawer: &mut dyn DebugDrawer, color: Color) {
        match self.shape {
            BodyShape::Cuboid { half_extents } => {
                let corners: Vec<Vec3> = (0..8)
                    .map(|i| {
                        let sign = Vec3::new(
                            if i & 1 == 0 { -1.0 } else { 1.0 },
                            if i & 2 == 0 { -1.0 } else { 1.0 },
                            if i & 4 == 0 { -1.0 } else { 1.0 },
                        );
                        self.to_world(half_extents * sign)
                    })
                    .collect();
                for (a, b) in BOX_EDGES {
                    drawer.draw_line(corners[a], corners[b], color);
                }
            }
            BodyShape::Ball { radius } => {
                const SEGMENTS: usize = 16;
                let axes = [(Vec3::X, Vec3::Y), (Vec3::Y, Vec3::Z), (Vec3::Z, Vec3::X)];
                for (u, v) in axes {
                    let point = |i: usize| {
                        let angle = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
                        self.to_world((u * angle.cos() + v * angle.sin()) * radius)
                    };
                    for i in 0..SEGMENTS {
                        drawer.draw_line(point(i), point(i + 1), color);
                    }
                }
            }
        }
    }
}

/// Corner index pairs of a box whose corners are enumerated by sign bits (x = bit 0, y = bit 1,
/// z = bit 2).
pub(crate) const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (0, 2),
    (1, 3),
    (4, 6),
    (5, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintDesc {
    /// Pins `local_anchor` (body frame) of a single body to a movable world-space target.
    PointOnPoint { body: BodyId, local_anchor: Vec3, target: Vec3 },
    /// Joins two bodies at a shared world-space point.
    BallSocket { body1: BodyId, body2: BodyId, world_anchor: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintGeometry {
    PointOnPoint { body: BodyId, body_anchor: Vec3, target: Vec3 },
    BallSocket { body1: BodyId, body2: BodyId, center1: Vec3, center2: Vec3, anchor1: Vec3, anchor2: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintState {
    pub id: ConstraintId,
    pub geometry: ConstraintGeometry,
}

const CONSTRAINT_COLOR: Color = Color::new(1.0, 0.35, 0.1, 1.0);
const ANCHOR_MARK: f32 = 0.15;

impl ConstraintState {
    pub fn involves(&self, body: BodyId) -> bool {
        match self.geometry {
            ConstraintGeometry::PointOnPoint { body: b, .. } => b == body,
            ConstraintGeometry::BallSocket { body1, body2, .. } => body1 == body || body2 == body,
        }
    }

    pub fn debug_draw(&self, drawer: &mut dyn DebugDrawer) {
        match self.geometry {
            ConstraintGeometry::PointOnPoint { body_anchor, target, .. } => {
                drawer.draw_line(body_anchor, target, CONSTRAINT_COLOR);
                draw_cross(drawer, target, CONSTRAINT_COLOR);
            }
            ConstraintGeometry::BallSocket { center1, center2, anchor1, anchor2, .. } => {
                drawer.draw_line(center1, anchor1, CONSTRAINT_COLOR);
                drawer.draw_line(center2, anchor2, CONSTRAINT_COLOR);
                draw_cross(drawer, anchor1, CONSTRAINT_COLOR);
            }
        }
    }
}

fn draw_cross(drawer: &mut dyn DebugDrawer, at: Vec3, color: Color) {
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        drawer.draw_line(at - axis * ANCHOR_MARK, at + axis * ANCHOR_MARK, color);
    }
}

/// Connected group of interacting dynamic bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct IslandState {
    pub bodies: Vec<BodyId>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftBodyMesh {
    pub triangles: Vec<[Vec3; 3]>,
}

/// Persistent contact relationship between two bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbiterState {
    pub body1: BodyId,
    pub body2: BodyId,
    pub contact_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTiming {
    pub label: &'static str,
    pub millis: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub body: BodyId,
    pub normal: Vec3,
    /// Position of the hit along the cast ray, in units of the ray's length.
    pub fraction: f32,
}

/// Operations the harness consumes from a physics engine.
pub trait PhysicsWorld {
    /// Advances the simulation. `multithreaded` is a hint the engine may ignore.
    fn step(&mut self, dt: f32, multithreaded: bool);

    fn add_body(&mut self, desc: BodyDesc) -> BodyId;

    /// Removes the body and every constraint attached to it.
    fn remove_body(&mut self, body: BodyId) -> bool;

    /// Returns `None` when a referenced body does not exist.
    fn add_constraint(&mut self, desc: ConstraintDesc) -> Option<ConstraintId>;

    fn remove_constraint(&mut self, constraint: ConstraintId) -> bool;

    /// Drops every body, constraint and soft body.
    fn clear(&mut self);

    /// Nearest hit along `origin + t * ray` for `t` in `[0, 1]` among bodies accepted by
    /// `filter`.
    fn raycast(&self, origin: Vec3, ray: Vec3, filter: &dyn Fn(&BodyState) -> bool) -> Option<RaycastHit>;

    fn body(&self, body: BodyId) -> Option<BodyState>;

    /// All bodies in insertion order.
    fn bodies(&self) -> Vec<BodyState>;

    fn wake_body(&mut self, body: BodyId);

    fn damp_body_velocity(&mut self, body: BodyId, factor: f32);

    fn set_body_static(&mut self, body: BodyId, is_static: bool);

    fn set_constraint_target(&mut self, constraint: ConstraintId, target: Vec3) -> bool;

    fn constraints(&self) -> Vec<ConstraintState>;

    fn islands(&self) -> Vec<IslandState>;

    fn soft_bodies(&self) -> Vec<SoftBodyMesh> {
        Vec::new()
    }

    fn arbiters(&self) -> Vec<ArbiterState>;

    /// Per-phase timings of the last step.
    fn timings(&self) -> Vec<PhaseTiming>;

    /// Human readable name of the broad-phase strategy.
    fn collision_system(&self) -> String;
}
