//! Pointer-driven pick and drag of dynamic bodies.
//!
//! A grab pins a point of the picked body to a world-space target with a point-on-point
//! constraint. The target rides along the pointer ray at a fixed depth which the scroll
//! wheel pushes and pulls.

use crate::config::GrabConfig;
use crate::physics::{BodyId, ConstraintDesc, ConstraintId, PhysicsWorld};
use glam::Vec3;

/// Camera ray through the pointer; `direction` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Exists only between grab begin and grab end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabState {
    pub body: BodyId,
    /// Anchor in the body's frame, fixed at grab time.
    pub local_anchor: Vec3,
    pub target: Vec3,
    pub depth: f32,
    pub scroll_baseline: f32,
    pub constraint: ConstraintId,
}

/// Per-frame grab inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabInput {
    pub pressed: bool,
    pub held: bool,
    pub ray: Option<PointerRay>,
    pub scroll: f32,
}

#[derive(Debug, Clone)]
pub struct PickAndDragController {
    config: GrabConfig,
    state: Option<GrabState>,
}

impl PickAndDragController {
    pub fn new(config: &GrabConfig) -> Self {
        Self { config: config.clone(), state: None }
    }

    pub fn state(&self) -> Option<&GrabState> {
        self.state.as_ref()
    }

    pub fn is_grabbing(&self) -> bool {
        self.state.is_some()
    }

    pub fn update(&mut self, world: &mut dyn PhysicsWorld, input: GrabInput) {
        if input.pressed {
            self.release(world);
            if let Some(ray) = input.ray {
                self.begin(world, ray, input.scroll);
            }
        }
        if self.state.is_none() {
            return;
        }
        if !input.held {
            self.release(world);
            return;
        }
        self.drag(world, input.ray, input.scroll);
    }

    /// Picks the nearest non-static body along the ray. Returns false and leaves the world
    /// untouched on a miss.
    pub fn begin(&mut self, world: &mut dyn PhysicsWorld, ray: PointerRay, scroll: f32) -> bool {
        let cast = ray.direction * self.config.ray_length;
        let Some(hit) = world.raycast(ray.origin, cast, &|body| !body.is_static) else {
            return false;
        };
        let Some(body) = world.body(hit.body) else {
            return false;
        };
        let hit_point = ray.origin + cast * hit.fraction;
        let local_anchor = body.to_local(hit_point);
        let Some(constraint) =
            world.add_constraint(ConstraintDesc::PointOnPoint { body: hit.body, local_anchor, target: hit_point })
        else {
            return false;
        };
        log::debug!(target: "jenga_lab::grab", "Grabbed {:?} at {hit_point}", hit.body);
        self.state = Some(GrabState {
            body: hit.body,
            local_anchor,
            target: hit_point,
            depth: (hit_point - ray.origin).length(),
            scroll_baseline: scroll,
            constraint,
        });
        true
    }

    /// Deregisters the grab constraint if one is alive. No-op when idle.
    pub fn release(&mut self, world: &mut dyn PhysicsWorld) {
        if let Some(state) = self.state.take() {
            world.remove_constraint(state.constraint);
            log::debug!(target: "jenga_lab::grab", "Released {:?}", state.body);
        }
    }

    fn drag(&mut self, world: &mut dyn PhysicsWorld, ray: Option<PointerRay>, scroll: f32) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(body) = world.body(state.body) else {
            self.release(world);
            return;
        };
        state.depth += (scroll - state.scroll_baseline) * self.config.scroll_sensitivity;
        state.scroll_baseline = scroll;
        if let Some(ray) = ray {
            state.target = ray.origin + ray.direction * state.depth;
        }
        world.set_constraint_target(state.constraint, state.target);
        world.wake_body(state.body);
        if !body.is_static {
            world.damp_body_velocity(state.body, self.config.damping);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::physics::{
        ArbiterState, BodyDesc, BodyState, ConstraintState, IslandState, PhaseTiming, RapierWorld, RaycastHit,
    };

    fn down_ray() -> PointerRay {
        PointerRay { origin: Vec3::new(0.0, 10.0, 0.0), direction: Vec3::NEG_Y }
    }

    fn press(ray: PointerRay, scroll: f32) -> GrabInput {
        GrabInput { pressed: true, held: true, ray: Some(ray), scroll }
    }

    fn world_with_crate() -> (RapierWorld, BodyId) {
        let mut world = RapierWorld::new(&PhysicsConfig::default()).expect("world");
        world.add_body(BodyDesc::cuboid(Vec3::new(100.0, 10.0, 100.0)).at(Vec3::new(0.0, -5.0, 0.0)).fixed());
        let body = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 0.5, 0.0)));
        (world, body)
    }

    #[test]
    fn grab_records_hit_in_body_frame() {
        let (mut world, body) = world_with_crate();
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        grab.update(&mut world, press(down_ray(), 0.0));
        let state = grab.state().expect("grabbed");
        assert_eq!(state.body, body);
        assert!((state.local_anchor - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-3);
        assert!((state.depth - 9.0).abs() < 1e-3);
        assert_eq!(world.constraints().len(), 1);
    }

    #[test]
    fn static_only_hit_leaves_world_untouched() {
        let (mut world, _) = world_with_crate();
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        let beside = PointerRay { origin: Vec3::new(5.0, 10.0, 0.0), direction: Vec3::NEG_Y };
        grab.update(&mut world, press(beside, 0.0));
        assert!(!grab.is_grabbing());
        assert!(world.constraints().is_empty());
    }

    #[test]
    fn scroll_moves_target_along_ray() {
        let (mut world, _) = world_with_crate();
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        grab.update(&mut world, press(down_ray(), 240.0));
        grab.update(&mut world, GrabInput { pressed: false, held: true, ray: Some(down_ray()), scroll: 360.0 });
        let state = grab.state().expect("still grabbing");
        assert!((state.depth - 10.2).abs() < 1e-3);
        assert_eq!(state.scroll_baseline, 360.0);
        assert!((state.target - Vec3::new(0.0, -0.2, 0.0)).length() < 1e-3);
    }

    #[test]
    fn release_removes_constraint_once() {
        let (mut world, _) = world_with_crate();
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        grab.update(&mut world, press(down_ray(), 0.0));
        let constraint = grab.state().expect("grabbed").constraint;
        grab.update(&mut world, GrabInput { pressed: false, held: false, ray: Some(down_ray()), scroll: 0.0 });
        assert!(!grab.is_grabbing());
        assert!(world.constraints().is_empty());
        assert!(!world.remove_constraint(constraint), "constraint already gone");
        grab.release(&mut world);
    }

    #[test]
    fn removed_body_resets_grab() {
        let (mut world, body) = world_with_crate();
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        grab.update(&mut world, press(down_ray(), 0.0));
        world.remove_body(body);
        grab.update(&mut world, GrabInput { pressed: false, held: true, ray: Some(down_ray()), scroll: 0.0 });
        assert!(!grab.is_grabbing());
        assert!(world.constraints().is_empty());
    }

    #[test]
    fn regrab_replaces_previous_constraint() {
        let (mut world, _) = world_with_crate();
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        grab.update(&mut world, press(down_ray(), 0.0));
        let first = grab.state().expect("first grab").constraint;
        grab.update(&mut world, press(down_ray(), 0.0));
        let second = grab.state().expect("second grab").constraint;
        assert_ne!(first, second);
        assert_eq!(world.constraints().len(), 1);
    }

    /// Rapier world that remembers the wake and damping calls it receives.
    struct RecordingWorld {
        inner: RapierWorld,
        woken: Vec<BodyId>,
        damped: Vec<(BodyId, f32)>,
    }

    impl PhysicsWorld for RecordingWorld {
        fn step(&mut self, dt: f32, multithreaded: bool) {
            self.inner.step(dt, multithreaded)
        }
        fn add_body(&mut self, desc: BodyDesc) -> BodyId {
            self.inner.add_body(desc)
        }
        fn remove_body(&mut self, body: BodyId) -> bool {
            self.inner.remove_body(body)
        }
        fn add_constraint(&mut self, desc: ConstraintDesc) -> Option<ConstraintId> {
            self.inner.add_constraint(desc)
        }
        fn remove_constraint(&mut self, constraint: ConstraintId) -> bool {
            self.inner.remove_constraint(constraint)
        }
        fn clear(&mut self) {
            self.inner.clear()
        }
        fn raycast(&self, origin: Vec3, ray: Vec3, filter: &dyn Fn(&BodyState) -> bool) -> Option<RaycastHit> {
            self.inner.raycast(origin, ray, filter)
        }
        fn body(&self, body: BodyId) -> Option<BodyState> {
            self.inner.body(body)
        }
        fn bodies(&self) -> Vec<BodyState> {
            self.inner.bodies()
        }
        fn wake_body(&mut self, body: BodyId) {
            self.woken.push(body);
            self.inner.wake_body(body)
        }
        fn damp_body_velocity(&mut self, body: BodyId, factor: f32) {
            self.damped.push((body, factor));
            self.inner.damp_body_velocity(body, factor)
        }
        fn set_body_static(&mut self, body: BodyId, is_static: bool) {
            self.inner.set_body_static(body, is_static)
        }
        fn set_constraint_target(&mut self, constraint: ConstraintId, target: Vec3) -> bool {
            self.inner.set_constraint_target(constraint, target)
        }
        fn constraints(&self) -> Vec<ConstraintState> {
            self.inner.constraints()
        }
        fn islands(&self) -> Vec<IslandState> {
            self.inner.islands()
        }
        fn arbiters(&self) -> Vec<ArbiterState> {
            self.inner.arbiters()
        }
        fn timings(&self) -> Vec<PhaseTiming> {
            self.inner.timings()
        }
        fn collision_system(&self) -> String {
            self.inner.collision_system()
        }
    }

    fn held(ray: PointerRay) -> GrabInput {
        GrabInput { pressed: false, held: true, ray: Some(ray), scroll: 0.0 }
    }

    #[test]
    fn held_body_is_woken_and_damped_each_frame() {
        let (inner, body) = world_with_crate();
        let mut world = RecordingWorld { inner, woken: Vec::new(), damped: Vec::new() };
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        grab.update(&mut world, press(down_ray(), 0.0));
        for _ in 0..3 {
            grab.update(&mut world, held(down_ray()));
        }
        assert_eq!(world.woken, vec![body; 4]);
        assert_eq!(world.damped, vec![(body, 0.98); 4]);
    }

    #[test]
    fn pinned_body_is_woken_but_not_damped() {
        let (inner, body) = world_with_crate();
        let mut world = RecordingWorld { inner, woken: Vec::new(), damped: Vec::new() };
        let mut grab = PickAndDragController::new(&GrabConfig::default());
        grab.update(&mut world, press(down_ray(), 0.0));
        world.set_body_static(body, true);
        world.woken.clear();
        world.damped.clear();
        grab.update(&mut world, held(down_ray()));
        grab.update(&mut world, held(down_ray()));
        assert!(grab.is_grabbing());
        assert_eq!(world.woken, vec![body; 2]);
        assert!(world.damped.is_empty());
    }
}
