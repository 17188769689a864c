//! Post-step walk over the engine's containers producing overlay geometry and HUD statistics.

use crate::config::HudConfig;
use crate::debug_draw::{colors, Color, DebugDrawer};
use crate::hud::HudText;
use crate::physics::{Aabb, PhysicsWorld};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

pub const PALETTE_SIZE: usize = 20;

const SEPARATOR: &str = "------------------------------";
const TIMING_FIRST_LINE: usize = 8;

/// Seeded colours, stable for the lifetime of the aggregator.
pub fn palette(seed: u64) -> Vec<Color> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..PALETTE_SIZE).map(|_| Color::new(rng.gen(), rng.gen(), rng.gen(), 1.0)).collect()
}

/// Physics frame rate implied by a step taking `total_ms`; infinite for a zero or unusable
/// total.
pub fn estimated_fps(total_ms: f64) -> f64 {
    if total_ms.is_finite() && total_ms > 0.0 {
        1000.0 / total_ms
    } else {
        f64::INFINITY
    }
}

/// Elapsed-time gate for HUD recomputation. The first tick is always due.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    interval: f32,
    elapsed: f32,
}

impl StatsAccumulator {
    pub fn new(interval: f32) -> Self {
        Self { interval, elapsed: interval }
    }

    pub fn tick(&mut self, dt: f32) -> bool {
        let due = self.elapsed >= self.interval;
        if due {
            self.elapsed = 0.0;
        }
        self.elapsed += dt;
        due
    }
}

/// Per-frame context the HUD needs besides the world itself.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub dt: f32,
    pub scene_name: &'a str,
    pub multithreaded: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayReport {
    pub active_bodies: usize,
    pub hud_refreshed: bool,
}

pub struct DebugVisualizationAggregator {
    palette: Vec<Color>,
    stats: StatsAccumulator,
    show_bodies: bool,
    show_islands: bool,
}

impl DebugVisualizationAggregator {
    pub fn new(config: &HudConfig) -> Self {
        Self {
            palette: palette(config.palette_seed),
            stats: StatsAccumulator::new(config.stats_interval),
            show_bodies: config.show_bodies,
            show_islands: config.show_islands,
        }
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn aggregate(
        &mut self,
        world: &dyn PhysicsWorld,
        frame: FrameContext<'_>,
        drawer: &mut dyn DebugDrawer,
        hud: &mut HudText,
    ) -> OverlayReport {
        for constraint in world.constraints() {
            constraint.debug_draw(drawer);
        }

        let bodies = world.bodies();
        let mut active_bodies = 0;
        for (counter, body) in bodies.iter().enumerate() {
            if self.show_bodies {
                body.debug_draw(drawer, self.palette[counter % self.palette.len()]);
            }
            if body.is_active {
                active_bodies += 1;
            }
        }

        let islands = world.islands();
        if self.show_islands {
            let aabbs: HashMap<_, _> = bodies.iter().map(|body| (body.id, body.aabb)).collect();
            for island in &islands {
                let bounds = island
                    .bodies
                    .iter()
                    .filter_map(|id| aabbs.get(id))
                    .fold(Aabb::EMPTY, |acc, aabb| acc.merged(aabb));
                if bounds.is_empty() {
                    continue;
                }
                let color = if island.is_active { colors::GREEN } else { colors::YELLOW };
                drawer.draw_aabb(bounds.min, bounds.max, color);
            }
        }

        for mesh in world.soft_bodies() {
            for [a, b, c] in mesh.triangles {
                drawer.draw_triangle(a, b, c, colors::CLOTH);
            }
        }

        let hud_refreshed = self.stats.tick(frame.dt);
        if hud_refreshed {
            write_stats(world, frame, bodies.len(), active_bodies, islands.len(), hud);
        }
        OverlayReport { active_bodies, hud_refreshed }
    }
}

fn write_stats(
    world: &dyn PhysicsWorld,
    frame: FrameContext<'_>,
    body_count: usize,
    active_bodies: usize,
    island_count: usize,
    hud: &mut HudText,
) {
    let arbiters = world.arbiters();
    let contacts: usize = arbiters.iter().map(|arbiter| arbiter.contact_count).sum();
    hud.set(0, format!("Current Scene: {}", frame.scene_name));
    hud.set(1, world.collision_system());
    hud.set(2, format!("Arbitercount: {}; Contactcount: {contacts}", arbiters.len()));
    hud.set(3, format!("Islandcount: {island_count}"));
    hud.set(4, format!("Bodycount: {body_count} ({active_bodies})"));
    hud.set(5, if frame.multithreaded { "Multithreaded" } else { "Single Threaded" });

    let timings = world.timings();
    let mut total = 0.0;
    for (i, phase) in timings.iter().enumerate() {
        hud.set(TIMING_FIRST_LINE + i, format!("{}: {:.2}", phase.label, phase.millis));
        total += phase.millis;
    }
    let n = timings.len();
    hud.set(TIMING_FIRST_LINE + n, SEPARATOR);
    hud.set(TIMING_FIRST_LINE + n + 1, format!("Total Physics Time: {total:.2}"));
    hud.set(TIMING_FIRST_LINE + n + 2, format!("Physics Framerate: {:.0} fps", estimated_fps(total)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug_draw::DebugDrawList;
    use crate::physics::{
        ArbiterState, BodyDesc, BodyId, BodyShape, BodyState, ConstraintDesc, ConstraintId, ConstraintState,
        IslandState, PhaseTiming, RaycastHit, SoftBodyMesh,
    };
    use glam::{Quat, Vec3};

    /// Canned world exposing fixed containers.
    #[derive(Default)]
    struct CannedWorld {
        bodies: Vec<BodyState>,
        islands: Vec<IslandState>,
        cloth: Vec<SoftBodyMesh>,
        arbiters: Vec<ArbiterState>,
        timings: Vec<PhaseTiming>,
    }

    impl PhysicsWorld for CannedWorld {
        fn step(&mut self, _dt: f32, _multithreaded: bool) {}
        fn add_body(&mut self, _desc: BodyDesc) -> BodyId {
            BodyId(0)
        }
        fn remove_body(&mut self, _body: BodyId) -> bool {
            false
        }
        fn add_constraint(&mut self, _desc: ConstraintDesc) -> Option<ConstraintId> {
            None
        }
        fn remove_constraint(&mut self, _constraint: ConstraintId) -> bool {
            false
        }
        fn clear(&mut self) {}
        fn raycast(&self, _o: Vec3, _r: Vec3, _f: &dyn Fn(&BodyState) -> bool) -> Option<RaycastHit> {
            None
        }
        fn body(&self, body: BodyId) -> Option<BodyState> {
            self.bodies.iter().copied().find(|b| b.id == body)
        }
        fn bodies(&self) -> Vec<BodyState> {
            self.bodies.clone()
        }
        fn wake_body(&mut self, _body: BodyId) {}
        fn damp_body_velocity(&mut self, _body: BodyId, _factor: f32) {}
        fn set_body_static(&mut self, _body: BodyId, _is_static: bool) {}
        fn set_constraint_target(&mut self, _constraint: ConstraintId, _target: Vec3) -> bool {
            false
        }
        fn constraints(&self) -> Vec<ConstraintState> {
            Vec::new()
        }
        fn islands(&self) -> Vec<IslandState> {
            self.islands.clone()
        }
        fn soft_bodies(&self) -> Vec<SoftBodyMesh> {
            self.cloth.clone()
        }
        fn arbiters(&self) -> Vec<ArbiterState> {
            self.arbiters.clone()
        }
        fn timings(&self) -> Vec<PhaseTiming> {
            self.timings.clone()
        }
        fn collision_system(&self) -> String {
            "canned sweep".to_string()
        }
    }

    fn cube(id: u64, x: f32, active: bool) -> BodyState {
        let position = Vec3::new(x, 0.5, 0.0);
        BodyState {
            id: BodyId(id),
            shape: BodyShape::Cuboid { half_extents: Vec3::splat(0.5) },
            position,
            rotation: Quat::IDENTITY,
            is_static: false,
            is_active: active,
            aabb: Aabb::new(position - 0.5, position + 0.5),
        }
    }

    fn frame(dt: f32) -> FrameContext<'static> {
        FrameContext { dt, scene_name: "Jenga", multithreaded: false }
    }

    #[test]
    fn islands_cloth_and_counts_are_aggregated() {
        let world = CannedWorld {
            bodies: vec![cube(0, 0.0, true), cube(1, 1.0, true), cube(2, 5.0, false)],
            islands: vec![
                IslandState { bodies: vec![BodyId(0), BodyId(1)], is_active: true },
                IslandState { bodies: vec![BodyId(2)], is_active: false },
            ],
            cloth: vec![SoftBodyMesh { triangles: vec![[Vec3::ZERO, Vec3::X, Vec3::Y]; 2] }],
            arbiters: vec![ArbiterState { body1: BodyId(0), body2: BodyId(1), contact_count: 4 }],
            timings: vec![
                PhaseTiming { label: "BroadPhase", millis: 0.5 },
                PhaseTiming { label: "Solver", millis: 1.5 },
            ],
        };
        let mut aggregator = DebugVisualizationAggregator::new(&HudConfig::default());
        let mut list = DebugDrawList::default();
        let mut hud = HudText::default();
        let report = aggregator.aggregate(&world, frame(0.016), &mut list, &mut hud);

        assert_eq!(report, OverlayReport { active_bodies: 2, hud_refreshed: true });
        assert_eq!(list.lines.len(), 3 * 12 + 2 * 12);
        let green = list.lines.iter().filter(|l| l.color == colors::GREEN).count();
        assert_eq!(green, 12);
        let island_right = list
            .lines
            .iter()
            .filter(|l| l.color == colors::GREEN)
            .map(|l| l.a.x.max(l.b.x))
            .fold(f32::MIN, f32::max);
        assert_eq!(island_right, 1.5);
        assert_eq!(list.triangles.len(), 2);
        assert!(list.triangles.iter().all(|t| t.color == colors::CLOTH));

        assert_eq!(hud.line(0), Some("Current Scene: Jenga"));
        assert_eq!(hud.line(1), Some("canned sweep"));
        assert_eq!(hud.line(2), Some("Arbitercount: 1; Contactcount: 4"));
        assert_eq!(hud.line(3), Some("Islandcount: 2"));
        assert_eq!(hud.line(4), Some("Bodycount: 3 (2)"));
        assert_eq!(hud.line(5), Some("Single Threaded"));
        assert_eq!(hud.line(8), Some("BroadPhase: 0.50"));
        assert_eq!(hud.line(9), Some("Solver: 1.50"));
        assert_eq!(hud.line(10), Some(SEPARATOR));
        assert_eq!(hud.line(11), Some("Total Physics Time: 2.00"));
        assert_eq!(hud.line(12), Some("Physics Framerate: 500 fps"));
    }

    #[test]
    fn zero_total_shows_infinite_rate() {
        let world = CannedWorld::default();
        let mut aggregator = DebugVisualizationAggregator::new(&HudConfig::default());
        let mut hud = HudText::default();
        aggregator.aggregate(&world, frame(0.016), &mut DebugDrawList::default(), &mut hud);
        assert_eq!(hud.line(8), Some(SEPARATOR));
        assert_eq!(hud.line(10), Some("Physics Framerate: inf fps"));
        assert!(estimated_fps(f64::NAN).is_infinite());
    }

    #[test]
    fn stats_gate_fires_once_per_interval() {
        let mut gate = StatsAccumulator::new(0.1);
        let fired = (0..20).filter(|_| gate.tick(0.005)).count();
        assert_eq!(fired, 1);
        let mut gate = StatsAccumulator::new(0.1);
        let fired = (0..10).filter(|_| gate.tick(0.06)).count();
        assert_eq!(fired, 5);
    }

    #[test]
    fn palette_is_stable_for_a_seed() {
        assert_eq!(palette(7), palette(7));
        assert_eq!(palette(7).len(), PALETTE_SIZE);
        assert_ne!(palette(7), palette(8));
    }
}
