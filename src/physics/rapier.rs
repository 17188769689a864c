use super::{
    Aabb, ArbiterState, BodyDesc, BodyId, BodyShape, BodyState, ConstraintDesc, ConstraintGeometry,
    ConstraintId, ConstraintState, IslandState, PhaseTiming, PhysicsWorld, RaycastHit,
};
use crate::config::PhysicsConfig;
use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::{
    CCDSolver, Collider, ColliderBuilder, ColliderHandle, ColliderSet, DefaultBroadPhase, ImpulseJointHandle,
    ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    QueryFilter, QueryPipeline, Ray, Real, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
    RigidBodyType, SphericalJointBuilder, Vector,
};
use std::collections::{BTreeMap, HashMap};

struct BodyRecord {
    handle: RigidBodyHandle,
    shape: BodyShape,
}

enum ConstraintRecord {
    /// Spherical joint between the body and an invisible kinematic body that carries the target.
    PointOnPoint { joint: ImpulseJointHandle, anchor_body: RigidBodyHandle, body: BodyId, local_anchor: Vec3 },
    BallSocket { joint: ImpulseJointHandle, body1: BodyId, body2: BodyId, local1: Vec3, local2: Vec3 },
}

impl ConstraintRecord {
    fn joint(&self) -> ImpulseJointHandle {
        match self {
            ConstraintRecord::PointOnPoint { joint, .. } | ConstraintRecord::BallSocket { joint, .. } => *joint,
        }
    }

    fn involves(&self, id: BodyId) -> bool {
        match self {
            ConstraintRecord::PointOnPoint { body, .. } => *body == id,
            ConstraintRecord::BallSocket { body1, body2, .. } => *body1 == id || *body2 == id,
        }
    }
}

/// [`PhysicsWorld`] backed by rapier3d.
pub struct RapierWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    records: BTreeMap<BodyId, BodyRecord>,
    handle_ids: HashMap<RigidBodyHandle, BodyId>,
    constraints: BTreeMap<ConstraintId, ConstraintRecord>,
    next_body: u64,
    next_constraint: u64,
    allow_sleep: bool,
    serial_pool: rayon::ThreadPool,
    parallel_pool: rayon::ThreadPool,
}

impl RapierWorld {
    pub fn new(config: &PhysicsConfig) -> Result<Self> {
        let serial_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .thread_name(|i| format!("physics-serial-{i}"))
            .build()
            .context("Failed to build single-threaded physics pool")?;
        let parallel_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("physics-worker-{i}"))
            .build()
            .context("Failed to build physics worker pool")?;
        let mut pipeline = PhysicsPipeline::new();
        pipeline.counters.enable();
        Ok(Self {
            pipeline,
            gravity: to_na(Vec3::from(config.gravity)),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            records: BTreeMap::new(),
            handle_ids: HashMap::new(),
            constraints: BTreeMap::new(),
            next_body: 0,
            next_constraint: 0,
            allow_sleep: config.allow_sleep,
            serial_pool,
            parallel_pool,
        })
    }

    /// Worker count used when stepping in multithreaded mode.
    pub fn worker_threads(&self) -> usize {
        self.parallel_pool.current_num_threads()
    }

    fn handle(&self, id: BodyId) -> Option<RigidBodyHandle> {
        self.records.get(&id).map(|record| record.handle)
    }

    fn body_id_of_collider(&self, collider: ColliderHandle) -> Option<BodyId> {
        let parent = self.colliders.get(collider)?.parent()?;
        self.handle_ids.get(&parent).copied()
    }

    fn snapshot(&self, id: BodyId, record: &BodyRecord) -> Option<BodyState> {
        let body = self.bodies.get(record.handle)?;
        Some(body_state(id, record.shape, body, self.body_aabb(body)))
    }

    fn body_aabb(&self, body: &RigidBody) -> Aabb {
        body.colliders().iter().filter_map(|handle| self.colliders.get(*handle)).fold(Aabb::EMPTY, |acc, c| {
            let aabb = c.compute_aabb();
            acc.merged(&Aabb::new(from_na_point(&aabb.mins), from_na_point(&aabb.maxs)))
        })
    }

    fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    fn remove_rapier_body(&mut self, handle: RigidBodyHandle) {
        let _ = self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn drop_constraint_record(&mut self, record: ConstraintRecord) {
        self.impulse_joints.remove(record.joint(), true);
        if let ConstraintRecord::PointOnPoint { anchor_body, .. } = record {
            self.remove_rapier_body(anchor_body);
        }
    }
}

impl PhysicsWorld for RapierWorld {
    fn step(&mut self, dt: f32, multithreaded: bool) {
        self.integration_parameters.dt = dt;
        let pool = if multithreaded { &self.parallel_pool } else { &self.serial_pool };
        let pipeline = &mut self.pipeline;
        let gravity = &self.gravity;
        let params = &self.integration_parameters;
        let islands = &mut self.island_manager;
        let broad_phase = &mut self.broad_phase;
        let narrow_phase = &mut self.narrow_phase;
        let bodies = &mut self.bodies;
        let colliders = &mut self.colliders;
        let impulse_joints = &mut self.impulse_joints;
        let multibody_joints = &mut self.multibody_joints;
        let ccd_solver = &mut self.ccd_solver;
        let query_pipeline = &mut self.query_pipeline;
        pool.install(move || {
            let hooks = ();
            let events = ();
            pipeline.step(
                gravity,
                params,
                islands,
                broad_phase,
                narrow_phase,
                bodies,
                colliders,
                impulse_joints,
                multibody_joints,
                ccd_solver,
                Some(query_pipeline),
                &hooks,
                &events,
            );
        });
        self.refresh_queries();
    }

    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let builder = if desc.is_static { RigidBodyBuilder::fixed() } else { RigidBodyBuilder::dynamic() };
        let body = builder.position(to_isometry(desc.position, desc.rotation)).can_sleep(self.allow_sleep).build();
        let handle = self.bodies.insert(body);
        let collider = match desc.shape {
            BodyShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            BodyShape::Ball { radius } => ColliderBuilder::ball(radius),
        }
        .restitution(desc.material.restitution)
        .friction(desc.material.friction)
        .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.records.insert(id, BodyRecord { handle, shape: desc.shape });
        self.handle_ids.insert(handle, id);
        self.refresh_queries();
        id
    }

    fn remove_body(&mut self, body: BodyId) -> bool {
        let Some(record) = self.records.remove(&body) else {
            return false;
        };
        self.handle_ids.remove(&record.handle);
        let attached: Vec<ConstraintId> =
            self.constraints.iter().filter(|(_, c)| c.involves(body)).map(|(id, _)| *id).collect();
        for id in attached {
            if let Some(constraint) = self.constraints.remove(&id) {
                self.drop_constraint_record(constraint);
            }
        }
        self.remove_rapier_body(record.handle);
        self.refresh_queries();
        true
    }

    fn add_constraint(&mut self, desc: ConstraintDesc) -> Option<ConstraintId> {
        let record = match desc {
            ConstraintDesc::PointOnPoint { body, local_anchor, target } => {
                let handle = self.handle(body)?;
                let anchor_body = self.bodies.insert(
                    RigidBodyBuilder::kinematic_position_based().translation(to_na(target)).build(),
                );
                let joint = SphericalJointBuilder::new()
                    .local_anchor1(Point3::origin())
                    .local_anchor2(to_na_point(local_anchor))
                    .contacts_enabled(false)
                    .build();
                let joint = self.impulse_joints.insert(anchor_body, handle, joint, true);
                ConstraintRecord::PointOnPoint { joint, anchor_body, body, local_anchor }
            }
            ConstraintDesc::BallSocket { body1, body2, world_anchor } => {
                let first = self.body(body1)?;
                let second = self.body(body2)?;
                let local1 = first.to_local(world_anchor);
                let local2 = second.to_local(world_anchor);
                let joint = SphericalJointBuilder::new()
                    .local_anchor1(to_na_point(local1))
                    .local_anchor2(to_na_point(local2))
                    .build();
                let joint = self.impulse_joints.insert(self.handle(body1)?, self.handle(body2)?, joint, true);
                ConstraintRecord::BallSocket { joint, body1, body2, local1, local2 }
            }
        };
        let id = ConstraintId(self.next_constraint);
        self.next_constraint += 1;
        self.constraints.insert(id, record);
        Some(id)
    }

    fn remove_constraint(&mut self, constraint: ConstraintId) -> bool {
        match self.constraints.remove(&constraint) {
            Some(record) => {
                self.drop_constraint_record(record);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.island_manager = IslandManager::new();
        self.broad_phase = DefaultBroadPhase::new();
        self.narrow_phase = NarrowPhase::new();
        self.bodies = RigidBodySet::new();
        self.colliders = ColliderSet::new();
        self.impulse_joints = ImpulseJointSet::new();
        self.multibody_joints = MultibodyJointSet::new();
        self.ccd_solver = CCDSolver::new();
        self.query_pipeline = QueryPipeline::new();
        self.records.clear();
        self.handle_ids.clear();
        self.constraints.clear();
    }

    fn raycast(&self, origin: Vec3, ray: Vec3, filter: &dyn Fn(&BodyState) -> bool) -> Option<RaycastHit> {
        let accept = |_handle: ColliderHandle, collider: &Collider| {
            collider
                .parent()
                .and_then(|parent| self.handle_ids.get(&parent))
                .and_then(|id| self.body(*id))
                .is_some_and(|state| filter(&state))
        };
        let query = Ray::new(to_na_point(origin), to_na(ray));
        let (collider, hit) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &query,
            1.0,
            true,
            QueryFilter::default().predicate(&accept),
        )?;
        Some(RaycastHit {
            body: self.body_id_of_collider(collider)?,
            normal: from_na(&hit.normal),
            fraction: hit.time_of_impact,
        })
    }

    fn body(&self, body: BodyId) -> Option<BodyState> {
        self.records.get(&body).and_then(|record| self.snapshot(body, record))
    }

    fn bodies(&self) -> Vec<BodyState> {
        self.records.iter().filter_map(|(id, record)| self.snapshot(*id, record)).collect()
    }

    fn wake_body(&mut self, body: BodyId) {
        if let Some(rb) = self.handle(body).and_then(|handle| self.bodies.get_mut(handle)) {
            rb.wake_up(true);
        }
    }

    fn damp_body_velocity(&mut self, body: BodyId, factor: f32) {
        if let Some(rb) = self.handle(body).and_then(|handle| self.bodies.get_mut(handle)) {
            let linvel = *rb.linvel() * factor;
            let angvel = *rb.angvel() * factor;
            rb.set_linvel(linvel, false);
            rb.set_angvel(angvel, false);
        }
    }

    fn set_body_static(&mut self, body: BodyId, is_static: bool) {
        if let Some(rb) = self.handle(body).and_then(|handle| self.bodies.get_mut(handle)) {
            let body_type = if is_static { RigidBodyType::Fixed } else { RigidBodyType::Dynamic };
            rb.set_body_type(body_type, true);
        }
    }

    fn set_constraint_target(&mut self, constraint: ConstraintId, target: Vec3) -> bool {
        let Some(ConstraintRecord::PointOnPoint { anchor_body, .. }) = self.constraints.get(&constraint) else {
            return false;
        };
        match self.bodies.get_mut(*anchor_body) {
            Some(anchor) => {
                anchor.set_next_kinematic_translation(to_na(target));
                true
            }
            None => false,
        }
    }

    fn constraints(&self) -> Vec<ConstraintState> {
        self.constraints
            .iter()
            .filter_map(|(id, record)| {
                let geometry = match record {
                    ConstraintRecord::PointOnPoint { anchor_body, body, local_anchor, .. } => {
                        let state = self.body(*body)?;
                        let target = from_na(self.bodies.get(*anchor_body)?.translation());
                        ConstraintGeometry::PointOnPoint {
                            body: *body,
                            body_anchor: state.to_world(*local_anchor),
                            target,
                        }
                    }
                    ConstraintRecord::BallSocket { body1, body2, local1, local2, .. } => {
                        let first = self.body(*body1)?;
                        let second = self.body(*body2)?;
                        ConstraintGeometry::BallSocket {
                            body1: *body1,
                            body2: *body2,
                            center1: first.position,
                            center2: second.position,
                            anchor1: first.to_world(*local1),
                            anchor2: second.to_world(*local2),
                        }
                    }
                };
                Some(ConstraintState { id: *id, geometry })
            })
            .collect()
    }

    fn islands(&self) -> Vec<IslandState> {
        let members: Vec<(BodyId, RigidBodyHandle)> = self
            .records
            .iter()
            .filter(|(_, record)| self.bodies.get(record.handle).is_some_and(|body| body.is_dynamic()))
            .map(|(id, record)| (*id, record.handle))
            .collect();
        let index: HashMap<RigidBodyHandle, usize> =
            members.iter().enumerate().map(|(i, (_, handle))| (*handle, i)).collect();
        let mut sets = DisjointSets::new(members.len());
        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let parent = |collider| self.colliders.get(collider).and_then(|c| c.parent());
            if let (Some(a), Some(b)) = (parent(pair.collider1), parent(pair.collider2)) {
                if let (Some(&a), Some(&b)) = (index.get(&a), index.get(&b)) {
                    sets.union(a, b);
                }
            }
        }
        for (_, joint) in self.impulse_joints.iter() {
            if let (Some(&a), Some(&b)) = (index.get(&joint.body1), index.get(&joint.body2)) {
                sets.union(a, b);
            }
        }
        let mut grouped: BTreeMap<usize, IslandState> = BTreeMap::new();
        for (i, (id, handle)) in members.iter().enumerate() {
            let active = self.bodies.get(*handle).is_some_and(|body| !body.is_sleeping());
            let island =
                grouped.entry(sets.find(i)).or_insert_with(|| IslandState { bodies: Vec::new(), is_active: false });
            island.bodies.push(*id);
            island.is_active |= active;
        }
        grouped.into_values().collect()
    }

    fn arbiters(&self) -> Vec<ArbiterState> {
        self.narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                Some(ArbiterState {
                    body1: self.body_id_of_collider(pair.collider1)?,
                    body2: self.body_id_of_collider(pair.collider2)?,
                    contact_count: pair.manifolds.iter().map(|manifold| manifold.points.len()).sum(),
                })
            })
            .collect()
    }

    fn timings(&self) -> Vec<PhaseTiming> {
        let counters = &self.pipeline.counters;
        vec![
            PhaseTiming { label: "BroadPhase", millis: counters.cd.broad_phase_time.time() },
            PhaseTiming { label: "NarrowPhase", millis: counters.cd.narrow_phase_time.time() },
            PhaseTiming { label: "BuildIslands", millis: counters.stages.island_construction_time.time() },
            PhaseTiming { label: "Solver", millis: counters.stages.solver_time.time() },
            PhaseTiming { label: "CCD", millis: counters.stages.ccd_time.time() },
        ]
    }

    fn collision_system(&self) -> String {
        "rapier3d DefaultBroadPhase (multi-SAP)".to_string()
    }
}

fn body_state(id: BodyId, shape: BodyShape, body: &RigidBody, aabb: Aabb) -> BodyState {
    let rotation = body.rotation().coords;
    BodyState {
        id,
        shape,
        position: from_na(body.translation()),
        rotation: Quat::from_xyzw(rotation.x, rotation.y, rotation.z, rotation.w),
        is_static: body.is_fixed(),
        is_active: !body.is_fixed() && !body.is_sleeping(),
        aabb,
    }
}

/// Union-find over island members.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self { parent: (0..len).collect() }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (a, b) = (self.find(a), self.find(b));
        if a != b {
            self.parent[b] = a;
        }
    }
}

fn to_na(v: Vec3) -> Vector3<Real> {
    Vector3::new(v.x, v.y, v.z)
}

fn to_na_point(v: Vec3) -> Point3<Real> {
    Point3::new(v.x, v.y, v.z)
}

fn from_na(v: &Vector3<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn from_na_point(p: &Point3<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

fn to_isometry(position: Vec3, rotation: Quat) -> Isometry3<Real> {
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z));
    Isometry3::from_parts(Translation3::new(position.x, position.y, position.z), rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Material;

    fn world() -> RapierWorld {
        RapierWorld::new(&PhysicsConfig::default()).expect("rapier world")
    }

    #[test]
    fn ids_resolve_until_removed() {
        let mut world = world();
        let a = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 2.0, 0.0)));
        let b = world.add_body(BodyDesc::ball(0.5).at(Vec3::new(3.0, 2.0, 0.0)));
        assert_eq!(world.bodies().iter().map(|s| s.id).collect::<Vec<_>>(), vec![a, b]);
        assert!(world.remove_body(a));
        assert!(world.body(a).is_none());
        assert!(!world.remove_body(a), "second removal is a no-op");
        assert!(world.body(b).is_some());
    }

    #[test]
    fn raycast_filter_skips_static_bodies() {
        let mut world = world();
        let ground = world.add_body(
            BodyDesc::cuboid(Vec3::new(100.0, 10.0, 100.0))
                .at(Vec3::new(0.0, -5.0, 0.0))
                .fixed()
                .material(Material { restitution: 0.0, friction: 0.0 }),
        );
        let crate_body = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 0.5, 0.0)));
        let down = Vec3::new(0.0, -100.0, 0.0);

        let any = world.raycast(Vec3::new(0.0, 10.0, 0.0), down, &|_| true).expect("hit");
        assert_eq!(any.body, crate_body);
        assert!((any.fraction - 0.09).abs() < 1e-3);

        let beside = world.raycast(Vec3::new(5.0, 10.0, 0.0), down, &|_| true).expect("ground hit");
        assert_eq!(beside.body, ground);
        assert!(world.raycast(Vec3::new(5.0, 10.0, 0.0), down, &|s| !s.is_static).is_none());
    }

    #[test]
    fn removing_body_drops_attached_constraints() {
        let mut world = world();
        let body = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 2.0, 0.0)));
        let constraint = world
            .add_constraint(ConstraintDesc::PointOnPoint {
                body,
                local_anchor: Vec3::ZERO,
                target: Vec3::new(0.0, 2.0, 0.0),
            })
            .expect("constraint on live body");
        assert_eq!(world.constraints().len(), 1);
        assert_eq!(world.bodies().len(), 1, "anchor carrier is not reported as a body");
        world.remove_body(body);
        assert!(world.constraints().is_empty());
        assert!(!world.remove_constraint(constraint));
    }

    #[test]
    fn dragged_body_follows_target() {
        let mut world = world();
        let body = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 2.0, 0.0)));
        let constraint = world
            .add_constraint(ConstraintDesc::PointOnPoint {
                body,
                local_anchor: Vec3::ZERO,
                target: Vec3::new(0.0, 2.0, 0.0),
            })
            .expect("constraint");
        for _ in 0..120 {
            assert!(world.set_constraint_target(constraint, Vec3::new(0.0, 4.0, 0.0)));
            world.step(1.0 / 60.0, false);
        }
        let state = world.body(body).expect("body alive");
        assert!((state.position - Vec3::new(0.0, 4.0, 0.0)).length() < 0.25, "body at {:?}", state.position);
    }

    #[test]
    fn clear_empties_every_container() {
        let mut world = world();
        let a = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 0.5, 0.0)));
        let b = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 1.5, 0.0)));
        world
            .add_constraint(ConstraintDesc::BallSocket { body1: a, body2: b, world_anchor: Vec3::new(0.0, 1.0, 0.0) })
            .expect("ball socket");
        world.step(1.0 / 60.0, true);
        world.clear();
        assert!(world.bodies().is_empty());
        assert!(world.constraints().is_empty());
        assert!(world.islands().is_empty());
        assert!(world.body(a).is_none());
    }

    #[test]
    fn touching_bodies_share_an_island() {
        let mut world = world();
        world.add_body(BodyDesc::cuboid(Vec3::new(20.0, 1.0, 20.0)).at(Vec3::new(0.0, -0.5, 0.0)).fixed());
        let low = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 0.5, 0.0)));
        let high = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(0.0, 1.5, 0.0)));
        let lone = world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(6.0, 0.5, 0.0)));
        for _ in 0..10 {
            world.step(1.0 / 60.0, false);
        }
        let islands = world.islands();
        let stack = islands.iter().find(|island| island.bodies.contains(&low)).expect("stack island");
        assert!(stack.bodies.contains(&high));
        assert!(!stack.bodies.contains(&lone));
        assert!(!world.arbiters().is_empty());
    }

    #[test]
    fn busy_step_reports_phase_timings() {
        let mut world = world();
        world.add_body(BodyDesc::cuboid(Vec3::new(100.0, 10.0, 100.0)).at(Vec3::new(0.0, -5.0, 0.0)).fixed());
        for i in 0..300 {
            let (x, z) = ((i % 10) as f32 * 1.1, ((i / 10) % 10) as f32 * 1.1);
            world.add_body(BodyDesc::cuboid(Vec3::ONE).at(Vec3::new(x, 0.5 + (i / 100) as f32 * 1.1, z)));
        }
        for _ in 0..30 {
            world.step(1.0 / 60.0, false);
        }
        let timings = world.timings();
        assert_eq!(timings.len(), 5);
        let total: f64 = timings.iter().map(|phase| phase.millis).sum();
        assert!(total > 0.0, "timings {timings:?}");
    }
}
