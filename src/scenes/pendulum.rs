use super::BuiltScene;
use crate::debug_draw::{Color, DebugDrawer};
use crate::physics::{BodyDesc, BodyId, ConstraintDesc, PhysicsWorld};
use glam::Vec3;

const BOBS: usize = 5;
const BOB_SIZE: f32 = 1.0;
const BOB_SPACING: f32 = 1.02;
const BEAM_HEIGHT: f32 = 10.0;
const STRING_LENGTH: f32 = 5.0;
const STRING_COLOR: Color = Color::new(0.85, 0.85, 0.85, 1.0);

/// A bob hanging from the beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Suspension {
    pub pivot: Vec3,
    pub bob: BodyId,
}

impl Suspension {
    pub fn draw(&self, world: &dyn PhysicsWorld, drawer: &mut dyn DebugDrawer) {
        if let Some(bob) = world.body(self.bob) {
            drawer.draw_line(self.pivot, bob.position, STRING_COLOR);
        }
    }
}

/// Row of box pendulums on ball sockets. The first bob starts raised to the side.
pub(super) fn build(world: &mut dyn PhysicsWorld, scene: &mut BuiltScene) {
    let width = BOBS as f32 * BOB_SPACING + 2.0;
    let beam =
        world.add_body(BodyDesc::cuboid(Vec3::new(width, 0.5, 0.5)).at(Vec3::new(0.0, BEAM_HEIGHT, 0.0)).fixed());
    scene.bodies.push(beam);
    let pivot_y = BEAM_HEIGHT - 0.25;
    let start = -(BOBS as f32 - 1.0) * BOB_SPACING / 2.0;
    for i in 0..BOBS {
        let pivot = Vec3::new(start + i as f32 * BOB_SPACING, pivot_y, 0.0);
        let position = if i == 0 {
            pivot + Vec3::new(-0.8, -0.6, 0.0) * STRING_LENGTH
        } else {
            pivot - Vec3::new(0.0, STRING_LENGTH, 0.0)
        };
        let bob = world.add_body(BodyDesc::cuboid(Vec3::splat(BOB_SIZE)).at(position));
        scene.bodies.push(bob);
        if world.add_constraint(ConstraintDesc::BallSocket { body1: beam, body2: bob, world_anchor: pivot }).is_some()
        {
            scene.suspensions.push(Suspension { pivot, bob });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PhysicsConfig;
    use crate::debug_draw::DebugDrawList;
    use crate::physics::{PhysicsWorld, RapierWorld};
    use crate::scenes::SceneKind;

    #[test]
    fn every_bob_is_suspended_and_drawn() {
        let mut world = RapierWorld::new(&PhysicsConfig::default()).expect("world");
        let scene = SceneKind::Pendulum.build(&mut world);
        assert_eq!(scene.suspensions.len(), 5);
        assert_eq!(world.constraints().len(), 5);
        let mut list = DebugDrawList::default();
        scene.draw(&world, &mut list);
        assert_eq!(list.lines.len(), 5);
    }
}
