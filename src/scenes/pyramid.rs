use super::BuiltScene;
use crate::physics::{BodyDesc, PhysicsWorld};
use glam::Vec3;

const BASE: usize = 10;
const SPACING: f32 = 1.01;

/// Planar stepped pyramid of unit cubes, `BASE` wide at the bottom.
pub(super) fn build(world: &mut dyn PhysicsWorld, scene: &mut BuiltScene) {
    for row in 0..BASE {
        let count = BASE - row;
        let start = -(count as f32 - 1.0) * SPACING / 2.0;
        for i in 0..count {
            let position = Vec3::new(start + i as f32 * SPACING, row as f32 + 0.5, 0.0);
            scene.bodies.push(world.add_body(BodyDesc::cuboid(Vec3::ONE).at(position)));
        }
    }
}
