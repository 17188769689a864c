use super::BuiltScene;
use crate::physics::{BodyDesc, PhysicsWorld};
use glam::Vec3;

const LEVELS: usize = 20;
const BLOCKS_PER_LEVEL: usize = 3;
const BLOCK_HEIGHT: f32 = 1.0;

/// Alternating layers of three 1x1x3 blocks, rotated a quarter turn each level.
pub(super) fn build(world: &mut dyn PhysicsWorld, scene: &mut BuiltScene) {
    for level in 0..LEVELS {
        let even = level % 2 == 0;
        let y = level as f32 * BLOCK_HEIGHT + BLOCK_HEIGHT / 2.0;
        for e in 0..BLOCKS_PER_LEVEL {
            let e = e as f32;
            let (size, position) = if even {
                (Vec3::new(1.0, BLOCK_HEIGHT, 3.0), Vec3::new(e, y, 1.0))
            } else {
                (Vec3::new(3.0, BLOCK_HEIGHT, 1.0), Vec3::new(1.0, y, e))
            };
            scene.bodies.push(world.add_body(BodyDesc::cuboid(size).at(position)));
        }
    }
}
