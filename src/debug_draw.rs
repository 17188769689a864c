use glam::{Vec3, Vec4};

/// Linear RGBA, components in `0..=1`.
pub type Color = Vec4;

pub mod colors {
    use super::Color;

    pub const GREEN: Color = Color::new(0.0, 0.5, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);
    pub const CLOTH: Color = Color::new(0.0, 0.95, 0.0, 0.5);
    pub const BACKGROUND: Color = Color::new(63.0 / 255.0, 66.0 / 255.0, 73.0 / 255.0, 1.0);
}

/// Sink for world-space debug primitives.
pub trait DebugDrawer {
    fn draw_line(&mut self, a: Vec3, b: Vec3, color: Color);

    fn draw_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color);

    fn draw_aabb(&mut self, min: Vec3, max: Vec3, color: Color) {
        let corner = |i: usize| {
            Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        };
        for (a, b) in crate::physics::BOX_EDGES {
            self.draw_line(corner(a), corner(b), color);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub a: Vec3,
    pub b: Vec3,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugTriangle {
    pub points: [Vec3; 3],
    pub color: Color,
}

/// Primitives collected during a frame, submitted to the renderer after the HUD.
#[derive(Debug, Default, Clone)]
pub struct DebugDrawList {
    pub lines: Vec<DebugLine>,
    pub triangles: Vec<DebugTriangle>,
}

impl DebugDrawList {
    pub fn clear(&mut self) {
        self.lines.clear();
        self.triangles.clear();
    }
}

impl DebugDrawer for DebugDrawList {
    fn draw_line(&mut self, a: Vec3, b: Vec3, color: Color) {
        self.lines.push(DebugLine { a, b, color });
    }

    fn draw_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color) {
        self.triangles.push(DebugTriangle { points: [a, b, c], color });
    }
}
