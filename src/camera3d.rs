use crate::config::CameraConfig;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use winit::dpi::PhysicalSize;

const DEFAULT_UP: Vec3 = Vec3::Y;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Perspective camera used for picking rays and overlay projection.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, near, far }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let position = Vec3::from(config.position);
        let mut target = Vec3::from(config.target);
        if target.distance_squared(position) <= f32::EPSILON {
            target = position + Vec3::NEG_Z;
        }
        Self::new(position, target, config.fov_y_degrees.to_radians(), config.near, config.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, viewport: PhysicalSize<u32>) -> Mat4 {
        let aspect = if viewport.height > 0 { viewport.width as f32 / viewport.height as f32 } else { 1.0 };
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// World-space ray from the camera through a pixel; the direction is normalized.
    pub fn screen_ray(&self, screen: Vec2, viewport: PhysicalSize<u32>) -> Option<(Vec3, Vec3)> {
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let ndc_x = (2.0 * screen.x / viewport.width as f32) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / viewport.height as f32);
        let clip = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let world = self.view_projection(viewport).inverse() * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let dir = ((world.truncate() / world.w) - self.position).try_normalize()?;
        Some((self.position, dir))
    }

    /// Pixel position of a world point, `None` when it lies behind the camera.
    pub fn project_point(&self, point: Vec3, viewport: PhysicalSize<u32>) -> Option<Vec2> {
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let clip = self.view_projection(viewport) * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * viewport.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * viewport.height as f32;
        Some(Vec2::new(x, y))
    }

    /// Rotates the eye around the target; `delta` is (yaw, pitch) in radians.
    pub fn orbit(&mut self, delta: Vec2) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let yaw = offset.x.atan2(offset.z) - delta.x;
        let pitch = ((offset.y / radius).asin() + delta.y).clamp(-MAX_PITCH, MAX_PITCH);
        let rotation = Quat::from_euler(glam::EulerRot::YXZ, yaw, -pitch, 0.0);
        self.position = self.target + rotation * Vec3::new(0.0, 0.0, radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> PhysicalSize<u32> {
        PhysicalSize::new(1280, 720)
    }

    #[test]
    fn default_camera_faces_the_tower() {
        let camera = Camera3D::from_config(&CameraConfig::default());
        assert_eq!(camera.position, Vec3::new(20.0, 10.0, 20.0));
        let centre = camera.project_point(Vec3::new(1.0, 5.0, 1.0), viewport()).expect("tower in view");
        assert!((centre - Vec2::new(640.0, 360.0)).length() < 0.5);
    }

    #[test]
    fn degenerate_target_falls_back_to_forward() {
        let config = CameraConfig { target: [20.0, 10.0, 20.0], ..CameraConfig::default() };
        let camera = Camera3D::from_config(&config);
        assert_eq!(camera.target, Vec3::new(20.0, 10.0, 19.0));
    }

    #[test]
    fn centre_ray_points_at_target_and_projects_back() {
        let camera = Camera3D::new(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, 60.0_f32.to_radians(), 0.1, 1000.0);
        let centre = Vec2::new(640.0, 360.0);
        let (origin, dir) = camera.screen_ray(centre, viewport()).expect("ray");
        assert_eq!(origin, camera.position);
        assert!((dir - (camera.target - camera.position).normalize()).length() < 1e-3);
        let projected = camera.project_point(Vec3::ZERO, viewport()).expect("in front");
        assert!((projected - centre).length() < 0.5);
    }

    #[test]
    fn points_behind_are_not_projected() {
        let camera = Camera3D::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 60.0_f32.to_radians(), 0.1, 100.0);
        assert!(camera.project_point(Vec3::new(0.0, 0.0, 10.0), viewport()).is_none());
        assert!(camera.screen_ray(Vec2::ZERO, PhysicalSize::new(0, 0)).is_none());
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut camera = Camera3D::new(Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO, 1.0, 0.1, 100.0);
        let radius = camera.position.distance(camera.target);
        camera.orbit(Vec2::new(0.4, 0.2));
        assert!((camera.position.distance(camera.target) - radius).abs() < 1e-4);
    }
}
