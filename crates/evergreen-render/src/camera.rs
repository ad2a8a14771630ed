//! Orbit camera with optional auto-rotation

use evergreen_formation::CameraConfig;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// A camera orbiting a target point on a sphere of adjustable radius
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Angle around the vertical axis; 0 looks down −Z from +Z
    pub yaw: f32,
    /// Angle from straight up, in radians
    pub polar: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Width / height
    pub aspect: f32,
    /// Full turns per minute while auto-rotating
    pub auto_rotate_speed: f32,

    min_distance: f32,
    max_distance: f32,
    min_polar: f32,
    max_polar: f32,
}

impl OrbitCamera {
    /// Place the camera at `config.position`, looking at `config.target`
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let distance = offset.length().max(f32::EPSILON);

        let mut camera = Self {
            target,
            distance,
            yaw: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            fov: config.fov_degrees,
            near: 0.1,
            far: 200.0,
            aspect,
            auto_rotate_speed: config.auto_rotate_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar: config.min_polar,
            max_polar: config.max_polar,
        };
        camera.clamp();
        camera
    }

    fn clamp(&mut self) {
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.polar = self.polar.clamp(self.min_polar, self.max_polar);
    }

    pub fn position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        self.target
            + Vec3::new(
                sin_polar * self.yaw.sin(),
                cos_polar,
                sin_polar * self.yaw.cos(),
            ) * self.distance
    }

    /// Radians per second of auto-rotation
    pub fn auto_rotate_rate(&self) -> f32 {
        TAU / 60.0 * self.auto_rotate_speed
    }

    /// Advance auto-rotation by `dt` seconds when `rotating`
    pub fn advance(&mut self, dt: f32, rotating: bool) {
        if rotating && dt.is_finite() {
            self.yaw = (self.yaw - self.auto_rotate_rate() * dt).rem_euclid(TAU);
        }
    }

    /// Drag the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_polar: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
        self.polar += delta_polar;
        self.clamp();
    }

    /// Move toward (positive) or away from the target
    pub fn zoom(&mut self, delta: f32) {
        self.distance -= delta;
        self.clamp();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection with wgpu's [0, 1] depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }

    #[test]
    fn starts_at_configured_position() {
        let camera = camera();
        let p = camera.position();
        assert!((p - Vec3::new(0.0, 2.0, 12.0)).length() < 1e-4, "{p:?}");
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = camera();
        let clip = camera.view_projection_matrix() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn auto_rotation_turns_only_when_enabled() {
        let mut camera = camera();
        let start = camera.yaw;
        camera.advance(1.0, false);
        assert_eq!(camera.yaw, start);

        // Speed 0.5 is half a turn per minute
        camera.advance(60.0, true);
        let turned = (start - camera.yaw).rem_euclid(TAU);
        assert!((turned - std::f32::consts::PI).abs() < 1e-3);
        // Distance and height are untouched
        assert!((camera.position().y - 2.0).abs() < 1e-3);
    }

    #[test]
    fn orbit_and_zoom_respect_limits() {
        let mut camera = camera();
        camera.orbit(0.0, -10.0);
        assert!((camera.polar - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        camera.orbit(0.0, 10.0);
        assert!((camera.polar - (std::f32::consts::FRAC_PI_2 + 0.2)).abs() < 1e-6);
        camera.zoom(100.0);
        assert_eq!(camera.distance, 5.0);
        camera.zoom(-100.0);
        assert_eq!(camera.distance, 25.0);
    }
}
