//! Orbiting perspective camera with damped drag rotation and wheel zoom. Panning is disabled.

use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::{PI, TAU};

pub const FOV_Y_DEGREES: f32 = 45.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
/// Initial eye position
pub const HOME: Vec3 = Vec3::new(0.0, 10.0, 38.0);
pub const DAMPING: f32 = 0.05;
pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 150.0;
const POLAR_MARGIN: f32 = 0.01;

/// A half-line in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

#[derive(Clone, Debug)]
pub struct Camera {
    target: Vec3,
    azimuth: f32,
    polar: f32,
    distance: f32,
    goal_azimuth: f32,
    goal_polar: f32,
    goal_distance: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        let distance = HOME.length();
        let polar = (HOME.y / distance).acos();
        let azimuth = HOME.x.atan2(HOME.z);
        Camera {
            target: Vec3::ZERO,
            azimuth,
            polar,
            distance,
            goal_azimuth: azimuth,
            goal_polar: polar,
            goal_distance: distance,
            aspect: sanitize_aspect(aspect),
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Recomputes the projection for a new viewport size. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        if width > 0 && height > 0 {
            self.aspect = sanitize_aspect(width as f32 / height as f32);
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), self.aspect, NEAR, FAR)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Rotates the orbit goal by a pointer drag measured in pixels
    pub fn orbit(&mut self, delta: Vec2, viewport_height: usize) {
        let height = viewport_height.max(1) as f32;
        self.goal_azimuth -= TAU * delta.x / height;
        self.goal_polar = (self.goal_polar - TAU * delta.y / height)
            .clamp(POLAR_MARGIN, PI - POLAR_MARGIN);
    }

    /// Positive steps zoom in
    pub fn zoom(&mut self, steps: f32) {
        self.goal_distance =
            (self.goal_distance * 0.95f32.powf(steps)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Moves the camera a damped step toward its goal
    pub fn update(&mut self) {
        self.azimuth += (self.goal_azimuth - self.azimuth) * DAMPING;
        self.polar += (self.goal_polar - self.polar) * DAMPING;
        self.distance += (self.goal_distance - self.distance) * DAMPING;
    }

    /// Ray from the eye through a point in normalized device coordinates
    pub fn ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inverse * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        Ray {
            origin: self.position(),
            direction: (far - near).try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_home() {
        let camera = Camera::new(16.0 / 9.0);
        assert!(camera.position().distance(HOME) < 1e-3);
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = Camera::new(2.0);
        let ray = camera.ray(Vec2::ZERO);
        let expected = (Vec3::ZERO - camera.position()).normalize();
        assert!(ray.direction.dot(expected) > 0.9999);
    }

    #[test]
    fn viewport_resize_updates_aspect() {
        let mut camera = Camera::new(1.0);
        camera.set_viewport(200, 100);
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
        camera.set_viewport(0, 100);
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_is_clamped_and_damped() {
        let mut camera = Camera::new(1.0);
        let before = camera.position().length();
        camera.zoom(1000.0);
        camera.update();
        let after = camera.position().length();
        assert!(after < before);
        assert!(after > MIN_DISTANCE);
        for _ in 0..1000 {
            camera.update();
        }
        assert!((camera.position().length() - MIN_DISTANCE).abs() < 1e-2);
    }
}
