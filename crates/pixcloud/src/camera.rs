//! Wheel zoom and the perspective camera looking down -Z.

use glam::{Mat4, Vec3};

pub const MIN_DISTANCE: f32 = 500.0;
pub const MAX_DISTANCE: f32 = 2000.0;
pub const DEFAULT_DISTANCE: f32 = 1000.0;

/// Vertical field of view, degrees.
pub const FOV_Y_DEG: f32 = 50.0;
pub const Z_NEAR: f32 = 1.0;
pub const Z_FAR: f32 = 10_000.0;

/// Camera on the +Z axis looking at the origin, zoomed by wheel input.
#[derive(Clone, Debug)]
pub struct ZoomController {
    z_distance: f32,
    aspect: f32,
}

impl ZoomController {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        let mut zoom = Self {
            z_distance: DEFAULT_DISTANCE,
            aspect: 1.0,
        };
        zoom.set_viewport(viewport_width, viewport_height);
        zoom
    }

    #[inline]
    pub fn z_distance(&self) -> f32 {
        self.z_distance
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Moves the camera by `delta_y` (positive = away), clamped to
    /// [`MIN_DISTANCE`, `MAX_DISTANCE`]. Returns the new distance.
    pub fn on_wheel(&mut self, delta_y: f32) -> f32 {
        self.z_distance = (self.z_distance + delta_y).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.z_distance
    }

    /// Recomputes the aspect ratio. Zero-sized viewports (minimized windows) are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.z_distance), Vec3::ZERO, Vec3::Y)
    }

    /// Right-handed perspective with a [0, 1] depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEG.to_radians(), self.aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wheel_clamps_to_exact_bounds() {
        for start in [-50_000.0, 0.0, 700.0, 1999.0, 7000.0] {
            let mut zoom = ZoomController::default();
            zoom.on_wheel(start);
            assert_eq!(zoom.on_wheel(-100_000.0), MIN_DISTANCE);
            assert_eq!(zoom.on_wheel(100_000.0), MAX_DISTANCE);
        }
    }

    #[test]
    fn wheel_moves_linearly_inside_bounds() {
        let mut zoom = ZoomController::default();
        assert_eq!(zoom.z_distance(), DEFAULT_DISTANCE);
        assert_eq!(zoom.on_wheel(100.0), 1100.0);
        assert_eq!(zoom.on_wheel(-250.0), 850.0);
    }

    #[test]
    fn zero_viewport_keeps_previous_aspect() {
        let mut zoom = ZoomController::new(1600, 900);
        zoom.set_viewport(0, 900);
        assert_relative_eq!(zoom.aspect(), 16.0 / 9.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let zoom = ZoomController::new(1280, 720);
        let clip = zoom.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
