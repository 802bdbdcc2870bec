//! Damped pointer-drag and auto-rotation of the point cloud.

use crate::params::VisualizationParams;
use glam::{EulerRot, Mat4};

/// Radians of rotation per pixel of pointer travel.
pub const DRAG_SENSITIVITY: f32 = 0.005;

/// Rotation about the X and Y axes, in radians. Never wrapped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

/// Damped trackball-style rotation driven by pointer drags and auto-rotation.
///
/// Input moves `target`; each [`step`](Self::step) eases `current` a
/// `rotation_speed` fraction of the way toward it.
#[derive(Clone, Debug, Default)]
pub struct RotationController {
    current: Rotation,
    target: Rotation,
    dragging: bool,
    last_pointer: (f64, f64),
}

impl RotationController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> Rotation {
        self.current
    }

    #[inline]
    pub fn target(&self) -> Rotation {
        self.target
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Begins a drag at `(x, y)`. Ignored while rotation is locked.
    pub fn on_pointer_down(&mut self, x: f64, y: f64, params: &VisualizationParams) {
        if params.lock_rotation {
            return;
        }
        self.dragging = true;
        self.last_pointer = (x, y);
    }

    /// Vertical travel turns about X, horizontal travel about Y.
    pub fn on_pointer_move(&mut self, x: f64, y: f64, params: &VisualizationParams) {
        if !self.dragging || params.lock_rotation {
            return;
        }
        let dx = (x - self.last_pointer.0) as f32;
        let dy = (y - self.last_pointer.1) as f32;

        self.target.x += dy * DRAG_SENSITIVITY;
        self.target.y += dx * DRAG_SENSITIVITY;

        self.last_pointer = (x, y);
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Spins the target about Y when auto-rotation is on and rotation is unlocked.
    pub fn on_auto_rotate_tick(&mut self, params: &VisualizationParams) {
        if params.auto_rotate && !params.lock_rotation {
            self.target.y += params.auto_rotate_speed;
        }
    }

    /// One damping step of `current` toward `target`. Frozen while locked.
    pub fn step(&mut self, params: &VisualizationParams) {
        if params.lock_rotation {
            return;
        }
        let k = params.rotation_speed;
        self.current.x += (self.target.x - self.current.x) * k;
        self.current.y += (self.target.y - self.current.y) * k;
    }

    /// Per-frame update: auto-rotation followed by damping.
    pub fn advance(&mut self, params: &VisualizationParams) {
        self.on_auto_rotate_tick(params);
        self.step(params);
    }

    /// Model matrix for the current rotation (X then Y, intrinsic).
    pub fn orientation(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.current.x, self.current.y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unlocked() -> VisualizationParams {
        VisualizationParams::default()
    }

    fn locked() -> VisualizationParams {
        VisualizationParams {
            lock_rotation: true,
            auto_rotate: true,
            ..Default::default()
        }
    }

    #[test]
    fn drag_deltas_map_to_swapped_axes() {
        let p = unlocked();
        let mut rot = RotationController::new();
        rot.on_pointer_down(100.0, 100.0, &p);
        rot.on_pointer_move(120.0, 90.0, &p);

        assert_relative_eq!(rot.target().x, -10.0 * DRAG_SENSITIVITY);
        assert_relative_eq!(rot.target().y, 20.0 * DRAG_SENSITIVITY);
        // Damping has not run yet.
        assert_eq!(rot.current(), Rotation::default());
    }

    #[test]
    fn moves_without_a_press_are_ignored() {
        let p = unlocked();
        let mut rot = RotationController::new();
        rot.on_pointer_move(50.0, 50.0, &p);
        rot.on_pointer_down(0.0, 0.0, &p);
        rot.on_pointer_up();
        rot.on_pointer_move(80.0, 80.0, &p);
        assert_eq!(rot.target(), Rotation::default());
        assert!(!rot.is_dragging());
    }

    #[test]
    fn auto_rotate_accumulates_without_wrapping() {
        let p = VisualizationParams {
            auto_rotate: true,
            auto_rotate_speed: 0.05,
            ..Default::default()
        };
        let mut rot = RotationController::new();
        for _ in 0..200 {
            rot.on_auto_rotate_tick(&p);
        }
        assert_relative_eq!(rot.target().y, 10.0, epsilon = 1e-4);
        assert_eq!(rot.target().x, 0.0);
    }

    #[test]
    fn damping_converges_monotonically() {
        let p = VisualizationParams {
            rotation_speed: 0.1,
            ..Default::default()
        };
        let mut rot = RotationController::new();
        rot.on_pointer_down(0.0, 0.0, &p);
        rot.on_pointer_move(200.0, -100.0, &p);
        rot.on_pointer_up();
        let target = rot.target();

        let mut prev_gap = (target.x - rot.current().x).abs() + (target.y - rot.current().y).abs();
        let iterations = (1.0 / p.rotation_speed * 10.0) as usize;
        for _ in 0..iterations {
            rot.step(&p);
            let gap = (target.x - rot.current().x).abs() + (target.y - rot.current().y).abs();
            assert!(gap <= prev_gap);
            prev_gap = gap;
        }
        assert!(prev_gap < 1e-4, "gap after {} steps: {}", iterations, prev_gap);
    }

    #[test]
    fn full_speed_jumps_to_target() {
        let p = VisualizationParams {
            rotation_speed: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 0.02,
            ..Default::default()
        };
        let mut rot = RotationController::new();
        rot.advance(&p);
        assert_eq!(rot.current(), rot.target());
        assert_relative_eq!(rot.current().y, 0.02);
    }

    #[test]
    fn lock_freezes_current_and_target() {
        let p = unlocked();
        let mut rot = RotationController::new();
        rot.on_pointer_down(0.0, 0.0, &p);
        rot.on_pointer_move(30.0, 40.0, &p);
        rot.step(&p);
        let (current, target) = (rot.current(), rot.target());

        let l = locked();
        for i in 0..50 {
            rot.on_pointer_move(30.0 + i as f64 * 7.0, 40.0 - i as f64 * 3.0, &l);
            rot.on_auto_rotate_tick(&l);
            rot.advance(&l);
        }
        assert_eq!(rot.current(), current);
        assert_eq!(rot.target(), target);
    }

    #[test]
    fn press_while_locked_does_not_start_a_drag() {
        let mut rot = RotationController::new();
        rot.on_pointer_down(0.0, 0.0, &locked());
        assert!(!rot.is_dragging());
        rot.on_pointer_move(100.0, 100.0, &unlocked());
        assert_eq!(rot.target(), Rotation::default());
    }

    #[test]
    fn orientation_applies_x_then_y() {
        let mut rot = RotationController::new();
        let p = VisualizationParams {
            rotation_speed: 1.0,
            ..Default::default()
        };
        rot.on_pointer_down(0.0, 0.0, &p);
        // Quarter turn about Y only.
        rot.on_pointer_move(std::f64::consts::FRAC_PI_2 / DRAG_SENSITIVITY as f64, 0.0, &p);
        rot.step(&p);

        let v = rot.orientation().transform_vector3(glam::Vec3::X);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(v.z, -1.0, epsilon = 1e-4);
    }
}
