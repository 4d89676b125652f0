//! Camera follow routine
//!
//! Every frame the camera position is nudged toward a target point by a fixed
//! step on each axis independently. There is no damping: once an axis reaches
//! its target it keeps oscillating by one step around it.

use cgmath::Vector3;

/// Panel-editable state of the follow routine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub moving: bool,
    pub target: Vector3<f32>,
    pub step: f32,
}

impl Default for CameraTarget {
    fn default() -> Self {
        Self {
            moving: true,
            target: Vector3::new(1.0, 1.0, 5.0),
            step: 0.01,
        }
    }
}

impl CameraTarget {
    /// Moves `position` one step toward the target, unless paused
    pub fn tick(&self, position: &mut Vector3<f32>) {
        if !self.moving {
            return;
        }
        position.x = step_axis(position.x, self.target.x, self.step);
        position.y = step_axis(position.y, self.target.y, self.step);
        position.z = step_axis(position.z, self.target.z, self.step);
    }
}

fn step_axis(current: f32, target: f32, step: f32) -> f32 {
    if current <= target {
        current + step
    } else {
        current - step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follower(target: Vector3<f32>) -> CameraTarget {
        CameraTarget {
            moving: true,
            target,
            step: 0.01,
        }
    }

    #[test]
    fn test_reaches_target_after_expected_ticks() {
        let animator = follower(Vector3::new(5.0, 5.0, 5.0));
        let mut position = Vector3::new(0.0, 0.0, 0.0);

        for _ in 0..500 {
            animator.tick(&mut position);
        }

        assert!((position.x - 5.0).abs() < 1e-3, "x = {}", position.x);
        assert!((position.z - 5.0).abs() < 1e-3, "z = {}", position.z);
    }

    #[test]
    fn test_oscillates_within_one_step_of_target() {
        let animator = follower(Vector3::new(5.0, 5.0, 5.0));
        let mut position = Vector3::new(0.0, 0.0, 0.0);
        for _ in 0..500 {
            animator.tick(&mut position);
        }

        let mut previous = position.x;
        for _ in 0..100 {
            animator.tick(&mut position);
            assert!((position.x - 5.0).abs() <= 0.01 + 1e-3);
            assert_ne!(position.x, previous, "axis stopped moving");
            previous = position.x;
        }
    }

    #[test]
    fn test_axes_move_independently() {
        let animator = follower(Vector3::new(1.0, -1.0, 0.0));
        let mut position = Vector3::new(0.0, 0.0, 0.5);
        animator.tick(&mut position);

        assert!((position.x - 0.01).abs() < 1e-6);
        assert!((position.y + 0.01).abs() < 1e-6);
        assert!((position.z - 0.49).abs() < 1e-6);
    }

    #[test]
    fn test_paused_leaves_position_unchanged() {
        let animator = CameraTarget {
            moving: false,
            ..CameraTarget::default()
        };
        let mut position = Vector3::new(1.0, 1.0, 2.0);
        for _ in 0..50 {
            animator.tick(&mut position);
        }
        assert_eq!(position, Vector3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_default_state() {
        let state = CameraTarget::default();
        assert!(state.moving);
        assert_eq!(state.target, Vector3::new(1.0, 1.0, 5.0));
        assert_eq!(state.step, 0.01);
    }
}
