use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Orbit input with damping
///
/// Input only accumulates pending motion; [`CameraController::update`] applies
/// `damping_factor` of what is pending each frame, so the camera eases out after
/// the mouse stops.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
    pending_pan: (f32, f32),
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32, damping_factor: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping_factor: damping_factor.clamp(f32::EPSILON, 1.0),
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
            pending_pan: (0.0, 0.0),
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn process_events(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.pending_zoom += scroll_amount * self.zoom_speed;
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    if self.is_shift_held {
                        // SHIFT + DRAG = PAN (move focus point)
                        self.pending_pan.0 += -delta.0 as f32 * self.pan_speed;
                        self.pending_pan.1 += delta.1 as f32 * self.pan_speed;
                    } else {
                        self.pending_yaw += -delta.0 as f32 * self.rotate_speed;
                        self.pending_pitch += delta.1 as f32 * self.rotate_speed;
                    }
                }
            }
            _ => (),
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            let was_shift_held = self.is_shift_held;
            self.is_shift_held = *state == ElementState::Pressed;
            if was_shift_held != self.is_shift_held {
                log::trace!("Shift state changed: {}", self.is_shift_held);
            }
        }
    }

    /// Applies one frame of damped motion to `camera`
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        let k = self.damping_factor;

        let yaw = self.pending_yaw * k;
        let pitch = self.pending_pitch * k;
        let zoom = self.pending_zoom * k;
        let pan = (self.pending_pan.0 * k, self.pending_pan.1 * k);

        self.pending_yaw -= yaw;
        self.pending_pitch -= pitch;
        self.pending_zoom -= zoom;
        self.pending_pan.0 -= pan.0;
        self.pending_pan.1 -= pan.1;

        if yaw != 0.0 {
            camera.add_yaw(yaw);
        }
        if pitch != 0.0 {
            camera.add_pitch(pitch);
        }
        if zoom != 0.0 {
            camera.add_distance(zoom);
        }
        if pan != (0.0, 0.0) {
            camera.pan(pan);
        }
    }

    /// True while orbit motion is still easing out
    pub fn is_settling(&self) -> bool {
        self.pending_yaw.abs() > 1e-6
            || self.pending_pitch.abs() > 1e-6
            || self.pending_zoom.abs() > 1e-6
            || self.pending_pan.0.abs() > 1e-6
            || self.pending_pan.1.abs() > 1e-6
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn drag(controller: &mut CameraController, dx: f64, dy: f64) {
        controller.process_events(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        });
        controller.process_events(&DeviceEvent::MouseMotion { delta: (dx, dy) });
        controller.process_events(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Released,
        });
    }

    #[test]
    fn test_motion_is_applied_gradually() {
        let mut controller = CameraController::new(0.01, 0.1, 0.05);
        let mut camera = OrbitCamera::new(3.0, 0.0, 0.0, Vector3::zero(), 1.0);

        drag(&mut controller, -100.0, 0.0);
        controller.update(&mut camera);

        // 100 px * 0.01 = 1 rad pending, 5% applied in the first frame
        assert!((camera.yaw - 0.05).abs() < 1e-5);
        assert!(controller.is_settling());

        for _ in 0..500 {
            controller.update(&mut camera);
        }
        assert!((camera.yaw - 1.0).abs() < 1e-3);
        assert!(!controller.is_settling());
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut controller = CameraController::new(0.01, 0.1, 0.05);
        let mut camera = OrbitCamera::new(3.0, 0.2, 0.4, Vector3::zero(), 1.0);
        let eye = camera.eye;

        controller.process_events(&DeviceEvent::MouseMotion {
            delta: (50.0, 50.0),
        });
        controller.update(&mut camera);

        assert_eq!(camera.eye, eye);
        assert!(!controller.is_rotating());
    }
}
