use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Mouse orbit controls: drag rotates, shift+drag pans, wheel zooms
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    /// Applies a raw device event to the camera; returns true if the camera moved
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) -> bool {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                false
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                if self.is_shift_held {
                    camera.pan((
                        -delta.0 as f32 * self.pan_speed,
                        delta.1 as f32 * self.pan_speed,
                    ));
                } else {
                    camera.add_yaw(-delta.0 as f32 * self.rotate_speed);
                    camera.add_pitch(delta.1 as f32 * self.rotate_speed);
                }
                true
            }
            _ => false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            self.is_shift_held = *state == ElementState::Pressed;
        }
    }

    /// Forget a drag in progress, e.g. when orbiting gets disabled mid-drag
    pub fn release(&mut self) {
        self.is_mouse_pressed = false;
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_rotates_only_while_pressed() {
        let mut controller = CameraController::new(0.01, 1.0);
        let mut camera = OrbitCamera::initial(1.0);
        let yaw = camera.yaw;

        let motion = DeviceEvent::MouseMotion { delta: (10.0, 0.0) };
        assert!(!controller.process_events(&motion, &mut camera));
        assert_eq!(camera.yaw, yaw);

        controller.process_events(
            &DeviceEvent::Button {
                button: 0,
                state: ElementState::Pressed,
            },
            &mut camera,
        );
        assert!(controller.is_rotating());
        assert!(controller.process_events(&motion, &mut camera));
        assert!((camera.yaw - (yaw - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_zooms() {
        let mut controller = CameraController::new(0.01, 1.0);
        let mut camera = OrbitCamera::initial(1.0);
        let distance = camera.distance;
        let wheel = DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        };
        assert!(controller.process_events(&wheel, &mut camera));
        assert!(camera.distance < distance);
    }
}
