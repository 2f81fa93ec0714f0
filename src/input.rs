use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks keyboard and mouse state across winit events.
///
/// The frame driver feeds every [`WindowEvent`] through
/// [`Input::handle_event`] and calls [`Input::begin_frame`] once per frame to
/// reset the per-frame deltas. Wheel input is tracked but nothing in the
/// renderer consumes it.
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
    scroll_delta: Vec2,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            mouse_buttons_down: HashSet::new(),
            mouse_position: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            scroll_delta: Vec2::ZERO,
        }
    }
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            if !self.keys_down.contains(&key) {
                                self.keys_pressed.insert(key);
                            }
                            self.keys_down.insert(key);
                        }
                        ElementState::Released => {
                            self.keys_down.remove(&key);
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    self.mouse_buttons_down.insert(*button);
                }
                ElementState::Released => {
                    self.mouse_buttons_down.remove(button);
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                self.mouse_delta += new_pos - self.mouse_position;
                self.mouse_position = new_pos;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    winit::event::MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    winit::event::MouseScrollDelta::PixelDelta(pos) => {
                        Vec2::new(pos.x as f32, pos.y as f32) / 120.0
                    }
                };
                self.scroll_delta += d;
            }
            _ => {}
        }
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the mouse button is currently held down.
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Current mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse movement delta this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll wheel delta this frame (in "lines"). Accepted but unused.
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }
}

/// One frame's worth of camera input, decoupled from any input backend.
///
/// [`Camera::update`](crate::Camera::update) consumes this snapshot instead
/// of polling key state itself. The frame driver builds it from [`Input`]
/// via [`CameraInput::from_input`]; tests construct it directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub up: bool,
    pub down: bool,
    /// Look delta in pixels, nonzero only while the look button is held.
    pub look_delta: Vec2,
}

impl CameraInput {
    /// Samples the W/S/A/D + Space/LeftShift movement keys and, while
    /// `look_button` is held, the mouse delta.
    pub fn from_input(input: &Input, look_button: MouseButton) -> Self {
        let look_delta = if input.mouse_down(look_button) {
            input.mouse_delta()
        } else {
            Vec2::ZERO
        };
        Self {
            forward: input.key_down(KeyCode::KeyW),
            back: input.key_down(KeyCode::KeyS),
            strafe_left: input.key_down(KeyCode::KeyA),
            strafe_right: input.key_down(KeyCode::KeyD),
            up: input.key_down(KeyCode::Space),
            down: input.key_down(KeyCode::ShiftLeft),
            look_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_inert() {
        let snapshot = CameraInput::default();
        assert!(!snapshot.forward && !snapshot.back);
        assert!(!snapshot.strafe_left && !snapshot.strafe_right);
        assert!(!snapshot.up && !snapshot.down);
        assert_eq!(snapshot.look_delta, Vec2::ZERO);
    }

    #[test]
    fn look_delta_requires_held_button() {
        let mut input = Input::new();
        input.mouse_delta = Vec2::new(12.0, -4.0);

        let snapshot = CameraInput::from_input(&input, MouseButton::Right);
        assert_eq!(snapshot.look_delta, Vec2::ZERO);

        input.mouse_buttons_down.insert(MouseButton::Right);
        let snapshot = CameraInput::from_input(&input, MouseButton::Right);
        assert_eq!(snapshot.look_delta, Vec2::new(12.0, -4.0));
    }
}
