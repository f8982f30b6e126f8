use std::collections::HashSet;
use winit::event::{DeviceEvent, ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Pixel-precise scroll (touchpads) reported per "line" of wheel movement
const PIXELS_PER_LINE: f32 = 20.0;

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Last cursor position; `None` until the first sample after a reseed
    mouse_position: Option<(f32, f32)>,
    /// While grabbed, look comes from raw device motion instead of the cursor
    captured: bool,
    /// Mouse movement delta since last reset
    mouse_delta: (f32, f32),
    /// Scroll lines since last reset
    scroll_delta: f32,
}

impl WinitController {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pressed_vec: Vec::new(),
            mouse_position: None,
            captured: false,
            mouse_delta: (0.0, 0.0),
            scroll_delta: 0.0,
        }
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_button(button, event.state);
                    }
                }
            }
            // A grabbed cursor is clamped or pinned, so its position stops changing
            WindowEvent::CursorMoved { position, .. } if !self.captured => {
                self.record_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.record_scroll(lines);
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered while unfocused
                self.pressed_keys.clear();
                self.pressed_vec.clear();
                self.reseed();
            }
            _ => {}
        }
    }

    /// Process a Winit DeviceEvent. Only relative mouse motion is used.
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.record_motion(*dx as f32, *dy as f32);
        }
    }

    /// Switch between raw device motion (grabbed) and cursor positions (free)
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        self.reseed();
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    fn set_button(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(button) {
                    self.pressed_vec.push(button);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&button) {
                    self.pressed_vec.retain(|&b| b != button);
                }
            }
        }
    }

    /// Accumulate movement relative to the last sample. The first sample after
    /// creation or `reseed` only seeds the position, so grabbing the cursor
    /// does not produce a jump.
    pub fn record_cursor(&mut self, x: f32, y: f32) {
        if let Some((last_x, last_y)) = self.mouse_position {
            self.mouse_delta.0 += x - last_x;
            self.mouse_delta.1 += y - last_y;
        }
        self.mouse_position = Some((x, y));
    }

    /// Accumulate raw relative motion. Unbounded by the window edges and
    /// needs no seeding; ignored unless the cursor is captured.
    pub fn record_motion(&mut self, dx: f32, dy: f32) {
        if self.captured {
            self.mouse_delta.0 += dx;
            self.mouse_delta.1 += dy;
        }
    }

    pub fn record_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Forget the last cursor position
    pub fn reseed(&mut self) {
        self.mouse_position = None;
    }

    /// Reset per-frame state (mouse and scroll deltas)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::ArrowUp => Some(Button::ArrowUp),
            KeyCode::ArrowDown => Some(Button::ArrowDown),
            KeyCode::Tab => Some(Button::Tab),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }

    fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}
