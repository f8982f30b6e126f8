use crate::camera::CameraMovement;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    ArrowUp,
    ArrowDown,
    Tab,
    Escape,
}

impl Button {
    /// Camera move bound to this button, if any
    pub fn movement(self) -> Option<CameraMovement> {
        match self {
            Button::KeyW => Some(CameraMovement::Forward),
            Button::KeyS => Some(CameraMovement::Backward),
            Button::KeyA => Some(CameraMovement::Left),
            Button::KeyD => Some(CameraMovement::Right),
            _ => None,
        }
    }
}

/// Controller - handles button and pointer input state
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];

    /// Pointer movement since the last reset, in pixels (x right, y down)
    fn mouse_delta(&self) -> (f32, f32);

    /// Vertical scroll since the last reset, in lines
    fn scroll_delta(&self) -> f32;
}
