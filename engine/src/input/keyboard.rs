//! Keyboard Input Module
//!
//! Keyboard state for walking around the planet, decoupled from any
//! windowing system through a small generic key code set.
//!
//! Bindings: WASD or arrows to walk, Shift to run while held, R to toggle
//! running, E to interact.

use glam::Vec2;

use super::intent::IntentSource;

/// Generic key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    E,
    R,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ShiftLeft,
    ShiftRight,
    Escape,
    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks the current state of movement keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementKeys {
    /// W / ArrowUp - walk forward
    pub forward: bool,
    /// S / ArrowDown - walk backward
    pub backward: bool,
    /// A / ArrowLeft - strafe left
    pub left: bool,
    /// D / ArrowRight - strafe right
    pub right: bool,
    /// Shift - run while held
    pub run: bool,
}

impl MovementKeys {
    /// Create a new movement keys state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update movement state based on key press/release.
    ///
    /// Returns `true` if the key was a movement key and was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => self.forward = pressed,
            KeyCode::S | KeyCode::ArrowDown => self.backward = pressed,
            KeyCode::A | KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::D | KeyCode::ArrowRight => self.right = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.run = pressed,
            _ => return false,
        }
        true
    }

    /// Check if any movement key is currently pressed.
    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Get the forward/backward movement direction (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Get the left/right movement direction (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }

    /// Reset all movement keys to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete keyboard state: held movement keys, the run toggle and the
/// edge-triggered interact key.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub movement: MovementKeys,
    run_toggled: bool,
    interact_held: bool,
    interact_pending: bool,
}

impl KeyboardState {
    /// Create a new keyboard state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release event.
    ///
    /// Returns `true` if the key was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::R => {
                if pressed {
                    self.run_toggled = !self.run_toggled;
                }
                true
            }
            KeyCode::E => {
                // Edge-triggered: holding E fires once.
                if pressed && !self.interact_held {
                    self.interact_pending = true;
                }
                self.interact_held = pressed;
                true
            }
            _ => self.movement.handle_key(key, pressed),
        }
    }

    /// Whether run mode is toggled on.
    pub fn run_toggled(&self) -> bool {
        self.run_toggled
    }

    /// Reset all keyboard state (focus loss).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl IntentSource for KeyboardState {
    fn movement_direction(&self) -> Vec2 {
        let direction = Vec2::new(
            self.movement.right_axis() as f32,
            self.movement.forward_axis() as f32,
        );
        direction.normalize_or_zero()
    }

    fn is_running(&self) -> bool {
        self.movement.run != self.run_toggled
    }

    fn poll_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys_default() {
        let keys = MovementKeys::new();
        assert!(!keys.any_pressed());
        assert_eq!(keys.forward_axis(), 0);
        assert_eq!(keys.right_axis(), 0);
    }

    #[test]
    fn test_movement_axes() {
        let mut keys = MovementKeys::new();
        keys.handle_key(KeyCode::W, true);
        keys.handle_key(KeyCode::S, true);
        // Both pressed cancels out
        assert_eq!(keys.forward_axis(), 0);

        keys.handle_key(KeyCode::ArrowRight, true);
        assert_eq!(keys.right_axis(), 1);
    }

    #[test]
    fn test_diagonal_direction_is_unit() {
        let mut keyboard = KeyboardState::new();
        keyboard.handle_key(KeyCode::W, true);
        keyboard.handle_key(KeyCode::D, true);
        let direction = keyboard.movement_direction();
        assert!((direction.length() - 1.0).abs() < 1.0e-6);
        assert!(direction.x > 0.0 && direction.y > 0.0);
    }

    #[test]
    fn test_run_toggle_inverts_shift() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.is_running());
        keyboard.handle_key(KeyCode::R, true);
        keyboard.handle_key(KeyCode::R, false);
        assert!(keyboard.is_running());
        keyboard.handle_key(KeyCode::ShiftLeft, true);
        assert!(!keyboard.is_running());
    }

    #[test]
    fn test_interact_is_edge_triggered() {
        let mut keyboard = KeyboardState::new();
        keyboard.handle_key(KeyCode::E, true);
        keyboard.handle_key(KeyCode::E, true); // key repeat
        assert!(keyboard.poll_interact());
        assert!(!keyboard.poll_interact());
        keyboard.handle_key(KeyCode::E, false);
        keyboard.handle_key(KeyCode::E, true);
        assert!(keyboard.poll_interact());
    }

    #[test]
    fn test_non_movement_key() {
        let mut keyboard = KeyboardState::new();
        assert!(!keyboard.handle_key(KeyCode::Escape, true));
        assert!(!keyboard.is_moving());
    }
}
