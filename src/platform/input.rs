//! Keyboard and virtual-joystick input normalization

use glam::Vec2;

use crate::sim::TickInput;

/// Coerce a direction to a finite vector of length at most 1
pub fn sanitize(direction: Vec2) -> Vec2 {
    if !direction.is_finite() {
        return Vec2::ZERO;
    }
    direction.clamp_length_max(1.0)
}

/// What a physical key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Up,
    Down,
    Left,
    Right,
    Boost,
    Pause,
}

impl KeyAction {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(KeyAction::Up),
            "ArrowDown" | "KeyS" => Some(KeyAction::Down),
            "ArrowLeft" | "KeyA" => Some(KeyAction::Left),
            "ArrowRight" | "KeyD" => Some(KeyAction::Right),
            "Space" => Some(KeyAction::Boost),
            "Escape" | "KeyP" => Some(KeyAction::Pause),
            _ => None,
        }
    }
}

/// Held direction keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyboardState {
    /// Unit direction from held keys (y grows downward); opposite keys cancel
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// On-screen thumbstick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickState {
    pub active: bool,
    /// Thumb displacement from the base (px)
    pub displacement: Vec2,
    pub max_distance: f32,
}

impl Default for JoystickState {
    fn default() -> Self {
        Self {
            active: false,
            displacement: Vec2::ZERO,
            max_distance: 40.0,
        }
    }
}

impl JoystickState {
    /// Move the thumb; displacement is clamped to the stick radius
    pub fn set_thumb(&mut self, delta: Vec2) {
        self.displacement = sanitize_px(delta).clamp_length_max(self.max_distance);
        self.active = true;
    }

    pub fn release(&mut self) {
        self.active = false;
        self.displacement = Vec2::ZERO;
    }

    /// Displacement scaled into the unit disc
    pub fn direction(&self) -> Vec2 {
        if !self.active || self.max_distance <= 0.0 {
            return Vec2::ZERO;
        }
        sanitize(self.displacement / self.max_distance)
    }
}

fn sanitize_px(v: Vec2) -> Vec2 {
    if v.is_finite() { v } else { Vec2::ZERO }
}

/// Collects device state between frames and produces one `TickInput` per tick
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    pub keyboard: KeyboardState,
    pub joystick: JoystickState,
    boost_pressed: bool,
    pause_pressed: bool,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a key transition. Returns true if the key is bound.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        let Some(action) = KeyAction::from_code(code) else {
            return false;
        };
        match action {
            KeyAction::Up => self.keyboard.up = pressed,
            KeyAction::Down => self.keyboard.down = pressed,
            KeyAction::Left => self.keyboard.left = pressed,
            KeyAction::Right => self.keyboard.right = pressed,
            // Edge-triggered: only the press counts
            KeyAction::Boost => self.boost_pressed |= pressed,
            KeyAction::Pause => self.pause_pressed |= pressed,
        }
        true
    }

    /// Boost button on touch devices
    pub fn press_boost(&mut self) {
        self.boost_pressed = true;
    }

    /// Joystick wins while it is held; otherwise the keyboard
    pub fn direction(&self) -> Vec2 {
        if self.joystick.active {
            self.joystick.direction()
        } else {
            self.keyboard.direction()
        }
    }

    /// Build this tick's input and clear the one-shot presses
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            direction: self.direction(),
            boost: self.boost_pressed,
            pause: self.pause_pressed,
            autopilot: false,
        };
        self.boost_pressed = false;
        self.pause_pressed = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(Vec2::new(f32::NAN, 1.0)), Vec2::ZERO);
        assert_eq!(sanitize(Vec2::new(f32::INFINITY, 0.0)), Vec2::ZERO);
        assert!((sanitize(Vec2::new(3.0, 4.0)).length() - 1.0).abs() < 1e-6);
        assert_eq!(sanitize(Vec2::new(0.3, 0.4)), Vec2::new(0.3, 0.4));
    }

    #[test]
    fn test_keyboard_diagonal_is_normalized() {
        let keys = KeyboardState {
            up: true,
            right: true,
            ..Default::default()
        };
        let dir = keys.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.y < 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let keys = KeyboardState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(keys.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_joystick_clamps_to_radius() {
        let mut stick = JoystickState::default();
        stick.set_thumb(Vec2::new(80.0, 0.0));
        assert_eq!(stick.displacement, Vec2::new(40.0, 0.0));
        assert_eq!(stick.direction(), Vec2::X);

        stick.set_thumb(Vec2::new(0.0, 20.0));
        assert_eq!(stick.direction(), Vec2::new(0.0, 0.5));

        stick.release();
        assert_eq!(stick.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_adapter_edges_and_priority() {
        let mut adapter = InputAdapter::new();
        assert!(adapter.handle_key("KeyD", true));
        assert!(adapter.handle_key("Space", true));
        assert!(adapter.handle_key("Space", false));
        assert!(!adapter.handle_key("KeyQ", true));

        let input = adapter.take_tick_input();
        assert_eq!(input.direction, Vec2::X);
        assert!(input.boost);
        assert!(!input.pause);

        // Boost was consumed; direction key is still held
        let input = adapter.take_tick_input();
        assert!(!input.boost);
        assert_eq!(input.direction, Vec2::X);

        adapter.joystick.set_thumb(Vec2::new(0.0, -40.0));
        assert_eq!(adapter.take_tick_input().direction, Vec2::new(0.0, -1.0));
    }
}
