//! Platform adapters
//!
//! Turns raw device state (keys, touch joystick) into the normalized
//! `TickInput` the simulation consumes. Device event capture itself stays in
//! the host (browser or native shell).

pub mod input;

pub use input::{InputAdapter, JoystickState, KeyAction, KeyboardState, sanitize};
