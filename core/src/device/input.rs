//! Input collaborator interface.
//!
//! Six digital buttons, polled. Debouncing and GPIO wiring live behind the
//! implementation.

/// The device's physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
}

impl Button {
    /// All buttons, for iteration in frontends and tests.
    pub const ALL: [Button; 6] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::A,
        Button::B,
    ];
}

/// Polled digital input state.
pub trait InputPad {
    /// Whether `button` is currently held.
    fn pressed(&self, button: Button) -> bool;
}
