//! Input capabilities: joystick-style direction sources and key mapping.
//!
//! Concrete joystick device enumeration lives outside this crate; games
//! consume the [`DirectionSource`] capability only.

use crossterm::event::KeyCode;

use crate::types::Direction;

/// A polled, discretized direction input (joystick, d-pad, hat).
pub trait DirectionSource {
    /// Current deflection as (dx, dy), each in {-1, 0, 1}.
    ///
    /// Positive dy means "up" in joystick terms; callers translate to
    /// grid coordinates themselves.
    fn direction(&mut self) -> (i8, i8);

    /// Whether the button with the given index is currently pressed.
    fn is_button_pressed(&mut self, index: usize) -> bool;

    /// Release the device.
    fn quit(&mut self);
}

/// Map a key code onto a cardinal direction (WASD plus arrow keys).
///
/// Unrecognized keys map to `None` and are ignored by games.
pub fn direction_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

/// Whether a key asks to leave the game.
pub fn should_quit(code: KeyCode) -> bool {
    matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
}
