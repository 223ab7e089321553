//! pixelgames: animated pixel content and small real-time games for
//! small addressable displays.
//!
//! Three pieces make up the core:
//! - [`canvas`]: turns continuous drawing requests into device pixel
//!   writes with per-axis wrap and clamping over a [`canvas::Display`]
//!   capability;
//! - [`game`]: a cooperative frame-paced scheduler driving a
//!   [`game::Game`] implementation;
//! - [`pacman`]: the Pacman state machine built on both.
//!
//! Hardware backends implement [`canvas::Display`]; joystick-style
//! devices implement [`input::DirectionSource`]. The bundled
//! [`term::TerminalDisplay`] drives an ordinary terminal.

pub mod canvas;
pub mod game;
pub mod input;
pub mod pacman;
pub mod rng;
pub mod term;
pub mod types;

pub use canvas::{Canvas, Display, DisplayError, NullDisplay, Orientation};
pub use game::{CrosstermEvents, EventPump, Game, GameLoop, NullEvents};
pub use input::DirectionSource;
pub use pacman::{Pacman, RoundState};
pub use types::{Color, Direction};
