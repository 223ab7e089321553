//! Terminal display backend.
//!
//! Renders logical pixels into a raw-mode terminal, two character cells
//! wide per pixel so pixels come out roughly square.

pub mod display;

pub use display::TerminalDisplay;
