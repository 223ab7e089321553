//! Playable Pacman in a terminal.
//!
//! Controls: WASD or arrow keys to steer, Esc or `q` to leave.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use pixelgames::game::{CrosstermEvents, GameLoop};
use pixelgames::pacman::Pacman;
use pixelgames::term::TerminalDisplay;

fn main() -> Result<()> {
    env_logger::init();

    let display = TerminalDisplay::new()?;
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(1);
    let mut game = Pacman::new(Box::new(display), None, seed);

    // 60 Hz is plenty above the 0.3s ghost cadence.
    let result = GameLoop::new(CrosstermEvents).with_fps(60.0).run(&mut game);

    // Printed after teardown so it survives the terminal restore.
    println!("You scored: {}", game.score());
    result
}
