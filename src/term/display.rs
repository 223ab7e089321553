//! TerminalDisplay: the crossterm implementation of the Display trait.
//!
//! Construction takes the terminal over (raw mode, alternate screen,
//! hidden cursor); `quit` restores it. `show` flushes the whole back
//! buffer with queued commands.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor},
    terminal, QueueableCommand,
};

use crate::canvas::{Display, DisplayError, Orientation};
use crate::types::Color;

/// Two terminal columns per logical pixel.
const CELL_WIDTH: u32 = 2;

pub struct TerminalDisplay {
    stdout: io::Stdout,
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    active: bool,
}

impl TerminalDisplay {
    /// Take the current terminal over as a pixel display.
    ///
    /// Fails fast, with the terminal untouched, when the window size is
    /// unusable; failures while entering raw mode roll the terminal back
    /// before propagating.
    pub fn new() -> Result<Self, DisplayError> {
        let (cols, rows) =
            terminal::size().map_err(|err| DisplayError::Unusable(err.to_string()))?;
        let width = cols as u32 / CELL_WIDTH;
        let height = rows as u32;
        if width == 0 || height == 0 {
            return Err(DisplayError::Unusable(format!(
                "terminal too small: {cols}x{rows}"
            )));
        }

        let mut display = Self {
            stdout: io::stdout(),
            width,
            height,
            pixels: vec![Color::BLACK; (width as usize) * (height as usize)],
            active: false,
        };
        if let Err(err) = display.enter() {
            let _ = display.restore();
            return Err(DisplayError::Unusable(err.to_string()));
        }
        Ok(display)
    }

    fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }
}

impl Display for TerminalDisplay {
    fn shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_orientation(&mut self, _orientation: Orientation) -> Result<(), DisplayError> {
        Err(DisplayError::OrientationUnsupported)
    }

    fn clear(&mut self) {
        self.pixels.fill(Color::BLACK);
    }

    fn set(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn show(&mut self) -> Result<()> {
        let mut current: Option<(u8, u8, u8)> = None;
        for y in 0..self.height {
            self.stdout.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let rgb = self.pixels[(y * self.width + x) as usize].to_rgb8();
                if current != Some(rgb) {
                    let (r, g, b) = rgb;
                    self.stdout
                        .queue(SetBackgroundColor(crossterm::style::Color::Rgb {
                            r,
                            g,
                            b,
                        }))?;
                    current = Some(rgb);
                }
                self.stdout.queue(Print("  "))?;
            }
        }
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        self.restore()?;
        Ok(())
    }
}
