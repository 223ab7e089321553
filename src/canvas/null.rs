//! An in-memory display with no device behind it.
//!
//! Useful for headless runs and for asserting on exactly what a frame
//! contains in tests.

use anyhow::Result;

use crate::canvas::{Display, DisplayError, Orientation};
use crate::types::Color;

/// A display that renders into an inspectable RGB buffer.
pub struct NullDisplay {
    width: u32,
    height: u32,
    orientation: Orientation,
    pixels: Vec<Color>,
    frames_shown: u32,
    quit_called: bool,
}

impl NullDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            orientation: Orientation::Deg0,
            pixels: vec![Color::BLACK; (width as usize) * (height as usize)],
            frames_shown: 0,
            quit_called: false,
        }
    }

    /// Read one pixel back (post-orientation device coordinates).
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.index(x, y).map_or(Color::BLACK, |i| self.pixels[i])
    }

    /// How many frames have been presented.
    pub fn frames_shown(&self) -> u32 {
        self.frames_shown
    }

    /// Whether `quit` ran; lets teardown-order tests observe release.
    pub fn quit_called(&self) -> bool {
        self.quit_called
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Apply the orientation transform, mapping logical to device
    /// coordinates. 90/270 transpose, so only square buffers rotate
    /// losslessly; anything falling off the buffer is dropped.
    fn orient(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        match self.orientation {
            Orientation::Deg0 => Some((x, y)),
            Orientation::Deg90 => Some((y, x)),
            Orientation::Deg180 => {
                if x < self.width && y < self.height {
                    Some((self.width - 1 - x, self.height - 1 - y))
                } else {
                    None
                }
            }
            Orientation::Deg270 => {
                if y < self.width && x < self.height {
                    Some((self.width - 1 - y, self.height - 1 - x))
                } else {
                    None
                }
            }
        }
    }
}

impl Display for NullDisplay {
    fn shape(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError> {
        self.orientation = orientation;
        Ok(())
    }

    fn clear(&mut self) {
        self.pixels.fill(Color::BLACK);
    }

    fn set(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.orient(x, y).and_then(|(dx, dy)| self.index(dx, dy)) {
            self.pixels[i] = color;
        }
    }

    fn show(&mut self) -> Result<()> {
        self.frames_shown += 1;
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        self.quit_called = true;
        Ok(())
    }
}
