//! Canvas module - logical drawing surface over a pixel display.
//!
//! The `Canvas` turns continuous, possibly out-of-range, floating point
//! drawing requests into integer pixel writes on an owned [`Display`].
//! Out-of-range coordinates are never an error: each axis either wraps
//! toroidally or clips silently, so gameplay code never bounds-checks.

pub mod null;

pub use null::NullDisplay;

use anyhow::Result;
use thiserror::Error;

use crate::types::Color;

/// Configuration-time display failures.
///
/// Drawing never errors; these surface only while setting a device up.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("bad orientation: {0} (expected 0, 90, 180 or 270)")]
    BadOrientation(u32),
    #[error("orientation changes are not supported by this display")]
    OrientationUnsupported,
    #[error("display is unusable: {0}")]
    Unusable(String),
}

/// A display orientation, in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    /// Parse an orientation from degrees. Anything but 0/90/180/270 is a
    /// configuration error.
    pub fn from_degrees(degrees: u32) -> Result<Self, DisplayError> {
        match degrees {
            0 => Ok(Orientation::Deg0),
            90 => Ok(Orientation::Deg90),
            180 => Ok(Orientation::Deg180),
            270 => Ok(Orientation::Deg270),
            other => Err(DisplayError::BadOrientation(other)),
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }
}

/// The capability a hardware or terminal backend must provide.
///
/// The canvas validates and clamps everything before calling in, so
/// implementations may assume `x < width`, `y < height` and color
/// channels in [0, 1].
pub trait Display {
    /// Pixel dimensions as (width, height).
    fn shape(&self) -> (u32, u32);

    /// Rotate the device output. Devices with a fixed orientation return
    /// [`DisplayError::OrientationUnsupported`].
    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError>;

    /// Reset the back buffer to black.
    fn clear(&mut self);

    /// Write one pixel.
    fn set(&mut self, x: u32, y: u32, color: Color);

    /// Present the in-progress frame.
    fn show(&mut self) -> Result<()>;

    /// Graceful device shutdown (restore the terminal, reset the panel).
    fn quit(&mut self) -> Result<()>;
}

/// Logical drawing surface bound to one display for its whole lifetime.
pub struct Canvas {
    display: Box<dyn Display>,
    width: u32,
    height: u32,
    xwrap: bool,
    ywrap: bool,
}

impl Canvas {
    /// Create a canvas matching the display's own shape, no wrapping.
    pub fn new(display: Box<dyn Display>) -> Self {
        let (width, height) = display.shape();
        Self {
            display,
            width,
            height,
            xwrap: false,
            ywrap: false,
        }
    }

    /// Create a canvas with an explicit logical extent.
    ///
    /// Logical pixels map 1:1 onto device pixels; draws beyond the
    /// device extent clip silently.
    pub fn with_size(display: Box<dyn Display>, width: u32, height: u32) -> Self {
        Self {
            display,
            width,
            height,
            xwrap: false,
            ywrap: false,
        }
    }

    /// Enable or disable toroidal wrapping per axis.
    pub fn with_wrap(mut self, xwrap: bool, ywrap: bool) -> Self {
        self.xwrap = xwrap;
        self.ywrap = ywrap;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw a single logical pixel at (x, y).
    ///
    /// Equivalent to [`Canvas::set_sized`] with size 1.
    pub fn set(&mut self, x: f64, y: f64, color: Color) {
        self.set_sized(x, y, color, 1.0);
    }

    /// Draw a filled disk of the given logical size centered at (x, y).
    ///
    /// `size <= 1` writes the single nearest pixel. Larger sizes write
    /// every pixel whose center lies within `size` of the point. Each
    /// written pixel is independently wrapped or clipped per axis, so a
    /// disk crossing a wrapped edge reappears on the far side.
    pub fn set_sized(&mut self, x: f64, y: f64, color: Color, size: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let color = color.clamped();

        if size <= 1.0 {
            self.put(x.round() as i64, y.round() as i64, color);
            return;
        }

        let r2 = size * size;
        let Some((x0, x1)) = scan_span(x, size, self.width, self.xwrap) else {
            return;
        };
        let Some((y0, y1)) = scan_span(y, size, self.height, self.ywrap) else {
            return;
        };
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 - x;
                let dy = py as f64 - y;
                if dx * dx + dy * dy <= r2 {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Bulk overwrite from a 2D row-major color buffer, ignoring wrap.
    ///
    /// Rows map 1:1 onto canvas rows starting at the origin; anything
    /// outside the canvas or device extent is dropped.
    pub fn set_image(&mut self, rows: &[Vec<Color>]) {
        for (y, row) in rows.iter().enumerate() {
            if y as u64 >= self.height as u64 {
                break;
            }
            for (x, &color) in row.iter().enumerate() {
                if x as u64 >= self.width as u64 {
                    break;
                }
                self.put_device(x as u32, y as u32, color.clamped());
            }
        }
    }

    /// Reset the back buffer to black.
    pub fn clear(&mut self) {
        self.display.clear();
    }

    /// Present the frame.
    pub fn show(&mut self) -> Result<()> {
        self.display.show()
    }

    /// Shut the owned display down.
    pub fn quit(&mut self) -> Result<()> {
        self.display.quit()
    }

    /// Map one integer pixel through the per-axis wrap/clip policy and
    /// write it if it lands on the surface.
    fn put(&mut self, x: i64, y: i64, color: Color) {
        let Some(x) = map_axis(x, self.width, self.xwrap) else {
            return;
        };
        let Some(y) = map_axis(y, self.height, self.ywrap) else {
            return;
        };
        self.put_device(x, y, color);
    }

    fn put_device(&mut self, x: u32, y: u32, color: Color) {
        let (dw, dh) = self.display.shape();
        if x < dw && y < dh {
            self.display.set(x, y, color);
        }
    }
}

/// The integer scan range for a disk along one axis.
///
/// A wrapped axis never needs more than one full period; further turns
/// revisit the same pixels, so an oversized box is re-anchored around
/// the center. A clipped axis is bounded by the surface, and `None`
/// means the whole disk misses it.
fn scan_span(center: f64, size: f64, extent: u32, wrap: bool) -> Option<(i64, i64)> {
    let mut lo = (center - size).floor() as i64;
    let mut hi = (center + size).ceil() as i64;
    if wrap {
        let extent = extent as i64;
        if hi - lo + 1 > extent {
            lo = center.floor() as i64 - extent / 2;
            hi = lo + extent - 1;
        }
        Some((lo, hi))
    } else {
        lo = lo.max(0);
        hi = hi.min(extent as i64 - 1);
        if lo > hi {
            None
        } else {
            Some((lo, hi))
        }
    }
}

/// Wrap or clip one axis. `None` means the pixel is off-surface.
fn map_axis(v: i64, extent: u32, wrap: bool) -> Option<u32> {
    if extent == 0 {
        return None;
    }
    if wrap {
        Some(v.rem_euclid(extent as i64) as u32)
    } else if (0..extent as i64).contains(&v) {
        Some(v as u32)
    } else {
        None
    }
}
