//! Shared types and constants.
//!
//! Pure data structures used by the canvas, the game loop, and the games
//! themselves. Nothing here touches a device or performs I/O.

/// The four cardinal headings on the grid.
///
/// `Direction::ALL` lists them in the fixed order (Up, Down, Left, Right)
/// that the ghost junction logic scans candidates in. That order is
/// observable gameplay behavior, so keep it stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in junction-scan order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step for this heading. Y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The 180-degree reversal of this heading.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Build a direction from a discretized (dx, dy) pair, if non-zero.
    ///
    /// Horizontal movement wins when both axes are deflected, matching how
    /// joystick input is folded into a single grid step.
    pub fn from_delta(dx: i8, dy: i8) -> Option<Direction> {
        match (dx, dy) {
            (d, _) if d < 0 => Some(Direction::Left),
            (d, _) if d > 0 => Some(Direction::Right),
            (_, d) if d < 0 => Some(Direction::Up),
            (_, d) if d > 0 => Some(Direction::Down),
            _ => None,
        }
    }
}

/// An RGB color with float channels nominally in [0, 1].
///
/// Channels outside the range are legal everywhere; backends receive
/// clamped values only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// This color with every channel clamped to [0, 1].
    pub fn clamped(self) -> Color {
        Color::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    /// Convert to 8-bit channels (clamping first).
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let c = self.clamped();
        (
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
        )
    }
}

/// How long ghosts stay vulnerable after a power pill, in seconds.
pub const POWER_DURATION: f64 = 10.0;

/// Ghosts flash back towards their normal color for this many final
/// seconds of power mode.
pub const GHOST_EAT_REVERT: f64 = 3.0;

/// Seconds between ghost steps.
pub const GHOST_STEP_INTERVAL: f64 = 0.3;

/// Score awarded for eating a vulnerable ghost.
pub const GHOST_EAT_BONUS: u32 = 20;

/// Score awarded per pill.
pub const PILL_SCORE: u32 = 1;
