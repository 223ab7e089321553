//! Pacman - a grid game over the canvas, loop, and direction capabilities.
//!
//! One owning state machine holds the grid, the entities, and the canvas.
//! Time arrives as monotonic seconds through `update`, so every rule
//! (power mode, ghost cadence, flashing) is a plain elapsed-time
//! comparison and the whole game is drivable from tests without a clock.

use anyhow::Result;
use crossterm::event::KeyCode;
use log::debug;

use crate::canvas::{Canvas, Display};
use crate::game::Game;
use crate::input::{direction_for_key, should_quit, DirectionSource};
use crate::rng::SimpleRng;
use crate::types::{
    Color, Direction, GHOST_EAT_BONUS, GHOST_EAT_REVERT, GHOST_STEP_INTERVAL, PILL_SCORE,
    POWER_DURATION,
};

/// Grid width in cells.
pub const GRID_WIDTH: u32 = 16;

/// Grid height in cells.
pub const GRID_HEIGHT: u32 = 16;

/// Random heading re-rolls per ghost per tick before falling back to a
/// deterministic scan. Keeps a blocked ghost from livelocking the tick.
const GHOST_MOVE_RETRIES: u32 = 16;

const PACMAN_COLOR: Color = Color::new(1.0, 1.0, 0.0);
const GHOST_COLORS: [Color; 4] = [
    Color::new(1.0, 0.0, 1.0),
    Color::new(1.0, 0.0, 1.0),
    Color::new(1.0, 0.0, 1.0),
    Color::new(1.0, 0.0, 1.0),
];
const GHOST_VULNERABLE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

const PACMAN_SPAWN: (i32, i32) = (7, 13);
const GHOST_SPAWNS: [(i32, i32); 4] = [(7, 8), (8, 8), (7, 9), (8, 9)];

/// What a grid cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Wall,
    Pill,
    PowerPill,
    /// The ghost-house exit. Passable for ghosts (outside power mode),
    /// never for Pacman.
    Door,
}

impl CellKind {
    fn color(self) -> Color {
        match self {
            CellKind::Empty => Color::BLACK,
            CellKind::Wall => Color::new(0.0, 0.0, 1.0),
            CellKind::Pill => Color::new(0.5, 0.0, 0.0),
            CellKind::PowerPill => Color::new(1.0, 1.0, 1.0),
            CellKind::Door => Color::new(0.0, 0.0, 0.5),
        }
    }

    fn is_pill(self) -> bool {
        matches!(self, CellKind::Pill | CellKind::PowerPill)
    }
}

// Row-major maze template. 0 empty, 1 wall, 2 pill, 3 power pill, 4 door.
// The open cells on rows 7 and 8 are the wrap-around side tunnels.
#[rustfmt::skip]
const GRID_TEMPLATE: [[u8; GRID_WIDTH as usize]; GRID_HEIGHT as usize] = [
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
    [1,2,2,2,2,2,2,1,1,2,2,2,2,2,2,1],
    [1,2,1,1,1,1,2,2,2,2,1,1,1,1,2,1],
    [1,2,3,2,2,1,2,1,1,2,1,2,2,3,2,1],
    [1,1,1,1,2,2,2,1,1,2,2,2,1,1,1,1],
    [1,2,2,2,2,1,1,1,1,1,1,2,2,2,2,1],
    [1,1,2,1,2,2,2,2,2,2,2,2,1,2,1,1],
    [0,0,2,1,1,2,1,4,4,1,2,1,1,2,0,0],
    [0,0,2,2,1,2,1,0,0,1,2,1,2,2,0,0],
    [1,2,1,1,1,2,1,0,0,1,2,1,1,1,2,1],
    [1,2,2,1,2,2,2,1,1,2,2,2,1,2,2,1],
    [1,1,2,1,2,1,2,1,1,2,1,2,1,2,1,1],
    [1,2,2,2,2,1,2,1,1,2,1,2,2,2,2,1],
    [1,2,1,1,1,1,2,0,0,2,1,1,1,1,2,1],
    [1,2,3,2,2,2,2,1,1,2,2,2,2,3,2,1],
    [1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],
];

/// The maze: a fixed-size 2D array of cell kinds, mutated in place as
/// pills are eaten. Stored column-major for `[x][y]` access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// The built-in 16x16 maze.
    pub fn standard() -> Self {
        let mut grid = Grid::empty(GRID_WIDTH as i32, GRID_HEIGHT as i32);
        for (y, row) in GRID_TEMPLATE.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let kind = match code {
                    1 => CellKind::Wall,
                    2 => CellKind::Pill,
                    3 => CellKind::PowerPill,
                    4 => CellKind::Door,
                    _ => CellKind::Empty,
                };
                grid.set(x as i32, y as i32, kind);
            }
        }
        grid
    }

    fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Empty; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((x * self.height + y) as usize)
    }

    /// Cell at (x, y), or `None` out of bounds. No wrapping.
    pub fn get(&self, x: i32, y: i32) -> Option<CellKind> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set a cell; out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, kind: CellKind) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = kind;
                true
            }
            None => false,
        }
    }

    /// Wrap coordinates toroidally, independently on each axis.
    pub fn wrap(&self, x: i32, y: i32) -> (i32, i32) {
        (x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    /// Pills and power pills still on the grid.
    pub fn remaining_pills(&self) -> usize {
        self.cells.iter().filter(|c| c.is_pill()).count()
    }

    /// Build a grid from an ASCII map for tests.
    ///
    /// `#` wall, `.` pill, `*` power pill, `-` door, anything else empty.
    #[cfg(test)]
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        let mut grid = Grid::empty(width, height);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as i32, width, "ragged ascii grid");
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Pill,
                    '*' => CellKind::PowerPill,
                    '-' => CellKind::Door,
                    _ => CellKind::Empty,
                };
                grid.set(x as i32, y as i32, kind);
            }
        }
        grid
    }
}

/// Where a round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Playing,
    Won,
    Lost,
}

#[derive(Debug)]
struct Ghost {
    pos: (i32, i32),
    heading: Direction,
    last_step: f64,
    spawn: (i32, i32),
    color: Color,
}

/// The Pacman state machine.
pub struct Pacman {
    canvas: Canvas,
    grid: Grid,
    joystick: Option<Box<dyn DirectionSource>>,
    rng: SimpleRng,
    pacman: (i32, i32),
    ghosts: Vec<Ghost>,
    score: u32,
    power_started: Option<f64>,
    state: RoundState,
}

impl Pacman {
    /// Build a game over the given display, with the standard maze.
    pub fn new(
        display: Box<dyn Display>,
        joystick: Option<Box<dyn DirectionSource>>,
        seed: u32,
    ) -> Self {
        let canvas = Canvas::with_size(display, GRID_WIDTH, GRID_HEIGHT).with_wrap(true, true);
        Self::with_parts(canvas, Grid::standard(), joystick, seed)
    }

    fn with_parts(
        canvas: Canvas,
        grid: Grid,
        joystick: Option<Box<dyn DirectionSource>>,
        seed: u32,
    ) -> Self {
        let mut rng = SimpleRng::new(seed);
        let ghosts = GHOST_COLORS
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let spawn = GHOST_SPAWNS[i % GHOST_SPAWNS.len()];
                Ghost {
                    pos: spawn,
                    heading: rng.pick_direction(),
                    last_step: 0.0,
                    spawn,
                    color,
                }
            })
            .collect();

        Self {
            canvas,
            grid,
            joystick,
            rng,
            pacman: PACMAN_SPAWN,
            ghosts,
            score: 0,
            power_started: None,
            state: RoundState::Playing,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Monotonically non-decreasing score.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn power_active(&self, now: f64) -> bool {
        self.power_started
            .is_some_and(|started| now - started < POWER_DURATION)
    }

    /// Resolve the direction asked for this tick: joystick first, then
    /// every buffered key in order, so the freshest key press overrides
    /// stale joystick deflection.
    fn desired_direction(&mut self, keys: &[KeyCode]) -> Option<Direction> {
        let mut desired = None;
        if let Some(joystick) = self.joystick.as_mut() {
            let (jx, jy) = joystick.direction();
            // Joystick up is positive Y; the grid's Y grows downwards.
            desired = Direction::from_delta(jx, -jy);
        }
        for &key in keys {
            if let Some(dir) = direction_for_key(key) {
                desired = Some(dir);
            }
        }
        desired
    }

    /// Draw the static maze and report whether any pill is left.
    fn draw_grid(&mut self) -> bool {
        let mut has_pill = false;
        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                if let Some(cell) = self.grid.get(x, y) {
                    self.canvas.set(x as f64, y as f64, cell.color());
                    has_pill |= cell.is_pill();
                }
            }
        }
        has_pill
    }

    fn try_move_pacman(&mut self, dir: Direction) {
        let (dx, dy) = dir.delta();
        let (nx, ny) = self.grid.wrap(self.pacman.0 + dx, self.pacman.1 + dy);
        match self.grid.get(nx, ny) {
            Some(CellKind::Wall) | Some(CellKind::Door) | None => {}
            _ => self.pacman = (nx, ny),
        }
    }

    fn eat_cell(&mut self, now: f64) {
        let (x, y) = self.pacman;
        match self.grid.get(x, y) {
            Some(CellKind::Pill) => {
                self.score += PILL_SCORE;
                self.grid.set(x, y, CellKind::Empty);
            }
            Some(CellKind::PowerPill) => {
                self.power_started = Some(now);
                self.grid.set(x, y, CellKind::Empty);
            }
            _ => {}
        }
    }

    fn ghost_can_enter(&self, x: i32, y: i32, power: bool) -> bool {
        match self.grid.get(x, y) {
            Some(CellKind::Wall) | None => false,
            // Vulnerable ghosts must not slip back out through the door.
            Some(CellKind::Door) => !power,
            _ => true,
        }
    }

    /// One movement attempt for one ghost.
    ///
    /// The junction scan deliberately keeps the original's biased choice:
    /// candidates are examined in fixed cardinal order with an
    /// independent 50% acceptance each, the reversal of the current
    /// heading is never a candidate, and the heading is kept when nothing
    /// is accepted. The scan looks at unwrapped neighbors only; the move
    /// itself wraps.
    fn step_ghost(&mut self, i: usize, now: f64, power: bool) {
        if now - self.ghosts[i].last_step < GHOST_STEP_INTERVAL {
            return;
        }

        for _ in 0..GHOST_MOVE_RETRIES {
            let pos = self.ghosts[i].pos;
            let mut heading = self.ghosts[i].heading;

            for dir in Direction::ALL {
                if dir == heading.opposite() {
                    continue;
                }
                let (dx, dy) = dir.delta();
                match self.grid.get(pos.0 + dx, pos.1 + dy) {
                    None | Some(CellKind::Wall) => continue,
                    _ => {}
                }
                if self.rng.coin() {
                    heading = dir;
                    self.ghosts[i].heading = dir;
                    break;
                }
            }

            let (dx, dy) = heading.delta();
            let (nx, ny) = self.grid.wrap(pos.0 + dx, pos.1 + dy);
            if self.ghost_can_enter(nx, ny, power) {
                let ghost = &mut self.ghosts[i];
                ghost.pos = (nx, ny);
                ghost.last_step = now;
                return;
            }

            // Blocked: roll a wholly new heading and try again.
            let fresh = self.rng.pick_direction();
            self.ghosts[i].heading = fresh;
        }

        // Random retries exhausted; take any legal move deterministically
        // so a ghost with an open neighbor always resolves.
        let pos = self.ghosts[i].pos;
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let (nx, ny) = self.grid.wrap(pos.0 + dx, pos.1 + dy);
            if self.ghost_can_enter(nx, ny, power) {
                let ghost = &mut self.ghosts[i];
                ghost.heading = dir;
                ghost.pos = (nx, ny);
                ghost.last_step = now;
                return;
            }
        }
        // Boxed in on all four sides: stay put this tick.
    }

    fn ghost_draw_color(&self, ghost: &Ghost, now: f64) -> Color {
        match self.power_started {
            Some(started) if now - started < POWER_DURATION => {
                let steady = now - started < POWER_DURATION - GHOST_EAT_REVERT;
                if steady || (now * 10.0).floor() as i64 % 2 == 0 {
                    GHOST_VULNERABLE_COLOR
                } else {
                    ghost.color
                }
            }
            _ => ghost.color,
        }
    }

    fn draw_entities(&mut self, now: f64) {
        for i in 0..self.ghosts.len() {
            let color = self.ghost_draw_color(&self.ghosts[i], now);
            let (x, y) = self.ghosts[i].pos;
            self.canvas.set(x as f64, y as f64, color);
        }
        // Pacman last, atop any overlapping ghost.
        let (x, y) = self.pacman;
        self.canvas.set(x as f64, y as f64, PACMAN_COLOR);
    }

    fn check_collisions(&mut self, power: bool) {
        for i in 0..self.ghosts.len() {
            if self.ghosts[i].pos != self.pacman {
                continue;
            }
            if power {
                // Eaten: bonus and an instant respawn.
                self.score += GHOST_EAT_BONUS;
                self.ghosts[i].pos = self.ghosts[i].spawn;
            } else {
                self.state = RoundState::Lost;
                return;
            }
        }
    }
}

impl Game for Pacman {
    fn init(&mut self) -> Result<()> {
        debug!(
            "pacman starting: {} pills on the grid",
            self.grid.remaining_pills()
        );
        Ok(())
    }

    fn update(&mut self, now: f64, keys: &[KeyCode]) -> Result<bool> {
        debug!("tick now={now:.3} keys={keys:?}");
        if self.state != RoundState::Playing {
            return Ok(true);
        }
        if keys.iter().copied().any(should_quit) {
            return Ok(true);
        }

        self.canvas.clear();

        let has_pill = self.draw_grid();
        if !has_pill {
            self.state = RoundState::Won;
            return Ok(true);
        }

        if let Some(dir) = self.desired_direction(keys) {
            debug!("direction {dir:?}");
            self.try_move_pacman(dir);
        }
        self.eat_cell(now);

        let power = self.power_active(now);
        for i in 0..self.ghosts.len() {
            self.step_ghost(i, now, power);
        }

        self.draw_entities(now);
        self.canvas.show()?;

        self.check_collisions(power);
        Ok(self.state != RoundState::Playing)
    }

    fn quit(&mut self) -> Result<()> {
        debug!("round over: {:?}, score {}", self.state, self.score);
        if let Some(mut joystick) = self.joystick.take() {
            joystick.quit();
        }
        Ok(())
    }

    fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}
