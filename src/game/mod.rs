//! Game loop module - cooperative frame-paced scheduler.
//!
//! The loop owns no game logic. It paces a game's `update` to a target
//! frame rate, hands it monotonic time plus the key presses buffered
//! since the previous tick, and guarantees ordered best-effort teardown
//! whether the game finishes, fails, or the input backend errors.

use std::time::{Duration, Instant};

use anyhow::Result;
use arrayvec::ArrayVec;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::warn;

use crate::canvas::Canvas;

/// Upper bound on buffered key presses per tick; overflow drops the rest.
pub const MAX_KEYS_PER_TICK: usize = 32;

/// Fixed-capacity per-tick key buffer.
pub type KeyBuffer = ArrayVec<KeyCode, MAX_KEYS_PER_TICK>;

/// The lifecycle every game implements.
///
/// The loop drives `init` once, `update` repeatedly, and `quit` exactly
/// once, unconditionally, on the way out.
pub trait Game {
    /// Acquire game state and collaborators.
    fn init(&mut self) -> Result<()>;

    /// One tick. `now` is monotonic seconds since the loop started;
    /// `keys` are the key presses buffered since the previous tick.
    ///
    /// Returns `Ok(true)` when the game is done.
    fn update(&mut self, now: f64, keys: &[KeyCode]) -> Result<bool>;

    /// Release game-owned collaborators (not the canvas; the loop
    /// handles that in its teardown sequence).
    fn quit(&mut self) -> Result<()>;

    /// The game's canvas, needed by the loop's teardown sequence.
    fn canvas_mut(&mut self) -> &mut Canvas;
}

/// Source of buffered key presses, doubling as the pacing sleep.
///
/// A seam rather than a direct crossterm call so the scheduler can be
/// exercised headlessly with a fake game.
pub trait EventPump {
    /// Wait up to `timeout`, appending any key presses that arrive.
    ///
    /// Returning before the timeout elapses is fine; the loop re-checks
    /// its pacing and polls again.
    fn poll(&mut self, timeout: Duration, keys: &mut KeyBuffer) -> Result<()>;
}

/// Terminal key presses via crossterm's event queue.
pub struct CrosstermEvents;

impl EventPump for CrosstermEvents {
    fn poll(&mut self, timeout: Duration, keys: &mut KeyBuffer) -> Result<()> {
        drain_keys(&mut CrosstermRaw, timeout, keys)
    }
}

/// The raw source under [`CrosstermEvents`]; a seam so the drain loop
/// is exercisable without a terminal.
trait RawEvents {
    fn poll(&mut self, timeout: Duration) -> Result<bool>;
    fn read(&mut self) -> Result<Event>;
}

struct CrosstermRaw;

impl RawEvents for CrosstermRaw {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(event::read()?)
    }
}

/// Wait up to `timeout` for events and drain everything pending.
///
/// Pending events are read to exhaustion even with a zero timeout, so a
/// burst of presses lands in one tick's buffer instead of trickling in
/// one per tick. Once the deadline passes, `poll` with a zero remainder
/// stops the loop as soon as the queue is empty.
fn drain_keys<R: RawEvents>(raw: &mut R, timeout: Duration, keys: &mut KeyBuffer) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !raw.poll(remaining)? {
            return Ok(());
        }
        if let Event::Key(key) = raw.read()? {
            // Repeats and releases are not part of the key stream.
            if key.kind == KeyEventKind::Press {
                let _ = keys.try_push(key.code);
            }
        }
    }
}

/// A pump with no input: sleeps out its timeout. For headless displays
/// and scheduler tests.
pub struct NullEvents;

impl EventPump for NullEvents {
    fn poll(&mut self, timeout: Duration, _keys: &mut KeyBuffer) -> Result<()> {
        if !timeout.is_zero() {
            std::thread::sleep(timeout);
        }
        Ok(())
    }
}

/// Frame-paced scheduler for a [`Game`].
pub struct GameLoop<P: EventPump> {
    pump: P,
    frame_interval: Duration,
}

impl<P: EventPump> GameLoop<P> {
    /// A loop with no frame-rate bound.
    pub fn new(pump: P) -> Self {
        Self {
            pump,
            frame_interval: Duration::ZERO,
        }
    }

    /// Bound updates to at most `fps` per second (floored at 0.01).
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.frame_interval = Duration::from_secs_f64(1.0 / fps.max(0.01));
        self
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Run the game to completion.
    ///
    /// Teardown runs unconditionally and in order (game, canvas
    /// clear/show, display quit), each step independently guarded so a
    /// failure cannot block the next; the first error from `init`,
    /// `update`, or the pump is what propagates.
    pub fn run(&mut self, game: &mut dyn Game) -> Result<()> {
        let result = match game.init() {
            Ok(()) => self.run_ticks(game),
            Err(err) => Err(err),
        };
        self.teardown(game);
        result
    }

    fn run_ticks(&mut self, game: &mut dyn Game) -> Result<()> {
        let epoch = Instant::now();
        let mut last_tick: Option<Instant> = None;
        let mut keys = KeyBuffer::new();

        loop {
            // Don't update too fast. The pacing sleep doubles as the
            // input wait, so early key presses buffer instead of spinning.
            if let Some(last) = last_tick {
                let since = last.elapsed();
                if since < self.frame_interval {
                    self.pump.poll(self.frame_interval - since, &mut keys)?;
                    continue;
                }
            }

            // Drain whatever else arrived without waiting.
            self.pump.poll(Duration::ZERO, &mut keys)?;

            let now = epoch.elapsed().as_secs_f64();
            let done = game.update(now, &keys)?;
            keys.clear();
            if done {
                return Ok(());
            }
            // Only an accepted "continue" tick advances the clock.
            last_tick = Some(Instant::now());
        }
    }

    fn teardown(&mut self, game: &mut dyn Game) {
        if let Err(err) = game.quit() {
            warn!("game teardown failed: {err:#}");
        }
        let canvas = game.canvas_mut();
        canvas.clear();
        if let Err(err) = canvas.show() {
            warn!("canvas clear on teardown failed: {err:#}");
        }
        if let Err(err) = canvas.quit() {
            warn!("display shutdown failed: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::NullDisplay;

    struct CountingGame {
        canvas: Canvas,
        updates: u32,
        limit: u32,
        quit_calls: u32,
        fail_update: bool,
    }

    impl CountingGame {
        fn new(limit: u32) -> Self {
            Self {
                canvas: Canvas::new(Box::new(NullDisplay::new(4, 4))),
                updates: 0,
                limit,
                quit_calls: 0,
                fail_update: false,
            }
        }
    }

    impl Game for CountingGame {
        fn init(&mut self) -> Result<()> {
            Ok(())
        }

        fn update(&mut self, _now: f64, _keys: &[KeyCode]) -> Result<bool> {
            if self.fail_update {
                anyhow::bail!("boom");
            }
            self.updates += 1;
            Ok(self.updates >= self.limit)
        }

        fn quit(&mut self) -> Result<()> {
            self.quit_calls += 1;
            Ok(())
        }

        fn canvas_mut(&mut self) -> &mut Canvas {
            &mut self.canvas
        }
    }

    #[test]
    fn test_loop_stops_when_update_reports_done() {
        let mut game = CountingGame::new(3);
        GameLoop::new(NullEvents).run(&mut game).unwrap();
        assert_eq!(game.updates, 3);
        assert_eq!(game.quit_calls, 1);
    }

    #[test]
    fn test_update_error_propagates_after_teardown() {
        let mut game = CountingGame::new(10);
        game.fail_update = true;
        let err = GameLoop::new(NullEvents).run(&mut game).unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(game.quit_calls, 1, "quit must run even when update fails");
    }

    struct QueuedRaw {
        pending: std::collections::VecDeque<Event>,
    }

    impl RawEvents for QueuedRaw {
        fn poll(&mut self, _timeout: Duration) -> Result<bool> {
            Ok(!self.pending.is_empty())
        }

        fn read(&mut self) -> Result<Event> {
            self.pending
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("read with nothing pending"))
        }
    }

    #[test]
    fn test_zero_timeout_poll_drains_every_pending_press() {
        use crossterm::event::{KeyEvent, KeyModifiers};

        let press = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        let mut raw = QueuedRaw {
            pending: [
                press('a'),
                Event::FocusGained,
                Event::Key(KeyEvent::new_with_kind(
                    KeyCode::Char('x'),
                    KeyModifiers::NONE,
                    KeyEventKind::Release,
                )),
                press('b'),
                press('c'),
            ]
            .into(),
        };

        let mut keys = KeyBuffer::new();
        drain_keys(&mut raw, Duration::ZERO, &mut keys).unwrap();
        assert_eq!(
            keys.to_vec(),
            vec![KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Char('c')],
            "a burst of presses lands in one buffer, releases filtered"
        );
    }

    #[test]
    fn test_with_fps_floors_tiny_rates() {
        // 0.01 fps floor keeps the interval finite (about 100s).
        let lp = GameLoop::new(NullEvents).with_fps(0.0);
        assert!(lp.frame_interval() >= Duration::from_secs(99));
        assert!(lp.frame_interval() <= Duration::from_secs(101));

        let lp = GameLoop::new(NullEvents).with_fps(100.0);
        assert_eq!(lp.frame_interval(), Duration::from_millis(10));
    }
}
