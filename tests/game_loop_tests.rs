//! Scheduler tests: pacing, delivery, and teardown ordering.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::KeyCode;

use pixelgames::canvas::{Canvas, Display, DisplayError, NullDisplay, Orientation};
use pixelgames::game::{EventPump, Game, GameLoop, KeyBuffer, NullEvents};
use pixelgames::types::Color;

#[derive(Clone)]
struct SharedDisplay(Rc<RefCell<NullDisplay>>);

impl SharedDisplay {
    fn new(width: u32, height: u32) -> Self {
        Self(Rc::new(RefCell::new(NullDisplay::new(width, height))))
    }

    fn quit_called(&self) -> bool {
        self.0.borrow().quit_called()
    }

    fn frames_shown(&self) -> u32 {
        self.0.borrow().frames_shown()
    }
}

impl Display for SharedDisplay {
    fn shape(&self) -> (u32, u32) {
        self.0.borrow().shape()
    }

    fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DisplayError> {
        self.0.borrow_mut().set_orientation(orientation)
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }

    fn set(&mut self, x: u32, y: u32, color: Color) {
        self.0.borrow_mut().set(x, y, color);
    }

    fn show(&mut self) -> Result<()> {
        self.0.borrow_mut().show()
    }

    fn quit(&mut self) -> Result<()> {
        self.0.borrow_mut().quit()
    }
}

/// Records every update's timestamp and key batch, then finishes.
struct RecordingGame {
    canvas: Canvas,
    ticks: Vec<f64>,
    key_batches: Vec<Vec<KeyCode>>,
    limit: usize,
    quit_ran: bool,
}

impl RecordingGame {
    fn new(display: SharedDisplay, limit: usize) -> Self {
        Self {
            canvas: Canvas::new(Box::new(display)),
            ticks: Vec::new(),
            key_batches: Vec::new(),
            limit,
            quit_ran: false,
        }
    }
}

impl Game for RecordingGame {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, now: f64, keys: &[KeyCode]) -> Result<bool> {
        self.ticks.push(now);
        self.key_batches.push(keys.to_vec());
        Ok(self.ticks.len() >= self.limit)
    }

    fn quit(&mut self) -> Result<()> {
        self.quit_ran = true;
        Ok(())
    }

    fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}

#[test]
fn test_pacing_never_updates_faster_than_the_interval() {
    let display = SharedDisplay::new(4, 4);
    let mut game = RecordingGame::new(display, 6);

    // 50 fps -> 20ms minimum between accepted updates.
    GameLoop::new(NullEvents)
        .with_fps(50.0)
        .run(&mut game)
        .unwrap();

    assert_eq!(game.ticks.len(), 6, "updates are delayed, never skipped");
    for pair in game.ticks.windows(2) {
        let gap = pair[1] - pair[0];
        // Allow a hair of float slack; the scheduler itself can only
        // err on the long side.
        assert!(gap >= 0.0199, "gap {gap} shorter than the frame interval");
    }
}

#[test]
fn test_unbounded_loop_runs_back_to_back() {
    let display = SharedDisplay::new(4, 4);
    let mut game = RecordingGame::new(display, 100);
    GameLoop::new(NullEvents).run(&mut game).unwrap();
    assert_eq!(game.ticks.len(), 100);
}

#[test]
fn test_teardown_clears_and_quits_the_display() {
    let display = SharedDisplay::new(4, 4);
    let mut game = RecordingGame::new(display.clone(), 1);
    GameLoop::new(NullEvents).run(&mut game).unwrap();

    assert!(game.quit_ran);
    assert!(display.quit_called(), "display must be released");
    // The teardown clear is presented so the device goes dark.
    assert!(display.frames_shown() >= 1);
}

/// Feeds one scripted key batch, then nothing.
struct ScriptedPump {
    batches: Vec<Vec<KeyCode>>,
}

impl EventPump for ScriptedPump {
    fn poll(&mut self, _timeout: Duration, keys: &mut KeyBuffer) -> Result<()> {
        if let Some(batch) = self.batches.pop() {
            for key in batch {
                let _ = keys.try_push(key);
            }
        }
        Ok(())
    }
}

#[test]
fn test_buffered_keys_reach_the_next_update() {
    let display = SharedDisplay::new(4, 4);
    let mut game = RecordingGame::new(display, 2);
    let pump = ScriptedPump {
        batches: vec![vec![], vec![KeyCode::Char('w'), KeyCode::Left]],
    };
    GameLoop::new(pump).run(&mut game).unwrap();

    assert_eq!(
        game.key_batches[0],
        vec![KeyCode::Char('w'), KeyCode::Left],
        "keys buffered before a tick are delivered to that tick"
    );
    assert!(
        game.key_batches[1].is_empty(),
        "delivered keys are not replayed on later ticks"
    );
}

/// A game that fails on its first update.
struct FailingGame {
    canvas: Canvas,
    quit_ran: bool,
}

impl Game for FailingGame {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, _now: f64, _keys: &[KeyCode]) -> Result<bool> {
        anyhow::bail!("update exploded")
    }

    fn quit(&mut self) -> Result<()> {
        self.quit_ran = true;
        Ok(())
    }

    fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}

#[test]
fn test_update_failure_still_restores_the_device() {
    let display = SharedDisplay::new(4, 4);
    let mut game = FailingGame {
        canvas: Canvas::new(Box::new(display.clone())),
        quit_ran: false,
    };

    let err = GameLoop::new(NullEvents).run(&mut game).unwrap_err();
    assert!(err.to_string().contains("update exploded"));
    assert!(game.quit_ran, "game quit runs on the error path");
    assert!(display.quit_called(), "display released on the error path");
}
