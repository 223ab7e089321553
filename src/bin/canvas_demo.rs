//! Bounce some soft-circle points around the canvas to make sure it
//! works. Any key ends the demo.

use anyhow::Result;
use crossterm::event::KeyCode;

use pixelgames::canvas::Canvas;
use pixelgames::game::{CrosstermEvents, Game, GameLoop};
use pixelgames::rng::SimpleRng;
use pixelgames::term::TerminalDisplay;
use pixelgames::types::Color;

const POINTS: usize = 3;
const POINT_SIZE: f64 = 5.0;

struct Point {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    color: Color,
    vcolor: (f32, f32, f32),
}

struct BounceDemo {
    canvas: Canvas,
    points: Vec<Point>,
    rng: SimpleRng,
}

impl BounceDemo {
    fn new(canvas: Canvas, seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let (w, h) = (canvas.width() as f64, canvas.height() as f64);
        let unit = |r: &mut SimpleRng| r.next_range(1000) as f64 / 1000.0;
        let points = (0..POINTS)
            .map(|_| Point {
                x: unit(&mut rng) * w,
                y: unit(&mut rng) * h,
                vx: 0.3 + unit(&mut rng) * 0.2,
                vy: 0.4 + unit(&mut rng) * 0.1,
                color: Color::new(
                    unit(&mut rng) as f32,
                    unit(&mut rng) as f32,
                    unit(&mut rng) as f32,
                ),
                vcolor: (
                    (unit(&mut rng) as f32 - 0.5) * 0.01,
                    (unit(&mut rng) as f32 - 0.5) * 0.01,
                    (unit(&mut rng) as f32 - 0.5) * 0.01,
                ),
            })
            .collect();
        Self {
            canvas,
            points,
            rng,
        }
    }
}

impl Game for BounceDemo {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, _now: f64, keys: &[KeyCode]) -> Result<bool> {
        if !keys.is_empty() {
            return Ok(true);
        }

        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.canvas.clear();
        for p in &mut self.points {
            if p.x < 0.0 {
                p.vx = self.rng.next_range(250) as f64 / 1000.0 + 0.25;
            }
            if p.x > w - 1.0 {
                p.vx = -(self.rng.next_range(250) as f64 / 1000.0 + 0.25);
            }
            if p.y < 0.0 {
                p.vy = self.rng.next_range(250) as f64 / 1000.0 + 0.25;
            }
            if p.y > h - 1.0 {
                p.vy = -(self.rng.next_range(250) as f64 / 1000.0 + 0.25);
            }
            p.x += p.vx;
            p.y += p.vy;

            // Drift each channel, bouncing off the [0, 1] ends.
            let (mut vr, mut vg, mut vb) = p.vcolor;
            p.color.r += vr;
            p.color.g += vg;
            p.color.b += vb;
            if !(0.0..=1.0).contains(&p.color.r) {
                vr = -vr;
            }
            if !(0.0..=1.0).contains(&p.color.g) {
                vg = -vg;
            }
            if !(0.0..=1.0).contains(&p.color.b) {
                vb = -vb;
            }
            p.vcolor = (vr, vg, vb);

            self.canvas.set_sized(p.x, p.y, p.color, POINT_SIZE);
        }
        self.canvas.show()?;
        Ok(false)
    }

    fn quit(&mut self) -> Result<()> {
        Ok(())
    }

    fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let display = TerminalDisplay::new()?;
    let canvas = Canvas::new(Box::new(display)).with_wrap(true, true);
    let mut demo = BounceDemo::new(canvas, 0xC0FFEE);
    GameLoop::new(CrosstermEvents).with_fps(100.0).run(&mut demo)
}
