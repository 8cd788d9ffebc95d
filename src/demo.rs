//! Built-in demo program.
//!
//! Generates a ball sprite, then moves it with the arrow keys or WASD until
//! Escape is pressed. Needs no asset files.

use std::f64::consts::PI;

use crate::program::{self, frame, setup};
use crate::types::{Alignment, Color, Filter, KeyState};
use crate::value::{Term, Value};

const WIDTH: i64 = 160;
const HEIGHT: i64 = 96;
const BALL: i64 = 16;
const SPEED: f64 = 1.5;

#[derive(Debug, Clone, Copy)]
struct State {
    x: f64,
    y: f64,
    angle: f64,
}

/// Entry point of the demo program.
pub fn program() -> Term {
    setup::log(
        "effect-host demo",
        setup::generate_image(BALL, BALL, ball_pixel, |ball| {
            let state = State {
                x: WIDTH as f64 / 2.0,
                y: HEIGHT as f64 / 2.0,
                angle: 0.0,
            };
            setup::start("effect-host demo", WIDTH, HEIGHT, 2.0, render(state, ball))
        }),
    )
}

/// Shaded disc with a transparent outside.
fn ball_pixel(point: Term) -> Term {
    let x = point.field(0).and_then(|v| v.as_float()).unwrap_or(0.0);
    let y = point.field(1).and_then(|v| v.as_float()).unwrap_or(0.0);
    let r = BALL as f64 / 2.0;
    let (dx, dy) = (x + 0.5 - r, y + 0.5 - r);
    let dist = (dx * dx + dy * dy).sqrt() / r;
    if dist > 1.0 {
        return program::color(Color::new(0.0, 0.0, 0.0, 0.0));
    }
    let light = 1.0 - 0.6 * dist;
    // A darker stripe makes rotation visible.
    let stripe = if dx.abs() < 1.5 { 0.5 } else { 1.0 };
    program::color(Color::new(light * stripe, 0.4 * light, 0.2, 1.0))
}

fn render(state: State, ball: Term) -> Term {
    let mut sprite = frame::SpriteDraw::new(ball.clone(), (state.x, state.y));
    sprite.alignment = Alignment::Center;
    sprite.rotation = state.angle;
    sprite.filter = Filter::Linear;

    let status = format!("{:.0},{:.0}", state.x, state.y);

    frame::fill(
        Color::new(0.05, 0.05, 0.15, 1.0),
        frame::draw_sprite(
            sprite,
            frame::draw_text(
                "ARROWS MOVE - ESC QUITS",
                frame::default_font(),
                Color::new(0.8, 0.8, 0.8, 1.0),
                (2.0, 2.0),
                Alignment::TopLeft,
                frame::draw_text(
                    &status,
                    frame::default_font(),
                    Color::new(1.0, 0.9, 0.3, 1.0),
                    ((WIDTH - 2) as f64, (HEIGHT - 2) as f64),
                    Alignment::BottomRight,
                    frame::present(move |input| {
                        if program::key_state(&input, 5) == KeyState::JustPressed {
                            return frame::log("bye", frame::quit());
                        }
                        render(state.advance(&input), ball.clone())
                    }),
                ),
            ),
        ),
    )
}

fn down(input: &Term, fields: [usize; 2]) -> bool {
    fields.iter().any(|field| {
        matches!(
            program::key_state(input, *field),
            KeyState::JustPressed | KeyState::Held
        )
    })
}

impl State {
    fn advance(self, input: &Term) -> State {
        let mut dx = 0.0;
        let mut dy = 0.0;
        // Record order: Left, Right, Up, Down, ..., W, A, S, D.
        if down(input, [0, 9]) {
            dx -= SPEED;
        }
        if down(input, [1, 11]) {
            dx += SPEED;
        }
        if down(input, [2, 8]) {
            dy -= SPEED;
        }
        if down(input, [3, 10]) {
            dy += SPEED;
        }
        let half = BALL as f64 / 2.0;
        State {
            x: (self.x + dx).clamp(half, WIDTH as f64 - half),
            y: (self.y + dy).clamp(half, HEIGHT as f64 - half),
            angle: (self.angle + dx * 0.1) % (2.0 * PI),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::input::InputTracker;
    use crate::loader::{run_loader, Loaded};
    use crate::log::MemorySink;
    use crate::render::{Renderer, Tick};

    #[test]
    fn demo_loads_and_renders_frames() {
        let mut sink = MemorySink::default();
        let Loaded::Start { config, first_frame } = run_loader(program(), &mut sink).unwrap() else {
            panic!("demo quit during setup");
        };
        assert_eq!((config.width, config.height), (160, 96));
        assert_eq!(config.resources.images.len(), 1);

        let mut canvas = Canvas::new(config.width, config.height);
        let input = InputTracker::new();
        let mut renderer = Renderer::new(config, first_frame);
        for _ in 0..3 {
            assert_eq!(renderer.tick(&mut canvas, &input, 60.0, &mut sink).unwrap(), Tick::Continue);
        }
        assert_eq!(sink.lines[0], "LOG: effect-host demo");
        assert_eq!(sink.lines[1], "GENERATE: 16x16");
        assert_eq!(sink.lines.iter().filter(|l| l.starts_with("FRAME: ")).count(), 3);
    }
}
