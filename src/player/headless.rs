use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::canvas::Canvas;
use crate::error::HostResult;
use crate::input::InputTracker;
use crate::log::LogSink;
use crate::render::{Renderer, Tick};
use crate::value::Value;

/// Frame driver without a terminal: ticks a fixed number of frames with no
/// input at a nominal frame rate.
pub struct Headless<V> {
    renderer: Renderer<V>,
    canvas: Canvas,
    input: InputTracker,
    fps: f64,
}

impl<V: Value> Headless<V> {
    pub fn new(renderer: Renderer<V>, fps: f64) -> Self {
        let config = renderer.config();
        let canvas = Canvas::new(config.width, config.height);
        Headless {
            renderer,
            canvas,
            input: InputTracker::new(),
            fps,
        }
    }

    /// Tick up to `frames` times. Returns the number of frames presented,
    /// which is smaller when the program quits early.
    pub fn run<L: LogSink + ?Sized>(&mut self, frames: usize, sink: &mut L) -> HostResult<usize> {
        for presented in 0..frames {
            let tick = self
                .renderer
                .tick(&mut self.canvas, &self.input, self.fps, sink)?;
            self.input.end_frame();
            if tick == Tick::Quit {
                return Ok(presented);
            }
        }
        Ok(frames)
    }

    /// The current frame resized by the configured display scale.
    pub fn snapshot(&self) -> RgbaImage {
        let frame = self.canvas.frame();
        let scale = self.renderer.config().scale;
        if !(scale.is_finite() && scale > 0.0) || scale == 1.0 {
            return frame.clone();
        }
        let width = ((frame.width() as f64 * scale).round() as u32).max(1);
        let height = ((frame.height() as f64 * scale).round() as u32).max(1);
        imageops::resize(frame, width, height, FilterType::Nearest)
    }
}
