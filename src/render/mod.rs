//! Renderer: the per-frame phase.
//!
//! Each tick interprets draw effects in program order until the program
//! presents the frame. Presenting samples input once, applies the frame's
//! continuation to it, and parks the result for the next tick. The renderer
//! performs no I/O; everything it draws was registered by the loader.

use crate::canvas::Surface;
use crate::config::Config;
use crate::error::HostResult;
use crate::geometry::{anchor, point_from_value, sprite_transform};
use crate::input::{sample, InputSource};
use crate::interp::{decode, interpret, Phase, Step, Vocabulary};
use crate::log::LogSink;
use crate::registry::Resources;
use crate::types::{Alignment, Color, Filter, LogKind};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEffect {
    Quit,
    Log,
    Fill,
    DrawSprite,
    DrawText,
    Present,
}

impl Vocabulary for RenderEffect {
    const PHASE: &'static str = "render";
    const ALL: &'static [Self] = &[
        RenderEffect::Quit,
        RenderEffect::Log,
        RenderEffect::Fill,
        RenderEffect::DrawSprite,
        RenderEffect::DrawText,
        RenderEffect::Present,
    ];

    fn name(self) -> &'static str {
        match self {
            RenderEffect::Quit => "quit",
            RenderEffect::Log => "log",
            RenderEffect::Fill => "fill",
            RenderEffect::DrawSprite => "draw-sprite",
            RenderEffect::DrawText => "draw-text",
            RenderEffect::Present => "present",
        }
    }

    fn arity(self) -> usize {
        match self {
            RenderEffect::Quit => 0,
            RenderEffect::Log => 2,
            RenderEffect::Fill => 2,
            RenderEffect::DrawSprite => 2,
            RenderEffect::DrawText => 6,
            RenderEffect::Present => 1,
        }
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A frame was presented; tick again on the next refresh.
    Continue,
    /// The program quit. Further ticks do nothing.
    Quit,
}

pub struct Renderer<V> {
    config: Config,
    program: Option<V>,
}

impl<V: Value> Renderer<V> {
    pub fn new(config: Config, first_frame: V) -> Self {
        Renderer {
            config,
            program: Some(first_frame),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_finished(&self) -> bool {
        self.program.is_none()
    }

    /// Run the program up to its next `present` (or `quit`).
    pub fn tick<S, I, L>(&mut self, surface: &mut S, input: &I, fps: f64, sink: &mut L) -> HostResult<Tick>
    where
        S: Surface + ?Sized,
        I: InputSource + ?Sized,
        L: LogSink + ?Sized,
    {
        let Some(program) = self.program.take() else {
            return Ok(Tick::Quit);
        };
        let mut pass = FramePass {
            resources: &self.config.resources,
            surface,
            input,
            fps,
            sink,
        };
        match interpret(&mut pass, program)? {
            FrameEnd::Presented(next) => {
                self.program = Some(next);
                Ok(Tick::Continue)
            }
            FrameEnd::Quit => Ok(Tick::Quit),
        }
    }
}

enum FrameEnd<V> {
    Presented(V),
    Quit,
}

struct FramePass<'a, S: ?Sized, I: ?Sized, L: ?Sized> {
    resources: &'a Resources,
    surface: &'a mut S,
    input: &'a I,
    fps: f64,
    sink: &'a mut L,
}

impl<V, S, I, L> Phase<V> for FramePass<'_, S, I, L>
where
    V: Value,
    S: Surface + ?Sized,
    I: InputSource + ?Sized,
    L: LogSink + ?Sized,
{
    type Outcome = FrameEnd<V>;

    fn step(&mut self, program: &V) -> HostResult<Step<V, FrameEnd<V>>> {
        let next = match decode::<RenderEffect, V>(program)? {
            RenderEffect::Quit => {
                self.sink.log(None, "QUIT");
                return Ok(Step::Halt(FrameEnd::Quit));
            }

            RenderEffect::Log => {
                self.sink.log(Some(LogKind::Log), &program.field(0)?.as_string()?);
                program.field(1)?
            }

            RenderEffect::Fill => {
                if !self.surface.skip_drawing() {
                    let color = Color::from_value(&program.field(0)?)?;
                    self.surface.fill(color.to_rgba8());
                }
                program.field(1)?
            }

            RenderEffect::DrawSprite => {
                if !self.surface.skip_drawing() {
                    self.draw_sprite(&program.field(0)?)?;
                }
                program.field(1)?
            }

            RenderEffect::DrawText => {
                if !self.surface.skip_drawing() {
                    self.draw_text(program)?;
                }
                program.field(5)?
            }

            RenderEffect::Present => {
                self.sink
                    .log(Some(LogKind::Frame), &format!("{:.1} FPS", self.fps));
                let input: V = sample(self.input);
                let next = program.field(0)?.apply(input)?;
                return Ok(Step::Halt(FrameEnd::Presented(next)));
            }
        };
        Ok(Step::Resume(next))
    }
}

impl<S, I, L> FramePass<'_, S, I, L>
where
    S: Surface + ?Sized,
    I: InputSource + ?Sized,
    L: LogSink + ?Sized,
{
    /// Sprite record: image, filter, tint, position, alignment, rotation, scale.
    fn draw_sprite<V: Value>(&mut self, sprite: &V) -> HostResult<()> {
        let image = self
            .resources
            .images
            .lookup(sprite.field(0)?.field(0)?.as_int()?)?;
        let filter = Filter::from_value(&sprite.field(1)?)?;
        let tint = Color::from_value(&sprite.field(2)?)?;
        let position = point_from_value(&sprite.field(3)?)?;
        let alignment = Alignment::from_value(&sprite.field(4)?)?;
        let rotation = sprite.field(5)?.as_float()?;
        let scale = sprite.field(6)?.as_float()?;

        let anchor = anchor(alignment, image.width() as f64, image.height() as f64);
        let transform = sprite_transform(anchor, rotation, scale, position);
        self.surface
            .draw_sprite(image, transform, tint.to_rgba8(), filter);
        Ok(())
    }

    fn draw_text<V: Value>(&mut self, effect: &V) -> HostResult<()> {
        let text = effect.field(0)?.as_string()?;
        let face = self
            .resources
            .fonts
            .lookup(effect.field(1)?.field(0)?.as_int()?)?;
        let color = Color::from_value(&effect.field(2)?)?;
        let position = point_from_value(&effect.field(3)?)?;
        let alignment = Alignment::from_value(&effect.field(4)?)?;

        let (width, height) = face.measure(&text);
        let (ax, ay) = anchor(alignment, width as f64, height as f64);
        // Stay in f64 until the final cast, which saturates for far-off text.
        let origin = (
            (position.x - ax).round() as i32,
            ((position.y - ay).round() + height as f64) as i32,
        );
        self.surface.draw_text(&text, face, origin, color.to_rgba8());
        Ok(())
    }
}
