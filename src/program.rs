//! Program-side builders for effect values.
//!
//! These assemble `Term` programs from the effect vocabularies, so Rust-written
//! programs (the demo, tests) never spell out discriminants by hand.

use crate::loader::LoaderEffect;
use crate::render::RenderEffect;
use crate::types::{Alignment, Color, Filter, KeyState};
use crate::value::{Term, Value};

fn loader(effect: LoaderEffect, fields: Vec<Term>) -> Term {
    Term::effect(effect as usize, fields)
}

fn render(effect: RenderEffect, fields: Vec<Term>) -> Term {
    Term::effect(effect as usize, fields)
}

pub fn point(x: f64, y: f64) -> Term {
    Term::record(vec![Term::float(x), Term::float(y)])
}

pub fn color(c: Color) -> Term {
    c.to_value()
}

pub fn alignment(a: Alignment) -> Term {
    Term::union(a as usize)
}

pub fn filter(f: Filter) -> Term {
    Term::union(f as usize)
}

// ---------------------------------------------------------------------------
// Loader effects
// ---------------------------------------------------------------------------

pub mod setup {
    use super::*;

    pub fn quit() -> Term {
        loader(LoaderEffect::Quit, vec![])
    }

    pub fn log(message: &str, next: Term) -> Term {
        loader(LoaderEffect::Log, vec![Term::string(message), next])
    }

    /// `pixel` maps a point record to a color record.
    pub fn generate_image(
        width: i64,
        height: i64,
        pixel: impl Fn(Term) -> Term + 'static,
        then: impl Fn(Term) -> Term + 'static,
    ) -> Term {
        loader(
            LoaderEffect::GenerateImage,
            vec![Term::int(width), Term::int(height), Term::func(pixel), Term::func(then)],
        )
    }

    pub fn load_image(path: &str, then: impl Fn(Term) -> Term + 'static) -> Term {
        loader(LoaderEffect::LoadImage, vec![Term::string(path), Term::func(then)])
    }

    pub fn load_sprite_sheet(
        path: &str,
        tile_width: i64,
        tile_height: i64,
        then: impl Fn(Term) -> Term + 'static,
    ) -> Term {
        loader(
            LoaderEffect::LoadSpriteSheet,
            vec![
                Term::string(path),
                Term::int(tile_width),
                Term::int(tile_height),
                Term::func(then),
            ],
        )
    }

    /// Field 2 is carried but not read by the host.
    pub fn load_font(path: &str, size: f64, then: impl Fn(Term) -> Term + 'static) -> Term {
        loader(
            LoaderEffect::LoadFont,
            vec![Term::string(path), Term::float(size), Term::record(vec![]), Term::func(then)],
        )
    }

    pub fn load_text(path: &str, then: impl Fn(Term) -> Term + 'static) -> Term {
        loader(LoaderEffect::LoadText, vec![Term::string(path), Term::func(then)])
    }

    pub fn start(title: &str, width: i64, height: i64, scale: f64, first_frame: Term) -> Term {
        loader(
            LoaderEffect::Start,
            vec![
                Term::string(title),
                Term::int(width),
                Term::int(height),
                Term::float(scale),
                first_frame,
            ],
        )
    }
}

// ---------------------------------------------------------------------------
// Render effects
// ---------------------------------------------------------------------------

pub mod frame {
    use super::*;

    pub fn quit() -> Term {
        render(RenderEffect::Quit, vec![])
    }

    pub fn log(message: &str, next: Term) -> Term {
        render(RenderEffect::Log, vec![Term::string(message), next])
    }

    pub fn fill(c: Color, next: Term) -> Term {
        render(RenderEffect::Fill, vec![color(c), next])
    }

    pub struct SpriteDraw {
        pub image: Term,
        pub filter: Filter,
        pub tint: Color,
        pub position: (f64, f64),
        pub alignment: Alignment,
        pub rotation: f64,
        pub scale: f64,
    }

    impl SpriteDraw {
        /// Untinted, unrotated, top-left aligned at `position`.
        pub fn new(image: Term, position: (f64, f64)) -> Self {
            SpriteDraw {
                image,
                filter: Filter::Nearest,
                tint: Color::new(1.0, 1.0, 1.0, 1.0),
                position,
                alignment: Alignment::TopLeft,
                rotation: 0.0,
                scale: 1.0,
            }
        }
    }

    pub fn draw_sprite(sprite: SpriteDraw, next: Term) -> Term {
        let record = Term::record(vec![
            sprite.image,
            filter(sprite.filter),
            color(sprite.tint),
            point(sprite.position.0, sprite.position.1),
            alignment(sprite.alignment),
            Term::float(sprite.rotation),
            Term::float(sprite.scale),
        ]);
        render(RenderEffect::DrawSprite, vec![record, next])
    }

    pub fn draw_text(
        text: &str,
        font: Term,
        c: Color,
        position: (f64, f64),
        align: Alignment,
        next: Term,
    ) -> Term {
        render(
            RenderEffect::DrawText,
            vec![
                Term::string(text),
                font,
                color(c),
                point(position.0, position.1),
                alignment(align),
                next,
            ],
        )
    }

    /// `on_input` receives the input record and returns the next frame.
    pub fn present(on_input: impl Fn(Term) -> Term + 'static) -> Term {
        render(RenderEffect::Present, vec![Term::func(on_input)])
    }

    /// Descriptor for the built-in font.
    pub fn default_font() -> Term {
        Term::record(vec![Term::int(0), Term::float(7.0)])
    }
}

/// Read one key state out of an input record; idle if the record is malformed.
pub fn key_state(input: &Term, field: usize) -> KeyState {
    match input.field(field).and_then(|v| v.discriminant()) {
        Ok(0) => KeyState::JustPressed,
        Ok(1) => KeyState::Held,
        Ok(2) => KeyState::JustReleased,
        _ => KeyState::Idle,
    }
}
