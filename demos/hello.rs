//! Smallest useful program: a colour-cycling background with a greeting,
//! quitting by itself after a couple of seconds.
//!
//!     cargo run --example hello            # terminal
//!     cargo run --example hello -- out.png # headless, writes the last frame

use anyhow::{Context, Result};

use effect_host::loader::{run_loader, Loaded};
use effect_host::log::StdoutSink;
use effect_host::player::{Headless, Player};
use effect_host::program::{frame, setup};
use effect_host::render::Renderer;
use effect_host::settings::HostSettings;
use effect_host::types::{Alignment, Color};
use effect_host::Term;

const FRAMES: u32 = 120;

fn main() -> Result<()> {
    let program = setup::log("hello", setup::start("hello", 96, 32, 3.0, hello(0)));
    let Loaded::Start { config, first_frame } = run_loader(program, &mut StdoutSink)? else {
        return Ok(());
    };
    let renderer = Renderer::new(config, first_frame);

    match std::env::args().nth(1) {
        Some(output) => {
            let mut headless = Headless::new(renderer, 60.0);
            headless.run(FRAMES as usize + 1, &mut StdoutSink)?;
            headless
                .snapshot()
                .save(&output)
                .with_context(|| format!("Failed to write {output}"))?;
        }
        None => Player::new(renderer, HostSettings::default())?.play()?,
    }
    Ok(())
}

fn hello(n: u32) -> Term {
    if n == FRAMES {
        return frame::log("goodbye", frame::quit());
    }
    let t = n as f64 / FRAMES as f64;
    frame::fill(
        Color::new(0.2 * t, 0.1, 0.3 * (1.0 - t), 1.0),
        frame::draw_text(
            "HELLO",
            frame::default_font(),
            Color::new(1.0, 1.0, 1.0, 1.0),
            (48.0, 16.0),
            Alignment::Center,
            frame::present(move |_| hello(n + 1)),
        ),
    )
}
