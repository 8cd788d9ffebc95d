use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::{io, process};

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use effect_host::{
    demo,
    loader::{run_loader, Loaded},
    log::StdoutSink,
    player::{Headless, Player},
    render::Renderer,
    settings::HostSettings,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("ERROR: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "effect-host play [--config <settings.json>]";
const SNAPSHOT_USAGE: &str = "effect-host snapshot <output.png> [frames] [--config <settings.json>]";

fn run() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match take_option(&mut args, "--config")? {
        Some(path) => HostSettings::load_from(Path::new(&path)),
        None => HostSettings::load(),
    };
    let mut args = args.into_iter();

    match args.next().as_deref() {
        Some("play") => play(settings),
        Some("snapshot") => {
            let output = args.next().context(SNAPSHOT_USAGE)?;
            let frames = match args.next() {
                Some(n) => n
                    .parse()
                    .with_context(|| format!("Invalid frame count {n}\n\nUsage: {SNAPSHOT_USAGE}"))?,
                None => 1,
            };
            snapshot(settings, Path::new(&output), frames)
        }
        _ => bail!(
            "Effect host: runs the built-in demo program\n\nUsage:\n  {PLAY_USAGE}\n  {SNAPSHOT_USAGE}"
        ),
    }
}

/// Remove `--name <value>` from `args`, returning the value.
fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    let Some(at) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if at + 1 >= args.len() {
        bail!("{name} needs a value");
    }
    let value = args.remove(at + 1);
    args.remove(at);
    Ok(Some(value))
}

fn init_tracing(trace_file: Option<&Path>, owns_screen: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match trace_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create trace file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // Anything written to the terminal would land on top of the canvas.
        None if owns_screen => builder.with_writer(io::sink).init(),
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn play(settings: HostSettings) -> Result<()> {
    init_tracing(settings.trace_file.as_deref(), true)?;

    let Loaded::Start { config, first_frame } = run_loader(demo::program(), &mut StdoutSink)? else {
        return Ok(());
    };
    let mut player = Player::new(Renderer::new(config, first_frame), settings)?;
    player.play()
}

fn snapshot(settings: HostSettings, output: &Path, frames: usize) -> Result<()> {
    init_tracing(settings.trace_file.as_deref(), false)?;

    let mut sink = StdoutSink;
    let Loaded::Start { config, first_frame } = run_loader(demo::program(), &mut sink)? else {
        return Ok(());
    };
    let mut headless = Headless::new(
        Renderer::new(config, first_frame),
        settings.target_fps as f64,
    );
    let presented = headless.run(frames, &mut sink)?;

    let image = headless.snapshot();
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!(
        "Rendered {presented} frames -> {} ({}x{})",
        output.display(),
        image.width(),
        image.height(),
    );
    Ok(())
}
