//! Loader: the one-shot setup phase.
//!
//! Consumes setup effects (logging, image generation, asset loading) until the
//! program issues `start`, which hands over the window configuration, the
//! populated resource tables and the first frame's program value.
//!
//! Every I/O or decode failure here is fatal; there is no retry.

use std::fs;

use image::RgbaImage;
use kurbo::Point;

use crate::config::Config;
use crate::error::{HostError, HostResult, ResourceError};
use crate::font::{FontFace, TrueTypeFace};
use crate::geometry::point_to_value;
use crate::interp::{decode, interpret, Phase, Step, Vocabulary};
use crate::log::LogSink;
use crate::registry::Resources;
use crate::sprite::Sprite;
use crate::types::{Color, FontDescriptor, ImageDescriptor, LogKind};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderEffect {
    Quit,
    Log,
    GenerateImage,
    LoadImage,
    LoadSpriteSheet,
    LoadFont,
    LoadText,
    Start,
}

impl Vocabulary for LoaderEffect {
    const PHASE: &'static str = "loader";
    const ALL: &'static [Self] = &[
        LoaderEffect::Quit,
        LoaderEffect::Log,
        LoaderEffect::GenerateImage,
        LoaderEffect::LoadImage,
        LoaderEffect::LoadSpriteSheet,
        LoaderEffect::LoadFont,
        LoaderEffect::LoadText,
        LoaderEffect::Start,
    ];

    fn name(self) -> &'static str {
        match self {
            LoaderEffect::Quit => "quit",
            LoaderEffect::Log => "log",
            LoaderEffect::GenerateImage => "generate-image",
            LoaderEffect::LoadImage => "load-image",
            LoaderEffect::LoadSpriteSheet => "load-sprite-sheet",
            LoaderEffect::LoadFont => "load-font",
            LoaderEffect::LoadText => "load-text",
            LoaderEffect::Start => "start",
        }
    }

    fn arity(self) -> usize {
        match self {
            LoaderEffect::Quit => 0,
            LoaderEffect::Log => 2,
            LoaderEffect::GenerateImage => 4,
            LoaderEffect::LoadImage => 2,
            LoaderEffect::LoadSpriteSheet => 4,
            LoaderEffect::LoadFont => 4,
            LoaderEffect::LoadText => 2,
            LoaderEffect::Start => 5,
        }
    }
}

/// How the setup phase ended.
pub enum Loaded<V> {
    Quit,
    Start { config: Config, first_frame: V },
}

/// Run the setup phase from the program's entry value.
pub fn run_loader<V: Value, L: LogSink + ?Sized>(program: V, sink: &mut L) -> HostResult<Loaded<V>> {
    let mut loader = Loader {
        resources: Resources::new(),
        sink,
    };
    interpret(&mut loader, program)
}

struct Loader<'a, L: LogSink + ?Sized> {
    resources: Resources,
    sink: &'a mut L,
}

impl<V: Value, L: LogSink + ?Sized> Phase<V> for Loader<'_, L> {
    type Outcome = Loaded<V>;

    fn step(&mut self, program: &V) -> HostResult<Step<V, Loaded<V>>> {
        let next = match decode::<LoaderEffect, V>(program)? {
            LoaderEffect::Quit => {
                self.sink.log(None, "QUIT");
                return Ok(Step::Halt(Loaded::Quit));
            }

            LoaderEffect::Log => {
                self.sink.log(Some(LogKind::Log), &program.field(0)?.as_string()?);
                program.field(1)?
            }

            LoaderEffect::GenerateImage => {
                let width = dimension("image width", program.field(0)?.as_int()?)?;
                let height = dimension("image height", program.field(1)?.as_int()?)?;
                let function = program.field(2)?;
                self.sink
                    .log(Some(LogKind::Generate), &format!("{width}x{height}"));
                let image = generate_image(width, height, &function)?;
                let descriptor = self.register_image(Sprite::from_image(image));
                program.field(3)?.apply(descriptor.to_value())?
            }

            LoaderEffect::LoadImage => {
                let path = program.field(0)?.as_string()?;
                self.sink.log(Some(LogKind::Load), &path);
                let sprite = load_sprite(&path)?;
                let descriptor = self.register_image(sprite);
                program.field(1)?.apply(descriptor.to_value())?
            }

            LoaderEffect::LoadSpriteSheet => {
                let path = program.field(0)?.as_string()?;
                let tile_width = tile_size("tile width", program.field(1)?.as_int()?)?;
                let tile_height = tile_size("tile height", program.field(2)?.as_int()?)?;
                self.sink.log(Some(LogKind::Load), &path);
                let sheet = load_sprite(&path)?;
                let rows = slice_sheet(&sheet, tile_width, tile_height)
                    .into_iter()
                    .map(|row| {
                        let tiles = row
                            .into_iter()
                            .map(|tile| self.register_image(tile).to_value::<V>())
                            .collect();
                        V::list(tiles)
                    })
                    .collect();
                program.field(3)?.apply(V::list(rows))?
            }

            LoaderEffect::LoadFont => {
                let path = program.field(0)?.as_string()?;
                let size = program.field(1)?.as_float()?;
                self.sink.log(Some(LogKind::Load), &path);
                let data = fs::read(&path).map_err(|e| HostError::resource(&path, e))?;
                let face = TrueTypeFace::parse(data, size)
                    .map_err(|e| HostError::resource(&path, ResourceError::Font(e)))?;
                let handle = self.resources.fonts.register(FontFace::TrueType(face));
                let descriptor = FontDescriptor {
                    handle: handle.index(),
                    size,
                };
                program.field(3)?.apply(descriptor.to_value())?
            }

            LoaderEffect::LoadText => {
                let path = program.field(0)?.as_string()?;
                self.sink.log(Some(LogKind::Load), &path);
                let bytes = fs::read(&path).map_err(|e| HostError::resource(&path, e))?;
                // Invalid UTF-8 is replaced, not rejected.
                let content = String::from_utf8_lossy(&bytes);
                program.field(1)?.apply(V::string(&content))?
            }

            LoaderEffect::Start => {
                let config = Config {
                    title: program.field(0)?.as_string()?,
                    width: dimension("window width", program.field(1)?.as_int()?)?,
                    height: dimension("window height", program.field(2)?.as_int()?)?,
                    scale: program.field(3)?.as_float()?,
                    resources: std::mem::take(&mut self.resources),
                };
                tracing::debug!(
                    title = %config.title,
                    width = config.width,
                    height = config.height,
                    images = config.resources.images.len(),
                    fonts = config.resources.fonts.len(),
                    "loader finished",
                );
                return Ok(Step::Halt(Loaded::Start {
                    config,
                    first_frame: program.field(4)?,
                }));
            }
        };
        Ok(Step::Resume(next))
    }
}

impl<L: LogSink + ?Sized> Loader<'_, L> {
    fn register_image(&mut self, sprite: Sprite) -> ImageDescriptor {
        let (width, height) = (sprite.width(), sprite.height());
        let handle = self.resources.images.register(sprite);
        ImageDescriptor {
            handle: handle.index(),
            width,
            height,
        }
    }
}

// ---------------------------------------------------------------------------
// Host actions
// ---------------------------------------------------------------------------

fn dimension(what: &'static str, value: i64) -> HostResult<u32> {
    u32::try_from(value).map_err(|_| HostError::InvalidArgument {
        what,
        value: value.to_string(),
    })
}

fn tile_size(what: &'static str, value: i64) -> HostResult<u32> {
    match dimension(what, value)? {
        0 => Err(HostError::InvalidArgument {
            what,
            value: value.to_string(),
        }),
        size => Ok(size),
    }
}

/// Rasterize a program-supplied `point -> color` function.
fn generate_image<V: Value>(width: u32, height: u32, function: &V) -> HostResult<RgbaImage> {
    let mut image = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let point = point_to_value(Point::new(x as f64, y as f64));
            let color = Color::from_value(&function.apply(point)?)?;
            image.put_pixel(x, y, color.to_rgba8());
        }
    }
    Ok(image)
}

fn load_sprite(path: &str) -> HostResult<Sprite> {
    let image = image::open(path).map_err(|e| HostError::resource(path, e))?;
    Ok(Sprite::from_image(image.to_rgba8()))
}

/// Cut a sheet into whole tiles, row-major. Partial tiles on the right or
/// bottom edge are dropped.
pub fn slice_sheet(sheet: &Sprite, tile_width: u32, tile_height: u32) -> Vec<Vec<Sprite>> {
    let columns = sheet.width() / tile_width;
    let rows = sheet.height() / tile_height;
    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|col| {
                    sheet.sub_image(col * tile_width, row * tile_height, tile_width, tile_height)
                })
                .collect()
        })
        .collect()
}
