//! Shared boundary types for the effect host.
//!
//! This module defines the small vocabularies both phases share:
//! - Program → Host: `Color`, `Alignment`, `Filter` decoded from values
//! - Host → Program: `ImageDescriptor`, `FontDescriptor`, `KeyState`
//! - Host → Log sink: `LogKind`

use image::Rgba;

use crate::error::{HostError, HostResult};
use crate::geometry::channel_to_byte;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Program → Host
// ---------------------------------------------------------------------------

/// Four float channels, conventionally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Color { r, g, b, a }
    }

    pub fn from_value<V: Value>(value: &V) -> HostResult<Self> {
        Ok(Color {
            r: value.field(0)?.as_float()?,
            g: value.field(1)?.as_float()?,
            b: value.field(2)?.as_float()?,
            a: value.field(3)?.as_float()?,
        })
    }

    pub fn to_value<V: Value>(self) -> V {
        V::record(vec![
            V::float(self.r),
            V::float(self.g),
            V::float(self.b),
            V::float(self.a),
        ])
    }

    pub fn to_rgba8(self) -> Rgba<u8> {
        Rgba([
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
            channel_to_byte(self.a),
        ])
    }
}

/// The 3×3 grid of anchor points, in discriminant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Alignment {
    pub const ALL: [Alignment; 9] = [
        Alignment::TopLeft,
        Alignment::Top,
        Alignment::TopRight,
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::BottomLeft,
        Alignment::Bottom,
        Alignment::BottomRight,
    ];

    pub fn from_discriminant(tag: usize) -> Option<Self> {
        Self::ALL.get(tag).copied()
    }

    pub fn from_value<V: Value>(value: &V) -> HostResult<Self> {
        let tag = value.discriminant()?;
        Self::from_discriminant(tag).ok_or(HostError::InvalidArgument {
            what: "alignment",
            value: tag.to_string(),
        })
    }
}

/// Sampling filter used when a sprite is scaled or rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

impl Filter {
    pub fn from_value<V: Value>(value: &V) -> HostResult<Self> {
        match value.discriminant()? {
            0 => Ok(Filter::Nearest),
            1 => Ok(Filter::Linear),
            tag => Err(HostError::InvalidArgument {
                what: "filter",
                value: tag.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Host → Program
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub handle: usize,
    pub width: u32,
    pub height: u32,
}

impl ImageDescriptor {
    pub fn to_value<V: Value>(self) -> V {
        V::record(vec![
            V::int(self.handle as i64),
            V::int(self.width as i64),
            V::int(self.height as i64),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontDescriptor {
    pub handle: usize,
    pub size: f64,
}

impl FontDescriptor {
    pub fn to_value<V: Value>(self) -> V {
        V::record(vec![V::int(self.handle as i64), V::float(self.size)])
    }
}

/// Per-frame state of one key or mouse button, in discriminant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    JustPressed,
    Held,
    JustReleased,
    Idle,
}

impl KeyState {
    pub fn to_value<V: Value>(self) -> V {
        V::union(self as usize)
    }
}

// ---------------------------------------------------------------------------
// Host → Log sink
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Log,
    Generate,
    Load,
    Frame,
}

impl LogKind {
    pub fn label(self) -> &'static str {
        match self {
            LogKind::Log => "LOG",
            LogKind::Generate => "GENERATE",
            LogKind::Load => "LOAD",
            LogKind::Frame => "FRAME",
        }
    }
}
