//! Geometry and color helpers.
//!
//! Pure numeric transforms shared by the loader and the render pass.

use kurbo::{Affine, Point};

use crate::error::HostResult;
use crate::types::Alignment;
use crate::value::Value;

/// Offset subtracted from a draw position so the given alignment lands on it.
pub fn anchor(alignment: Alignment, width: f64, height: f64) -> (f64, f64) {
    use Alignment::*;

    let x = match alignment {
        TopLeft | Left | BottomLeft => 0.0,
        Top | Center | Bottom => width / 2.0,
        TopRight | Right | BottomRight => width,
    };
    let y = match alignment {
        TopLeft | Top | TopRight => 0.0,
        Left | Center | Right => height / 2.0,
        BottomLeft | Bottom | BottomRight => height,
    };
    (x, y)
}

/// Convert a normalized float channel to 8 bits by scaling and truncating.
///
/// `0.5` maps to 127. Out-of-range input is not rejected: the float-to-int
/// cast saturates, so anything above 1 becomes 255 and anything below 0
/// (or NaN) becomes 0.
pub fn channel_to_byte(channel: f64) -> u8 {
    (channel * 255.0) as u8
}

/// Transform for a sprite: translate(-anchor), rotate, scale, translate(position).
pub fn sprite_transform(anchor: (f64, f64), rotation: f64, scale: f64, position: Point) -> Affine {
    Affine::translate((-anchor.0, -anchor.1))
        .then_rotate(rotation)
        .then_scale(scale)
        .then_translate(position.to_vec2())
}

pub fn point_to_value<V: Value>(point: Point) -> V {
    V::record(vec![V::float(point.x), V::float(point.y)])
}

pub fn point_from_value<V: Value>(value: &V) -> HostResult<Point> {
    Ok(Point::new(
        value.field(0)?.as_float()?,
        value.field(1)?.as_float()?,
    ))
}
