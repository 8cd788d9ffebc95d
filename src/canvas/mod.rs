//! Canvas: the software frame buffer the render pass draws into.
//!
//! The canvas is deterministic and knows nothing about terminals or timing.
//! Frame drivers read the finished frame back out of it.

use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point, Rect};

use crate::font::FontFace;
use crate::sprite::Sprite;
use crate::types::Filter;

/// Drawing primitives the render pass needs from a backend.
pub trait Surface {
    /// True while draws may be dropped, e.g. when the window is hidden.
    fn skip_drawing(&self) -> bool;

    /// Replace every pixel with `color`.
    fn fill(&mut self, color: Rgba<u8>);

    /// Draw `sprite` mapped through `transform`, channels multiplied by `tint`.
    fn draw_sprite(&mut self, sprite: &Sprite, transform: Affine, tint: Rgba<u8>, filter: Filter);

    /// Draw one line of text with the baseline at `origin.1`.
    fn draw_text(&mut self, text: &str, face: &FontFace, origin: (i32, i32), color: Rgba<u8>);
}

pub struct Canvas {
    frame: RgbaImage,
    skip_drawing: bool,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Canvas {
            frame: RgbaImage::new(width, height),
            skip_drawing: false,
        }
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    pub fn set_skip_drawing(&mut self, skip: bool) {
        self.skip_drawing = skip;
    }

    fn blend_at(&mut self, x: i64, y: i64, src: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let dst = self.frame.get_pixel_mut(x as u32, y as u32);
        *dst = blend(*dst, src);
    }
}

impl Surface for Canvas {
    fn skip_drawing(&self) -> bool {
        self.skip_drawing
    }

    fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.frame.pixels_mut() {
            *pixel = color;
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite, transform: Affine, tint: Rgba<u8>, filter: Filter) {
        if sprite.width() == 0 || sprite.height() == 0 || transform.determinant().abs() < 1e-12 {
            return;
        }
        let inverse = transform.inverse();
        let source = Rect::new(0.0, 0.0, sprite.width() as f64, sprite.height() as f64);
        let bounds = transform.transform_rect_bbox(source);

        let x0 = bounds.x0.floor().max(0.0) as i64;
        let y0 = bounds.y0.floor().max(0.0) as i64;
        let x1 = bounds.x1.ceil().min(self.width() as f64) as i64;
        let y1 = bounds.y1.ceil().min(self.height() as f64) as i64;

        for py in y0..y1 {
            for px in x0..x1 {
                let at = inverse * Point::new(px as f64 + 0.5, py as f64 + 0.5);
                if let Some(texel) = sample(sprite, at, filter) {
                    self.blend_at(px, py, multiply(texel, tint));
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, face: &FontFace, origin: (i32, i32), color: Rgba<u8>) {
        face.render(text, origin, &mut |x, y, coverage| {
            let alpha = (color[3] as u16 * coverage as u16 / 255) as u8;
            let src = Rgba([color[0], color[1], color[2], alpha]);
            self.blend_at(x as i64, y as i64, src);
        });
    }
}

// ---------------------------------------------------------------------------
// Pixel math
// ---------------------------------------------------------------------------

/// Straight-alpha source-over.
fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => dst,
        255 => src,
        _ => {
            let sa = src[3] as f32 / 255.0;
            let da = dst[3] as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let channel = |s: u8, d: u8| {
                let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                c.round().clamp(0.0, 255.0) as u8
            };
            Rgba([
                channel(src[0], dst[0]),
                channel(src[1], dst[1]),
                channel(src[2], dst[2]),
                (out_a * 255.0).round() as u8,
            ])
        }
    }
}

fn multiply(texel: Rgba<u8>, tint: Rgba<u8>) -> Rgba<u8> {
    let mul = |a: u8, b: u8| (a as u16 * b as u16 / 255) as u8;
    Rgba([
        mul(texel[0], tint[0]),
        mul(texel[1], tint[1]),
        mul(texel[2], tint[2]),
        mul(texel[3], tint[3]),
    ])
}

/// Sprite texel at local coordinates, or `None` outside the sprite.
fn sample(sprite: &Sprite, at: Point, filter: Filter) -> Option<Rgba<u8>> {
    let (w, h) = (sprite.width() as f64, sprite.height() as f64);
    if at.x < 0.0 || at.y < 0.0 || at.x >= w || at.y >= h {
        return None;
    }
    match filter {
        Filter::Nearest => Some(sprite.pixel(at.x as u32, at.y as u32)),
        Filter::Linear => {
            let fx = (at.x - 0.5).clamp(0.0, w - 1.0);
            let fy = (at.y - 0.5).clamp(0.0, h - 1.0);
            let (x0, y0) = (fx.floor() as u32, fy.floor() as u32);
            let x1 = (x0 + 1).min(sprite.width() - 1);
            let y1 = (y0 + 1).min(sprite.height() - 1);
            let (tx, ty) = (fx - x0 as f64, fy - y0 as f64);

            let p00 = sprite.pixel(x0, y0);
            let p10 = sprite.pixel(x1, y0);
            let p01 = sprite.pixel(x0, y1);
            let p11 = sprite.pixel(x1, y1);
            let lerp = |i: usize| {
                let top = p00[i] as f64 * (1.0 - tx) + p10[i] as f64 * tx;
                let bottom = p01[i] as f64 * (1.0 - tx) + p11[i] as f64 * tx;
                (top * (1.0 - ty) + bottom * ty).round() as u8
            };
            Some(Rgba([lerp(0), lerp(1), lerp(2), lerp(3)]))
        }
    }
}
