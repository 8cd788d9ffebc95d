//! Drawable images.
//!
//! A `Sprite` is a rectangular window onto a shared RGBA buffer, so slicing a
//! sheet into tiles never copies pixels.

use std::rc::Rc;

use image::{Rgba, RgbaImage};

#[derive(Clone)]
pub struct Sprite {
    pixels: Rc<RgbaImage>,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Sprite {
    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Sprite {
            pixels: Rc::new(image),
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sub-region `[x, x+width) × [y, y+height)` relative to this sprite,
    /// clipped to its bounds.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Sprite {
        let x = x.min(self.width);
        let y = y.min(self.height);
        Sprite {
            pixels: Rc::clone(&self.pixels),
            x: self.x + x,
            y: self.y + y,
            width: width.min(self.width - x),
            height: height.min(self.height - y),
        }
    }

    /// Bounds within the backing buffer, as `(x, y, width, height)`.
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    /// Pixel at local coordinates; the caller keeps them in range.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(self.x + x, self.y + y)
    }
}
