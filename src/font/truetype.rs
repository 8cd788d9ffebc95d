//! TrueType/OpenType faces.
//!
//! `ttf-parser` validates the file and supplies vertical metrics; `swash`
//! maps characters, supplies advances and rasterizes glyph coverage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::Format;

/// Vertical metrics in font units.
#[derive(Debug, Clone, Copy)]
struct FontMetrics {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    line_gap: i16,
}

impl FontMetrics {
    fn line_height_px(&self, size: f32) -> f32 {
        let units = self.ascender as f32 - self.descender as f32 + self.line_gap as f32;
        units * size / self.units_per_em as f32
    }
}

/// Coverage bitmap for one glyph at the face's size.
struct RasterizedGlyph {
    bitmap: Vec<u8>,
    width: u32,
    height: u32,
    left: i32,
    top: i32,
}

pub struct TrueTypeFace {
    data: Vec<u8>,
    size: f32,
    metrics: FontMetrics,
    context: RefCell<ScaleContext>,
    glyphs: RefCell<HashMap<u16, Rc<RasterizedGlyph>>>,
}

impl TrueTypeFace {
    /// Parse font data at a point size (one point is one pixel).
    pub fn parse(data: Vec<u8>, size: f64) -> Result<Self, String> {
        if !(size.is_finite() && size > 0.0) {
            return Err(format!("invalid point size {size}"));
        }
        let metrics = {
            let face = ttf_parser::Face::parse(&data, 0).map_err(|e| e.to_string())?;
            FontMetrics {
                units_per_em: face.units_per_em(),
                ascender: face.ascender(),
                descender: face.descender(),
                line_gap: face.line_gap(),
            }
        };
        if swash::FontRef::from_index(&data, 0).is_none() {
            return Err("unsupported font data".into());
        }
        Ok(TrueTypeFace {
            data,
            size: size as f32,
            metrics,
            context: RefCell::new(ScaleContext::new()),
            glyphs: RefCell::new(HashMap::new()),
        })
    }

    fn font_ref(&self) -> Option<swash::FontRef<'_>> {
        swash::FontRef::from_index(&self.data, 0)
    }

    fn advance(&self, font: &swash::FontRef<'_>, glyph_id: u16) -> f32 {
        let units = font.glyph_metrics(&[]).advance_width(glyph_id);
        units * self.size / self.metrics.units_per_em as f32
    }

    pub fn line_height(&self) -> u32 {
        self.metrics.line_height_px(self.size).round() as u32
    }

    /// Rounded sum of glyph advances.
    pub fn text_width(&self, text: &str) -> u32 {
        let Some(font) = self.font_ref() else {
            return 0;
        };
        let charmap = font.charmap();
        let width: f32 = text
            .chars()
            .map(|ch| self.advance(&font, charmap.map(ch)))
            .sum();
        width.round() as u32
    }

    pub fn render(&self, text: &str, origin: (i32, i32), plot: &mut dyn FnMut(i32, i32, u8)) {
        let Some(font) = self.font_ref() else {
            return;
        };
        let charmap = font.charmap();
        let mut pen = origin.0 as f32;
        for ch in text.chars() {
            let glyph_id = charmap.map(ch);
            let glyph = self.rasterize(&font, glyph_id);
            let gx = (pen.round() as i32).saturating_add(glyph.left);
            let gy = origin.1.saturating_sub(glyph.top);
            for row in 0..glyph.height {
                for col in 0..glyph.width {
                    let coverage = glyph.bitmap[(row * glyph.width + col) as usize];
                    if coverage > 0 {
                        plot(gx.saturating_add(col as i32), gy.saturating_add(row as i32), coverage);
                    }
                }
            }
            pen += self.advance(&font, glyph_id);
        }
    }

    fn rasterize(&self, font: &swash::FontRef<'_>, glyph_id: u16) -> Rc<RasterizedGlyph> {
        if let Some(cached) = self.glyphs.borrow().get(&glyph_id) {
            return Rc::clone(cached);
        }

        let mut context = self.context.borrow_mut();
        let mut scaler = context.builder(*font).size(self.size).build();
        let mut render = Render::new(&[Source::Outline]);
        render.format(Format::Alpha);

        let glyph = match render.render(&mut scaler, glyph_id) {
            Some(img) => RasterizedGlyph {
                bitmap: img.data,
                width: img.placement.width,
                height: img.placement.height,
                left: img.placement.left,
                top: img.placement.top,
            },
            // Blank glyphs such as space.
            None => RasterizedGlyph {
                bitmap: Vec::new(),
                width: 0,
                height: 0,
                left: 0,
                top: 0,
            },
        };
        let glyph = Rc::new(glyph);
        self.glyphs.borrow_mut().insert(glyph_id, Rc::clone(&glyph));
        glyph
    }
}
