//! Font faces the render pass can measure and draw with.

pub mod bitmap;
mod truetype;

pub use truetype::TrueTypeFace;

pub enum FontFace {
    /// The built-in bitmap face.
    Bitmap,
    TrueType(TrueTypeFace),
}

impl FontFace {
    pub fn builtin() -> Self {
        FontFace::Bitmap
    }

    /// Pixel `(width, height)` of `text` on one line.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            FontFace::Bitmap => (bitmap::text_width(text), bitmap::LINE_HEIGHT),
            FontFace::TrueType(face) => (face.text_width(text), face.line_height()),
        }
    }

    /// Feed glyph coverage for `text` to `plot`, baseline at `origin.1`.
    pub fn render(&self, text: &str, origin: (i32, i32), plot: &mut dyn FnMut(i32, i32, u8)) {
        match self {
            FontFace::Bitmap => bitmap::render(text, origin, plot),
            FontFace::TrueType(face) => face.render(text, origin, plot),
        }
    }
}
