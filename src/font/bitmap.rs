//! Built-in bitmap face, registered at font handle 0.
//!
//! Uppercase-only, 5 pixel rows per glyph, glyph widths vary. `#` marks a
//! lit pixel. Lowercase text is folded; unknown characters take no space.

/// Rows of `ch` (already uppercased), or `None` outside the face.
pub fn glyph(ch: char) -> Option<[&'static str; 5]> {
    let g = match ch {
        'A' => [" ### ", "#   #", "#####", "#   #", "#   #"],
        'B' => ["#### ", "#   #", "#### ", "#   #", "#### "],
        'C' => [" ### ", "#   #", "#    ", "#   #", " ### "],
        'D' => ["#### ", "#   #", "#   #", "#   #", "#### "],
        'E' => ["#####", "#    ", "###  ", "#    ", "#####"],
        'F' => ["#####", "#    ", "###  ", "#    ", "#    "],
        'G' => [" ### ", "#    ", "#  ##", "#   #", " ### "],
        'H' => ["#   #", "#   #", "#####", "#   #", "#   #"],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'J' => ["  ###", "   # ", "   # ", "#  # ", " ##  "],
        'K' => ["#   #", "#  # ", "###  ", "#  # ", "#   #"],
        'L' => ["#    ", "#    ", "#    ", "#    ", "#####"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#### ", "#    ", "#    "],
        'Q' => [" ### ", "#   #", "# # #", "#  # ", " ## #"],
        'R' => ["#### ", "#   #", "#### ", "#  # ", "#   #"],
        'S' => [" ####", "#    ", " ### ", "    #", "#### "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  "],
        'U' => ["#   #", "#   #", "#   #", "#   #", " ### "],
        'V' => ["#   #", "#   #", "#   #", " # # ", "  #  "],
        'W' => ["#   #", "#   #", "# # #", "## ##", "#   #"],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        'Y' => ["#   #", " # # ", "  #  ", "  #  ", "  #  "],
        'Z' => ["#####", "   # ", "  #  ", " #   ", "#####"],

        '0' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => [" ### ", "#   #", "  ## ", " #   ", "#####"],
        '3' => [" ### ", "#   #", "  ## ", "#   #", " ### "],
        '4' => ["#  # ", "#  # ", "#####", "   # ", "   # "],
        '5' => ["#####", "#    ", "#### ", "    #", "#### "],
        '6' => [" ### ", "#    ", "#### ", "#   #", " ### "],
        '7' => ["#####", "   # ", "  #  ", " #   ", " #   "],
        '8' => [" ### ", "#   #", " ### ", "#   #", " ### "],
        '9' => [" ### ", "#   #", " ####", "   # ", " ### "],

        ' ' => ["   ", "   ", "   ", "   ", "   "],
        '!' => ["#", "#", "#", " ", "#"],
        '.' => [" ", " ", " ", " ", "#"],
        '-' => ["     ", "     ", "#####", "     ", "     "],
        '?' => [" ### ", "#   #", "  ## ", "     ", "  #  "],
        ':' => [" ", "#", " ", "#", " "],
        ',' => ["  ", "  ", "  ", " #", "# "],
        '\'' => ["#", "#", " ", " ", " "],
        '/' => ["    #", "   # ", "  #  ", " #   ", "#    "],
        '(' => [" #", "# ", "# ", "# ", " #"],
        ')' => ["# ", " #", " #", " #", "# "],
        '+' => ["     ", "  #  ", "#####", "  #  ", "     "],
        '=' => ["     ", "#####", "     ", "#####", "     "],
        '%' => ["#   #", "   # ", "  #  ", " #   ", "#   #"],
        '_' => ["     ", "     ", "     ", "     ", "#####"],

        _ => return None,
    };
    debug_assert!(
        g.iter().all(|row| row.len() == g[0].len()),
        "glyph '{ch}' has inconsistent row widths",
    );
    Some(g)
}

/// Glyph height in pixels.
pub const GLYPH_HEIGHT: u32 = 5;

/// Blank rows above and below the glyph cell.
const PADDING: u32 = 1;

/// Line height reported to text placement.
pub const LINE_HEIGHT: u32 = GLYPH_HEIGHT + 2 * PADDING;

/// Each drawable glyph of `text` with its x offset from the pen origin.
/// Adjacent glyphs are one blank column apart.
fn layout(text: &str) -> impl Iterator<Item = (u32, [&'static str; 5])> + '_ {
    let mut pen = 0u32;
    text.chars()
        .filter_map(|ch| glyph(ch.to_ascii_uppercase()))
        .map(move |g| {
            let at = pen;
            pen += g[0].len() as u32 + 1;
            (at, g)
        })
}

/// Pixel width of `text` on one line.
pub fn text_width(text: &str) -> u32 {
    layout(text)
        .last()
        .map_or(0, |(at, g)| at + g[0].len() as u32)
}

/// Plot the lit pixels of `text` with the baseline at `origin.1`.
pub fn render(text: &str, origin: (i32, i32), plot: &mut dyn FnMut(i32, i32, u8)) {
    let top = origin.1.saturating_sub((GLYPH_HEIGHT + PADDING) as i32);
    for (at, g) in layout(text) {
        let left = origin.0.saturating_add(at as i32);
        for (dy, bits) in g.iter().enumerate() {
            for (dx, _) in bits.bytes().enumerate().filter(|(_, b)| *b != b' ') {
                plot(left.saturating_add(dx as i32), top.saturating_add(dy as i32), u8::MAX);
            }
        }
    }
}
