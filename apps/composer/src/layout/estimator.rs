//! Height estimation without a text-shaping engine.
//!
//! Text is assumed to wrap at a fixed number of characters per line derived
//! from the average glyph width (`CHAR_WIDTH_EM` × font size). The constant sits
//! slightly above a typical sans-serif average so the estimate errs high: an
//! overestimate flags overflow, an underestimate would clip content.
//!
//! The compaction deltas and the inter-section gap are tuned around this
//! heuristic. Swapping in exact metrics means re-tuning those as well.

/// Average character width in em units.
pub const CHAR_WIDTH_EM: f32 = 0.52;

/// Lower bound on characters per line, so very narrow boxes still make progress.
pub const MIN_CHARS_PER_LINE: usize = 10;

/// Approximate characters that fit on one line of `width` points.
pub fn chars_per_line(width: f32, font_size: f32) -> usize {
    let width = width.max(1.0);
    let glyph = (font_size * CHAR_WIDTH_EM).max(f32::EPSILON);
    ((width / glyph).floor() as usize).max(MIN_CHARS_PER_LINE)
}

/// Estimated rendered height of a paragraph, in points.
///
/// Explicit newlines start a new segment; every segment takes at least one line,
/// so an empty string still reserves one line of height.
pub fn estimate_paragraph_height(text: &str, width: f32, font_size: f32, line_height: f32) -> f32 {
    let per_line = chars_per_line(width, font_size);
    let line_advance = font_size * line_height;

    text.split('\n')
        .map(|segment| {
            let len = segment.chars().count();
            let lines = len.div_ceil(per_line).max(1);
            lines as f32 * line_advance
        })
        .sum()
}

/// Estimated height of a bulleted list. Item text wraps inside the bullet indent;
/// every item, including the last, is followed by `item_spacing`.
pub fn estimate_list_height(
    items: &[String],
    width: f32,
    font_size: f32,
    line_height: f32,
    item_spacing: f32,
    bullet_indent: f32,
) -> f32 {
    items
        .iter()
        .map(|item| {
            estimate_paragraph_height(item, width - bullet_indent, font_size, line_height)
                + item_spacing
        })
        .sum()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
