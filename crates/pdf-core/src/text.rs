//! Text rendering utilities
//!
//! Builds raw PDF content operators for positioned text. Embedded faces
//! show text as hex glyph-ID strings; built-in faces use WinAnsi literal
//! strings with octal escapes for the Latin-1 range.

use crate::document::Color;

/// Context for rendering a run of text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_resource: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color (RGB)
    pub color: Color,
}

/// Escape text as a WinAnsi literal string, parentheses included.
///
/// Characters above U+00FF are not representable in a single-byte string
/// and come out as '?'; callers are expected to transliterate first.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        let code = c as u32;
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ if (0x20..0x7F).contains(&code) => out.push(c),
            _ if code <= 0xFF => out.push_str(&format!("\\{code:03o}")),
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

/// Generate PDF operators for showing text at a position
///
/// `show` must already be a PDF string object: either a hex glyph string
/// (`<...>`) from [`crate::FontData::encode_text_hex`] or a literal from
/// [`escape_literal`].
///
/// # Arguments
/// * `show` - Encoded PDF string
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `ctx` - Text rendering context
pub fn text_operators(show: &str, x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    let mut ops = String::new();

    // Begin Text
    ops.push_str("BT\n");

    // Non-stroking color
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));

    // Font and size: /F1 12 Tf
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_resource, ctx.font_size));

    // Position: x y Td
    ops.push_str(&format!("{x} {y} Td\n"));

    // Show text
    ops.push_str(&format!("{show} Tj\n"));

    // End Text
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Generate PDF operators for an underline rule beneath a text run
///
/// Position and thickness follow the classic core-font metrics: the rule
/// sits 1/10 em below the baseline and is 1/20 em thick, drawn as a
/// filled rectangle with negative height.
pub fn underline_operators(x: f64, y: f64, width: f64, font_size: f32, color: Color) -> Vec<u8> {
    let offset = 0.1 * font_size as f64;
    let thickness = 0.05 * font_size as f64;
    let rule_y = y - offset;

    format!(
        "q\n{} {} {} rg\n{x:.2} {rule_y:.2} {width:.2} {:.2} re f\nQ\n",
        color.r,
        color.g,
        color.b,
        -thickness
    )
    .into_bytes()
}
