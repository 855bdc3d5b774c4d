//! Text layout: from a field definition and a value to drawn text
//!
//! Coordinates are template space (millimeters, y from the top edge);
//! the anchor (pos_x, pos_y) is interpreted by `text_align`:
//! - left: the text starts at pos_x
//! - center: the text is centered on pos_x
//! - right: the text ends at pos_x
//!
//! A field with `max_width` becomes a word-wrapped block constrained to
//! that width, top-anchored at pos_y.

use crate::field::{FieldDefinition, TextAlign};
use crate::registry::{FontFace, FontRegistry};
use crate::Result;
use pdf_core::unit::{mm_to_pt, pt_to_mm, MM_PER_PT};
use pdf_core::{Align, Color, PdfDocument};

/// Line height of wrapped text in millimeters: 120% of the font size
pub fn line_height_mm(font_size: f32) -> f64 {
    font_size as f64 * MM_PER_PT * 1.20
}

fn convert_align(align: TextAlign) -> Align {
    match align {
        TextAlign::Left => Align::Left,
        TextAlign::Center => Align::Center,
        TextAlign::Right => Align::Right,
    }
}

/// Draw one field's text on a page of the document.
///
/// The configured prefix is prepended before any measurement, so it
/// participates in centering and wrapping. Text is normalized to
/// Latin-1 first; substitutions are logged and rendering continues
/// (lossy by design).
pub fn place(
    doc: &mut PdfDocument,
    registry: &FontRegistry,
    page: usize,
    value: &str,
    field: &FieldDefinition,
) -> Result<()> {
    let raw = match &field.prefix {
        Some(prefix) => format!("{prefix}{value}"),
        None => value.to_string(),
    };

    let (text, lossy) = latin_text::to_latin1(&raw);
    if lossy {
        tracing::warn!(
            original = %raw,
            rendered = %text,
            "display text transliterated to Latin-1"
        );
    }

    // Font and color are applied before any width measurement;
    // measurement depends on both
    let resolved = registry.ensure_registered(doc, field.font_family, field.font_style)?;
    match resolved.face {
        FontFace::Builtin(builtin) => doc.set_builtin_font(builtin, field.font_size),
        FontFace::Custom(face) => doc.set_font(face.key, field.font_size)?,
    }
    doc.set_underline(resolved.underline);
    doc.set_text_color(Color::from_rgb(field.color.r, field.color.g, field.color.b));

    let align = convert_align(field.text_align);
    let x_pt = mm_to_pt(field.pos_x);

    match field.max_width {
        Some(max_width) if max_width > 0.0 => {
            let line_height = line_height_mm(field.font_size);
            let lines = {
                let measure =
                    |candidate: &str| doc.text_width(candidate).map(pt_to_mm).unwrap_or(0.0);
                latin_text::wrap_to_width(&text, max_width, measure)
            };

            // The block start shifts left by half/full max_width and
            // each line then aligns inside the block; the two steps
            // compose to the plain anchor at pos_x per line.
            for (i, line) in lines.iter().enumerate() {
                let y_pt = mm_to_pt(field.pos_y + i as f64 * line_height);
                doc.insert_text(line, page, x_pt, y_pt, align)?;
            }
        }
        _ => {
            doc.insert_text(&text, page, x_pt, mm_to_pt(field.pos_y), align)?;
        }
    }

    doc.set_underline(false);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_height_formula() {
        // 120% of the font size, points converted to millimeters
        assert_eq!(line_height_mm(12.0), 12.0 * 0.352778 * 1.20);
        assert_eq!(line_height_mm(24.0), 24.0 * 0.352778 * 1.20);
    }

    #[test]
    fn test_line_height_independent_of_content() {
        // Only the font size matters
        let h = line_height_mm(14.0);
        assert!((h - 5.926_670_4).abs() < 1e-6);
    }

    #[test]
    fn test_align_conversion() {
        assert_eq!(convert_align(TextAlign::Left), Align::Left);
        assert_eq!(convert_align(TextAlign::Center), Align::Center);
        assert_eq!(convert_align(TextAlign::Right), Align::Right);
    }
}
