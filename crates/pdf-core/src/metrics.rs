//! Metrics for the PDF base-14 fonts
//!
//! The standard faces are never embedded; viewers supply them. Widths
//! therefore come from the published AFM advance tables (per-mille of
//! the em square), covering printable ASCII. Latin-1 accented forms
//! share the advance of their base letter in all of these faces, so
//! they are folded before lookup.

/// A standard (base-14) PDF font that requires no embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

/// Advance widths for ASCII 0x20..=0x7E, per-mille of the em square
type WidthTable = [u16; 95];

const HELVETICA: WidthTable = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // A..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // a..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_BOLD: WidthTable = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389,
    556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const TIMES_ROMAN: WidthTable = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, 556, 722, 667,
    556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, 500, 500, 333,
    389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

const TIMES_BOLD: WidthTable = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, 611, 778, 722,
    556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, 556, 556, 444,
    389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

const TIMES_ITALIC: WidthTable = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 675, 675, 675, 500, 920,
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722, 611, 722, 611,
    500, 556, 722, 611, 833, 611, 556, 556,
    389, 278, 389, 422, 500, 333,
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722, 500, 500, 500, 500, 389,
    389, 278, 500, 444, 667, 444, 444, 389,
    400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC: WidthTable = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 832,
    667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722, 611, 722, 667,
    556, 611, 722, 667, 889, 667, 611, 611,
    333, 278, 333, 570, 500, 333,
    500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778, 556, 500, 500, 500, 389,
    389, 278, 556, 444, 667, 500, 444, 389,
    348, 220, 348, 570,
];

/// Courier is monospaced at 600 across every face
const COURIER_ADVANCE: u16 = 600;

impl BuiltinFont {
    /// PostScript name, used both as /BaseFont and as the document's
    /// internal font key
    pub fn base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesBold => "Times-Bold",
            BuiltinFont::TimesItalic => "Times-Italic",
            BuiltinFont::TimesBoldItalic => "Times-BoldItalic",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
            BuiltinFont::CourierOblique => "Courier-Oblique",
            BuiltinFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    fn widths(&self) -> Option<&'static WidthTable> {
        match self {
            // Oblique faces share the upright advance widths
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => Some(&HELVETICA),
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => {
                Some(&HELVETICA_BOLD)
            }
            BuiltinFont::TimesRoman => Some(&TIMES_ROMAN),
            BuiltinFont::TimesBold => Some(&TIMES_BOLD),
            BuiltinFont::TimesItalic => Some(&TIMES_ITALIC),
            BuiltinFont::TimesBoldItalic => Some(&TIMES_BOLD_ITALIC),
            _ => None, // Courier family: fixed pitch
        }
    }

    /// Advance width of a character, per-mille of the em square
    pub fn glyph_width(&self, c: char) -> u16 {
        let table = match self.widths() {
            Some(t) => t,
            None => return COURIER_ADVANCE,
        };

        let folded = fold_latin1(c);
        let code = folded as u32;
        if (0x20..=0x7E).contains(&code) {
            table[(code - 0x20) as usize]
        } else {
            // Unknown glyph: fall back to the '?' advance
            table[('?' as u32 - 0x20) as usize]
        }
    }

    /// Calculate text width in font units (per-mille sum)
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().map(|c| self.glyph_width(c) as u32).sum()
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        (self.text_width(text) as f32 / 1000.0) * font_size
    }
}

/// Fold a Latin-1 character to the ASCII form whose advance it shares.
///
/// Accented letters carry the base letter's advance in the standard
/// faces; the remaining Latin-1 punctuation is mapped to the nearest
/// ASCII shape (within a few thousandths of an em).
fn fold_latin1(c: char) -> char {
    match c {
        'À'..='Å' | 'Æ' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ð' => 'D',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'Þ' => 'P',
        'ß' => 'b',
        'à'..='å' | 'æ' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ð' | 'ò'..='ö' | 'ø' | 'º' | '°' => 'o',
        'ñ' => 'n',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'þ' => 'p',
        'ª' => 'a',
        '¡' => '!',
        '¿' => '?',
        '·' => '.',
        '«' | '»' => '"',
        '÷' | '±' => '+',
        '×' => 'x',
        '\u{00A0}' => ' ',
        _ => c,
    }
}
