//! Lossy Unicode to Latin-1 transliteration
//!
//! The render target supports a single-byte Latin encoding, so display
//! text is normalized before measurement: characters Latin-1 can hold
//! pass through, everything else is replaced with its closest
//! ASCII/Latin-1 form (iconv's `//TRANSLIT` behavior). Characters with
//! no reasonable equivalent become '?'. Lossy by design.

/// Whether a character is directly representable in Latin-1
pub fn is_latin1(c: char) -> bool {
    (c as u32) <= 0xFF
}

/// Transliterate text to its Latin-1 representable form.
///
/// Returns the normalized text and whether any character had to be
/// substituted.
pub fn to_latin1(text: &str) -> (String, bool) {
    let mut out = String::with_capacity(text.len());
    let mut lossy = false;

    for c in text.chars() {
        if is_latin1(c) {
            out.push(c);
        } else {
            lossy = true;
            out.push_str(transliterate(c));
        }
    }

    (out, lossy)
}

/// Closest Latin-1 form of a character outside the Latin-1 range
fn transliterate(c: char) -> &'static str {
    match c {
        // Latin Extended-A, the forms that actually show up in names
        'Ā' | 'Ă' | 'Ą' => "A",
        'ā' | 'ă' | 'ą' => "a",
        'Ć' | 'Ĉ' | 'Č' => "C",
        'ć' | 'ĉ' | 'č' => "c",
        'Ď' | 'Đ' => "D",
        'ď' | 'đ' => "d",
        'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => "E",
        'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => "G",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => "I",
        'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'Ĵ' => "J",
        'ĵ' => "j",
        'Ķ' => "K",
        'ķ' => "k",
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ł' => "L",
        'ĺ' | 'ļ' | 'ľ' | 'ł' => "l",
        'Ń' | 'Ņ' | 'Ň' => "N",
        'ń' | 'ņ' | 'ň' => "n",
        'Ō' | 'Ŏ' | 'Ő' => "O",
        'ō' | 'ŏ' | 'ő' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Ŕ' | 'Ŗ' | 'Ř' => "R",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => "S",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'Ţ' | 'Ť' | 'Ŧ' => "T",
        'ţ' | 'ť' | 'ŧ' => "t",
        'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'Ŵ' => "W",
        'ŵ' => "w",
        'Ŷ' | 'Ÿ' => "Y",
        'ŷ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",

        // Typographic punctuation
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2039}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{203A}' => "\"",
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => "-",
        '\u{2026}' => "...",
        '\u{2022}' => "-",
        '\u{2002}' | '\u{2003}' | '\u{2009}' | '\u{202F}' => " ",

        // Symbols with a conventional spelling
        '€' => "EUR",
        '™' => "TM",
        '№' => "No.",
        '\u{2212}' => "-", // minus sign

        _ => "?",
    }
}
