//! Spanish date, name and document-number formatting

use chrono::{Datelike, NaiveDate};

/// Spanish month names
const MONTHS_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Spanish text formatting utilities
pub struct SpanishFormatter;

impl SpanishFormatter {
    /// Format a date as "Mes de Año"
    pub fn month_year(date: NaiveDate) -> String {
        format_month_year(date)
    }

    /// Group an identity-document number with thousands dots
    pub fn document_number(raw: &str) -> String {
        format_document_number(raw)
    }

    /// Upper-cased display name from given and family names
    pub fn name(first: &str, last: &str) -> String {
        display_name(first, last)
    }
}

/// Name of a month (1-12); out-of-range months clamp to December
pub fn month_name_es(month: u32) -> &'static str {
    let index = month.clamp(1, 12) as usize - 1;
    MONTHS_ES[index]
}

/// Format a date as "Mes de Año", e.g. "Enero de 2026"
pub fn format_month_year(date: NaiveDate) -> String {
    format!("{} de {}", month_name_es(date.month()), date.year())
}

/// Group a digit string with dots every three digits from the right
///
/// # Examples
/// ```
/// use latin_text::group_thousands;
/// assert_eq!(group_thousands("1234567890"), "1.234.567.890");
/// assert_eq!(group_thousands("123"), "123");
/// ```
pub fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        let remaining = chars.len() - i;
        if i > 0 && remaining % 3 == 0 {
            out.push('.');
        }
        out.push(*c);
    }

    out
}

/// Format an identity-document number: strip everything but digits,
/// then group with thousands dots ("CC 1.234.567.890" style, without
/// the prefix)
pub fn format_document_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    group_thousands(&digits)
}

/// Upper-cased full display name, as printed on the certificate
pub fn display_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim())
        .trim()
        .to_uppercase()
}
