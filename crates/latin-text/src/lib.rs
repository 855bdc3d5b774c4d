//! Latin Text - Latin-1/Spanish text processing
//!
//! This crate provides:
//! - Lossy Unicode to Latin-1 transliteration (the render target is a
//!   single-byte Latin encoding)
//! - Width-measured greedy word wrapping
//! - Spanish date formatting ("Enero de 2026")
//! - Identity-document number grouping ("1.234.567.890")
//!
//! # Example
//!
//! ```ignore
//! use latin_text::{to_latin1, format_month_year};
//!
//! let (text, lossy) = to_latin1("Curso de diseño — nivel Ⅱ");
//! assert!(lossy); // the em dash and roman numeral were transliterated
//!
//! let when = chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
//! assert_eq!(format_month_year(when), "Enero de 2026");
//! ```

mod encoding;
mod formatter;
mod linebreak;

pub use encoding::{is_latin1, to_latin1};
pub use formatter::{
    display_name, format_document_number, format_month_year, group_thousands, month_name_es,
    SpanishFormatter,
};
pub use linebreak::wrap_to_width;

use thiserror::Error;

/// Errors that can occur during Latin text processing
#[derive(Debug, Error)]
pub enum LatinTextError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type for Latin text operations
pub type Result<T> = std::result::Result<T, LatinTextError>;
