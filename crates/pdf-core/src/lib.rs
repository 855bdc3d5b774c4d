//! PDF Core - Low-level PDF manipulation
//!
//! This crate provides functionality for:
//! - Importing pages from existing PDFs at their native size
//! - Base-14 fonts (Helvetica, Times, Courier) and embedded TrueType fonts
//! - Inserting aligned text at specific coordinates
//! - Atomic document serialization (temp file + rename)
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, BuiltinFont, PdfDocument};
//!
//! let mut doc = PdfDocument::new();
//! doc.append_pdf_page("template.pdf", 1)?;
//! doc.set_builtin_font(BuiltinFont::HelveticaBold, 18.0);
//! doc.insert_text("MARIA FERNANDA LOPEZ", 1, 396.0, 280.0, Align::Center)?;
//! doc.save("certificate.pdf")?;
//! ```

mod document;
mod font;
mod metrics;
mod text;

pub use document::{Color, PdfDocument};
pub use font::FontData;
pub use metrics::BuiltinFont;
pub use text::{escape_literal, text_operators, underline_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Page orientation, derived from the page box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orientation of a page given its width and height (same unit)
    pub fn from_size(width: f64, height: f64) -> Self {
        if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Length-unit conversion between millimeters (template space) and
/// PDF points (document space)
pub mod unit {
    /// Millimeters per point (25.4 / 72, as commonly rounded)
    pub const MM_PER_PT: f64 = 0.352778;

    pub fn mm_to_pt(mm: f64) -> f64 {
        mm / MM_PER_PT
    }

    pub fn pt_to_mm(pt: f64) -> f64 {
        pt * MM_PER_PT
    }
}
