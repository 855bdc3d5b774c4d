//! Font registry: logical family/style to concrete face
//!
//! The standard families resolve to built-in PDF faces and bypass
//! registration entirely. The custom faces (Cinzel, TT Norms) are TTF
//! files under the fonts directory, embedded into a document on first
//! use; the document's own font table is the registration set, so
//! embedding happens once per document and never leaks across
//! concurrent compositions.

use crate::field::{FontFamily, FontStyle};
use crate::{CertificateError, Result};
use pdf_core::{BuiltinFont, PdfDocument};
use std::path::{Path, PathBuf};

/// One installable TTF face of a custom family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomFace {
    /// Document-internal font key (also the /BaseFont name)
    pub key: &'static str,
    /// File name under the fonts directory
    pub file: &'static str,
}

pub const CINZEL_REGULAR: CustomFace = CustomFace {
    key: "Cinzel",
    file: "cinzel.ttf",
};
pub const CINZEL_BOLD: CustomFace = CustomFace {
    key: "Cinzel-Bold",
    file: "cinzel-bold.ttf",
};
pub const TTNORMS_REGULAR: CustomFace = CustomFace {
    key: "TTNorms",
    file: "ttnorms.ttf",
};
pub const TTNORMS_BOLD: CustomFace = CustomFace {
    key: "TTNorms-Bold",
    file: "ttnorms-bold.ttf",
};
pub const TTNORMS_ITALIC: CustomFace = CustomFace {
    key: "TTNorms-Italic",
    file: "ttnorms-italic.ttf",
};
pub const TTNORMS_BOLD_ITALIC: CustomFace = CustomFace {
    key: "TTNorms-BoldItalic",
    file: "ttnorms-bolditalic.ttf",
};

/// A concrete face a field resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    /// Base-14 face, never embedded
    Builtin(BuiltinFont),
    /// Embedded TTF face
    Custom(CustomFace),
}

/// Result of resolving a logical family + style request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFont {
    pub face: FontFace,
    /// Underline is a decoration, not a face; it is drawn as a rule
    pub underline: bool,
}

/// Resolve a logical family and style to a concrete face.
///
/// Families without a requested face degrade to the nearest available
/// style instead of failing: Cinzel ships no italic, so italic falls
/// back to regular and bold-italic to bold.
pub fn resolve(family: FontFamily, style: FontStyle) -> ResolvedFont {
    let underline = style == FontStyle::Underline;
    let (bold, italic) = match style {
        FontStyle::Normal | FontStyle::Underline => (false, false),
        FontStyle::Bold => (true, false),
        FontStyle::Italic => (false, true),
        FontStyle::BoldItalic => (true, true),
    };

    let face = match family {
        // Arial is an alias for the Helvetica core face
        FontFamily::Arial | FontFamily::Helvetica => FontFace::Builtin(match (bold, italic) {
            (false, false) => BuiltinFont::Helvetica,
            (true, false) => BuiltinFont::HelveticaBold,
            (false, true) => BuiltinFont::HelveticaOblique,
            (true, true) => BuiltinFont::HelveticaBoldOblique,
        }),
        FontFamily::Times => FontFace::Builtin(match (bold, italic) {
            (false, false) => BuiltinFont::TimesRoman,
            (true, false) => BuiltinFont::TimesBold,
            (false, true) => BuiltinFont::TimesItalic,
            (true, true) => BuiltinFont::TimesBoldItalic,
        }),
        FontFamily::Courier => FontFace::Builtin(match (bold, italic) {
            (false, false) => BuiltinFont::Courier,
            (true, false) => BuiltinFont::CourierBold,
            (false, true) => BuiltinFont::CourierOblique,
            (true, true) => BuiltinFont::CourierBoldOblique,
        }),
        FontFamily::Cinzel => {
            // No italic face; degrade to the nearest style
            FontFace::Custom(if bold { CINZEL_BOLD } else { CINZEL_REGULAR })
        }
        FontFamily::Norms => FontFace::Custom(match (bold, italic) {
            (false, false) => TTNORMS_REGULAR,
            (true, false) => TTNORMS_BOLD,
            (false, true) => TTNORMS_ITALIC,
            (true, true) => TTNORMS_BOLD_ITALIC,
        }),
    };

    ResolvedFont { face, underline }
}

/// Locates custom font files on disk
#[derive(Debug, Clone)]
pub struct FontLibrary {
    fonts_dir: PathBuf,
}

impl FontLibrary {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
        }
    }

    pub fn path_for(&self, face: &CustomFace) -> PathBuf {
        self.fonts_dir.join(face.file)
    }

    pub fn dir(&self) -> &Path {
        &self.fonts_dir
    }
}

/// Registers fonts into documents on demand
#[derive(Debug, Clone)]
pub struct FontRegistry {
    library: FontLibrary,
}

impl FontRegistry {
    pub fn new(library: FontLibrary) -> Self {
        Self { library }
    }

    /// Resolve a family/style and make the face available in the
    /// document.
    ///
    /// Idempotent per (document, face): a face already present in the
    /// document's font table is not read or embedded again. Built-in
    /// faces skip registration entirely.
    pub fn ensure_registered(
        &self,
        doc: &mut PdfDocument,
        family: FontFamily,
        style: FontStyle,
    ) -> Result<ResolvedFont> {
        let resolved = resolve(family, style);

        if let FontFace::Custom(face) = resolved.face {
            if !doc.has_font(face.key) {
                let path = self.library.path_for(&face);
                let data = std::fs::read(&path).map_err(|source| {
                    CertificateError::FontResource {
                        family,
                        path: path.clone(),
                        source,
                    }
                })?;
                doc.add_font(face.key, &data)?;
            }
        }

        Ok(resolved)
    }
}
