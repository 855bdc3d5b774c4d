//! Certificate composition engine
//!
//! Overlays learner-specific text onto administrator-uploaded PDF
//! templates at configured coordinates:
//! - Template catalog (base template + per-course templates, positioned
//!   field definitions)
//! - Font registry with style fallback for the decorative faces
//! - Text layout (alignment, wrapping, Latin-1 normalization)
//! - Two-page document composition at native template size
//! - Deterministic artifact naming and newest-wins lookup
//!
//! # Example
//!
//! ```ignore
//! use certificate::{ArtifactCache, CertificateData, CertificateService};
//! use certificate::{FontLibrary, FontRegistry, TemplateCatalog};
//!
//! let catalog = TemplateCatalog::load("storage/catalog.json")?;
//! let registry = FontRegistry::new(FontLibrary::new("storage/fonts"));
//! let cache = ArtifactCache::open("storage/pdfs")?;
//! let service = CertificateService::new(catalog, registry, cache);
//!
//! let path = service.issue(&data)?; // reuses the newest artifact if present
//! ```

pub mod asset;
pub mod cache;
pub mod catalog;
pub mod composer;
pub mod field;
pub mod layout;
pub mod registry;
pub mod service;

pub use asset::{TemplateAsset, TemplateKind};
pub use cache::ArtifactCache;
pub use catalog::TemplateCatalog;
pub use composer::Composer;
pub use field::{
    FieldDefinition, FieldName, FieldSet, FontFamily, FontStyle, RenderValues, Rgb, TextAlign,
    SECOND_PAGE_SUFFIX,
};
pub use registry::{FontFace, FontLibrary, FontRegistry, ResolvedFont};
pub use service::{CertificateData, CertificateService};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring templates or composing
/// certificates
#[derive(Debug, Error)]
pub enum CertificateError {
    /// No active template of the requested kind
    #[error("no active {kind} template{}", match course_id { Some(id) => format!(" for course {id}"), None => String::new() })]
    TemplateNotFound {
        kind: TemplateKind,
        course_id: Option<u64>,
    },

    /// The asset record exists but its file is gone from disk
    #[error("template file missing for asset {asset_id}: {}", path.display())]
    SourceFileMissing { asset_id: u64, path: PathBuf },

    /// The asset id does not name an active template
    #[error("template asset not found or inactive: {asset_id}")]
    AssetNotFound { asset_id: u64 },

    /// Course-page fields need an active base template to live on
    #[error("no active base template to attach course-page fields to")]
    NoBaseTemplate,

    /// A field name outside the allowed set for the target template
    #[error("field '{name}' is not allowed on a {kind} template")]
    InvalidFieldName { name: String, kind: TemplateKind },

    /// A string that names no known field
    #[error("unknown field name: {0}")]
    UnknownField(String),

    /// A custom font file could not be read
    #[error("cannot read font '{family}' from {}: {source}", path.display())]
    FontResource {
        family: FontFamily,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("PDF composition failed: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for certificate operations
pub type Result<T> = std::result::Result<T, CertificateError>;
