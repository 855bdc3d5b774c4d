//! Document composition: template pages plus overlay fields
//!
//! One code path builds every certificate: page 1 is the base template
//! at its native size, page 2 (when a course template applies) is the
//! course template, and each configured field with a supplied value is
//! drawn through the layout engine. Fields without a value are skipped;
//! that is a best-effort policy, not an error.

use crate::asset::TemplateAsset;
use crate::field::{FieldSet, RenderValues};
use crate::layout;
use crate::registry::FontRegistry;
use crate::{CertificateError, Result};
use pdf_core::PdfDocument;
use std::path::{Path, PathBuf};

/// Composes certificate PDFs from template assets and field definitions
pub struct Composer<'a> {
    registry: &'a FontRegistry,
}

impl<'a> Composer<'a> {
    pub fn new(registry: &'a FontRegistry) -> Self {
        Self { registry }
    }

    /// Compose a certificate document and write it to `output`.
    ///
    /// With no explicit output path, the document goes to a uniquely
    /// named temporary file (the preview case). Returns the path
    /// actually written. The write is atomic either way.
    ///
    /// A missing base template file is fatal; a course asset whose file
    /// has gone missing downgrades the certificate to one page, which
    /// matches how uploads and generation are allowed to race.
    pub fn compose(
        &self,
        base: &TemplateAsset,
        course: Option<&TemplateAsset>,
        fields: &FieldSet,
        values: &RenderValues,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        if !base.file_exists() {
            return Err(CertificateError::SourceFileMissing {
                asset_id: base.id,
                path: base.file_path.clone(),
            });
        }

        // A fresh document per composition; the font registration set
        // lives in it and starts empty
        let mut doc = PdfDocument::new();

        doc.append_pdf_page(&base.file_path, 1)?;
        let (width, height) = doc.page_size(1)?;
        let orientation = doc.page_orientation(1)?;
        tracing::debug!(width, height, ?orientation, "imported base template page");

        for (name, def) in fields {
            if name.is_second_page() {
                continue;
            }
            if let Some(value) = values.get(*name) {
                layout::place(&mut doc, self.registry, 1, value, def)?;
            }
        }

        if let Some(course_asset) = course {
            if course_asset.file_exists() {
                doc.append_pdf_page(&course_asset.file_path, 1)?;
                for (name, def) in fields {
                    if !name.is_second_page() {
                        continue;
                    }
                    if let Some(value) = values.get(*name) {
                        layout::place(&mut doc, self.registry, 2, value, def)?;
                    }
                }
            } else {
                tracing::warn!(
                    asset_id = course_asset.id,
                    path = %course_asset.file_path.display(),
                    "course template file missing, composing single page"
                );
            }
        }

        let output_path = match output {
            Some(path) => path.to_path_buf(),
            None => {
                let file = tempfile::Builder::new()
                    .prefix("cert-")
                    .suffix(".pdf")
                    .tempfile()?;
                file.keep().map_err(|e| CertificateError::Io(e.error))?.1
            }
        };

        doc.save(&output_path)?;

        Ok(output_path)
    }
}
