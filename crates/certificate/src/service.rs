//! Certificate issuing service
//!
//! The facade the issuance collaborator calls: assembles render values
//! from learner data, reuses the newest existing artifact when one
//! exists, and otherwise composes a new one. The check-then-generate
//! sequence is serialized per certificate number, so two concurrent
//! requests for the same number cannot both miss the cache and write
//! duplicate artifacts.

use crate::cache::ArtifactCache;
use crate::catalog::TemplateCatalog;
use crate::composer::Composer;
use crate::field::{FieldName, RenderValues};
use crate::registry::FontRegistry;
use crate::{CertificateError, Result, TemplateKind};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Learner and course data for one certificate, as assembled by the
/// issuance collaborator
#[derive(Debug, Clone)]
pub struct CertificateData {
    /// e.g. "CV-3490"
    pub certificate_number: String,
    pub first_name: String,
    pub last_name: String,
    /// Identity document number, digits in any formatting
    pub id_number: Option<String>,
    pub course_name: String,
    /// Course hour load
    pub hours: u32,
    pub issued_on: NaiveDate,
    /// Set when a course (page-2) template applies
    pub course_id: Option<u64>,
}

impl CertificateData {
    /// Build the field values the way they print on the certificate
    pub fn to_render_values(&self) -> RenderValues {
        let mut values = RenderValues::new();

        values.set(
            FieldName::Participante,
            latin_text::display_name(&self.first_name, &self.last_name),
        );
        if let Some(id_number) = &self.id_number {
            values.set(
                FieldName::Documento,
                format!("CC {}", latin_text::format_document_number(id_number)),
            );
        }
        values.set(FieldName::Curso, self.course_name.clone());
        values.set(
            FieldName::Intensidad,
            format!("INTENSIDAD {} HORAS", self.hours),
        );
        values.set(
            FieldName::Fecha,
            latin_text::format_month_year(self.issued_on),
        );
        values.set(FieldName::CertificadoId, self.certificate_number.clone());
        // The same number repeats on the course page
        values.set(
            FieldName::CertificadoIdPagina2,
            self.certificate_number.clone(),
        );

        values
    }
}

/// Issues certificates against the configured templates
pub struct CertificateService {
    catalog: TemplateCatalog,
    registry: FontRegistry,
    cache: ArtifactCache,
    /// One lock per sanitized certificate number serializes the
    /// check-then-generate sequence
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Lock a mutex, recovering the guard from a poisoned peer
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CertificateService {
    pub fn new(catalog: TemplateCatalog, registry: FontRegistry, cache: ArtifactCache) -> Self {
        Self {
            catalog,
            registry,
            cache,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Template administration goes through here; there is no
    /// coordination with in-flight compositions, which is why template
    /// files are replaced atomically
    pub fn catalog_mut(&mut self) -> &mut TemplateCatalog {
        &mut self.catalog
    }

    pub fn cache(&self) -> &ArtifactCache {
        &self.cache
    }

    fn lock_for(&self, number: &str) -> Arc<Mutex<()>> {
        let key = ArtifactCache::sanitize(number);
        let mut locks = lock_unpoisoned(&self.locks);
        locks.entry(key).or_default().clone()
    }

    /// Return the existing artifact for this certificate number, or
    /// compose a new one
    pub fn issue(&self, data: &CertificateData) -> Result<PathBuf> {
        let lock = self.lock_for(&data.certificate_number);
        let _guard = lock_unpoisoned(&lock);

        if let Some(existing) = self.cache.locate(&data.certificate_number)? {
            tracing::info!(
                certificate = %data.certificate_number,
                path = %existing.display(),
                "reusing existing certificate artifact"
            );
            return Ok(existing);
        }

        self.compose_to_cache(data, Local::now())
    }

    /// Delete any existing artifacts for this certificate number and
    /// compose a fresh one
    pub fn regenerate(&self, data: &CertificateData) -> Result<PathBuf> {
        let lock = self.lock_for(&data.certificate_number);
        let _guard = lock_unpoisoned(&lock);

        let removed = self.cache.remove_all(&data.certificate_number)?;
        if removed > 0 {
            tracing::info!(
                certificate = %data.certificate_number,
                removed,
                "removed artifacts before regeneration"
            );
        }

        self.compose_to_cache(data, Local::now())
    }

    fn compose_to_cache(&self, data: &CertificateData, at: DateTime<Local>) -> Result<PathBuf> {
        let base = self
            .catalog
            .active_base()
            .ok_or(CertificateError::TemplateNotFound {
                kind: TemplateKind::Base,
                course_id: None,
            })?;
        let course = data.course_id.and_then(|id| self.catalog.active_course(id));
        let fields = self.catalog.get_fields(base.id)?;

        let output = self.cache.path_for(&data.certificate_number, at);
        let composer = Composer::new(&self.registry);
        let path = composer.compose(base, course, &fields, &data.to_render_values(), Some(&output))?;

        tracing::info!(
            certificate = %data.certificate_number,
            course = %data.course_name,
            path = %path.display(),
            "generated certificate"
        );

        Ok(path)
    }

    /// Compose a preview with sample data to a temporary path.
    ///
    /// Requires both the base template and the course's template; the
    /// file is not cached under any certificate number.
    pub fn preview(&self, course_id: u64) -> Result<PathBuf> {
        let base = self
            .catalog
            .active_base()
            .ok_or(CertificateError::TemplateNotFound {
                kind: TemplateKind::Base,
                course_id: None,
            })?;
        let course = self.catalog.active_course(course_id).ok_or(
            CertificateError::TemplateNotFound {
                kind: TemplateKind::Course,
                course_id: Some(course_id),
            },
        )?;
        let fields = self.catalog.get_fields(base.id)?;

        let mut values = RenderValues::new();
        values
            .set(FieldName::Participante, "JUAN CARLOS PÉREZ GARCÍA")
            .set(FieldName::Documento, "CC 1.234.567.890")
            .set(FieldName::Curso, "Curso de ejemplo")
            .set(FieldName::Intensidad, "INTENSIDAD 40 HORAS")
            .set(
                FieldName::Fecha,
                latin_text::format_month_year(Local::now().date_naive()),
            )
            .set(FieldName::CertificadoId, "CV-1234")
            .set(FieldName::CertificadoIdPagina2, "CV-1234");

        let composer = Composer::new(&self.registry);
        composer.compose(base, Some(course), &fields, &values, None)
    }
}
