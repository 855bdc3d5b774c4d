//! Template catalog: assets and their field definitions
//!
//! Pure configuration state. The composition engine only reads it;
//! administrator actions (uploads, field saves) mutate it. Persisted as
//! one JSON document.

use crate::asset::{TemplateAsset, TemplateKind};
use crate::field::FieldSet;
use crate::{CertificateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// All template configuration: assets plus per-asset field sets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    assets: BTreeMap<u64, TemplateAsset>,
    fields: BTreeMap<u64, FieldSet>,
    next_id: u64,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self {
            assets: BTreeMap::new(),
            fields: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Load a catalog from a JSON file; a missing file yields an empty
    /// catalog
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match fs::read(path.as_ref()) {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the catalog as JSON (temp file + rename)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec_pretty(self)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.persist(path).map_err(|e| CertificateError::Io(e.error))?;

        Ok(())
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Register or replace the base template.
    ///
    /// An existing active base is updated in place with a version bump,
    /// keeping its field definitions.
    pub fn register_base(&mut self, file_path: impl Into<PathBuf>, byte_size: u64) -> TemplateAsset {
        let file_path = file_path.into();

        let existing = self.active_base().map(|asset| asset.id);
        if let Some(asset) = existing.and_then(|id| self.assets.get_mut(&id)) {
            asset.file_path = file_path;
            asset.byte_size = byte_size;
            asset.version += 1;
            return asset.clone();
        }

        let id = self.allocate_id();
        let asset = TemplateAsset {
            id,
            kind: TemplateKind::Base,
            course_id: None,
            file_path,
            byte_size,
            version: 1,
            active: true,
        };
        self.assets.insert(id, asset.clone());
        asset
    }

    /// Register or replace a course template
    pub fn register_course(
        &mut self,
        course_id: u64,
        file_path: impl Into<PathBuf>,
        byte_size: u64,
    ) -> TemplateAsset {
        let file_path = file_path.into();

        let existing = self.active_course(course_id).map(|asset| asset.id);
        if let Some(asset) = existing.and_then(|id| self.assets.get_mut(&id)) {
            asset.file_path = file_path;
            asset.byte_size = byte_size;
            asset.version += 1;
            return asset.clone();
        }

        let id = self.allocate_id();
        let asset = TemplateAsset {
            id,
            kind: TemplateKind::Course,
            course_id: Some(course_id),
            file_path,
            byte_size,
            version: 1,
            active: true,
        };
        self.assets.insert(id, asset.clone());
        asset
    }

    /// The active base template, if any
    pub fn active_base(&self) -> Option<&TemplateAsset> {
        self.assets
            .values()
            .find(|asset| asset.active && asset.kind == TemplateKind::Base)
    }

    /// The active template of a course, if any
    pub fn active_course(&self, course_id: u64) -> Option<&TemplateAsset> {
        self.assets.values().find(|asset| {
            asset.active
                && asset.kind == TemplateKind::Course
                && asset.course_id == Some(course_id)
        })
    }

    /// All active assets
    pub fn assets(&self) -> impl Iterator<Item = &TemplateAsset> {
        self.assets.values().filter(|asset| asset.active)
    }

    /// Soft-delete a course template and remove its file
    pub fn deactivate_course(&mut self, course_id: u64) -> Result<TemplateAsset> {
        let id = self
            .active_course(course_id)
            .map(|asset| asset.id)
            .ok_or(CertificateError::TemplateNotFound {
                kind: TemplateKind::Course,
                course_id: Some(course_id),
            })?;

        let asset = match self.assets.get_mut(&id) {
            Some(asset) => {
                asset.active = false;
                asset.clone()
            }
            None => {
                return Err(CertificateError::AssetNotFound { asset_id: id });
            }
        };

        if asset.file_path.exists() {
            fs::remove_file(&asset.file_path)?;
        }

        Ok(asset)
    }

    /// Field definitions stored against an active asset
    pub fn get_fields(&self, asset_id: u64) -> Result<FieldSet> {
        let _asset = self
            .assets
            .get(&asset_id)
            .filter(|asset| asset.active)
            .ok_or(CertificateError::AssetNotFound { asset_id })?;

        Ok(self.fields.get(&asset_id).cloned().unwrap_or_default())
    }

    /// The `_pagina2` fields of the active base template
    ///
    /// These render on every certificate's course page, whichever course
    /// it is.
    pub fn second_page_fields(&self) -> FieldSet {
        let Some(base) = self.active_base() else {
            return FieldSet::new();
        };

        self.fields
            .get(&base.id)
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(name, _)| name.is_second_page())
                    .map(|(name, def)| (*name, def.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Save field definitions against an asset.
    ///
    /// Targeting a course asset redirects the save onto the active base
    /// asset's `_pagina2` subset (the second page is shared by all
    /// courses); targeting the base asset replaces only the first-page
    /// subset. Names outside the allowed set for the effective target
    /// are rejected outright.
    pub fn save_fields(&mut self, asset_id: u64, incoming: FieldSet) -> Result<FieldSet> {
        let kind = self
            .assets
            .get(&asset_id)
            .filter(|asset| asset.active)
            .map(|asset| asset.kind)
            .ok_or(CertificateError::AssetNotFound { asset_id })?;

        let target_id = match kind {
            TemplateKind::Base => asset_id,
            TemplateKind::Course => self
                .active_base()
                .map(|base| base.id)
                .ok_or(CertificateError::NoBaseTemplate)?,
        };

        for name in incoming.keys() {
            if !name.allowed_for(kind) {
                return Err(CertificateError::InvalidFieldName {
                    name: name.as_str().to_string(),
                    kind,
                });
            }
        }

        // Replace only the subset this save owns; the other page's
        // fields stay untouched
        let owns_second_page = kind == TemplateKind::Course;
        let slot = self.fields.entry(target_id).or_default();
        slot.retain(|name, _| name.is_second_page() != owns_second_page);
        for (name, def) in &incoming {
            slot.insert(*name, def.clone());
        }

        Ok(incoming)
    }
}
