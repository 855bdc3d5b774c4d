//! Template assets: the uploaded source PDFs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What a template is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// The shared first page; at most one active
    Base,
    /// A course's second page; at most one active per course
    Course,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Base => f.write_str("base"),
            TemplateKind::Course => f.write_str("course"),
        }
    }
}

/// A stored source PDF
///
/// Re-uploads replace the record in place and bump `version`; deletion
/// is a soft delete via `active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAsset {
    pub id: u64,
    pub kind: TemplateKind,
    /// Required iff `kind` is `Course`
    pub course_id: Option<u64>,
    pub file_path: PathBuf,
    pub byte_size: u64,
    pub version: u32,
    pub active: bool,
}

impl TemplateAsset {
    /// Whether the asset's source file is present on disk
    pub fn file_exists(&self) -> bool {
        self.file_path.exists()
    }
}
