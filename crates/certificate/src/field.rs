//! Field model: names, styling and render values
//!
//! Field names form a closed set per template kind; coordinates live in
//! template space (millimeters, y from the top edge) and styling is
//! expressed through checked enums rather than free-form strings.

use crate::{CertificateError, TemplateKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reserved suffix of fields that render on the course (second) page
/// but are persisted against the base asset, because the second-page
/// layout is shared by every course
pub const SECOND_PAGE_SUFFIX: &str = "_pagina2";

/// The positioned fields a certificate can carry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Learner's full name
    Participante,
    /// Identity document number
    Documento,
    /// Course name
    Curso,
    /// Hour load (e.g. "INTENSIDAD 40 HORAS")
    Intensidad,
    /// Issue date (e.g. "Enero de 2026")
    Fecha,
    /// Certificate number (e.g. "CV-3490")
    CertificadoId,
    /// Certificate number repeated on the course page
    CertificadoIdPagina2,
}

impl FieldName {
    /// Every known field, base page first
    pub const ALL: [FieldName; 7] = [
        FieldName::Participante,
        FieldName::Documento,
        FieldName::Curso,
        FieldName::Intensidad,
        FieldName::Fecha,
        FieldName::CertificadoId,
        FieldName::CertificadoIdPagina2,
    ];

    /// Wire/storage name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Participante => "participante",
            FieldName::Documento => "documento",
            FieldName::Curso => "curso",
            FieldName::Intensidad => "intensidad",
            FieldName::Fecha => "fecha",
            FieldName::CertificadoId => "certificado_id",
            FieldName::CertificadoIdPagina2 => "certificado_id_pagina2",
        }
    }

    /// Whether the field renders on the course (second) page
    pub fn is_second_page(&self) -> bool {
        self.as_str().ends_with(SECOND_PAGE_SUFFIX)
    }

    /// Whether the field may be saved against a template of this kind.
    ///
    /// Base templates own the first-page fields; course templates own
    /// only the `_pagina2` fields (which end up stored on the base
    /// asset).
    pub fn allowed_for(&self, kind: TemplateKind) -> bool {
        match kind {
            TemplateKind::Base => !self.is_second_page(),
            TemplateKind::Course => self.is_second_page(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = CertificateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CertificateError::UnknownField(s.to_string()))
    }
}

/// Logical font family, as chosen in the template editor
///
/// The standard families resolve to built-in PDF faces; cinzel and
/// norms (TT Norms) are custom embedded faces.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Arial,
    Helvetica,
    Times,
    Courier,
    Cinzel,
    #[serde(alias = "ttnorms")]
    Norms,
}

impl FontFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Arial => "arial",
            FontFamily::Helvetica => "helvetica",
            FontFamily::Times => "times",
            FontFamily::Courier => "courier",
            FontFamily::Cinzel => "cinzel",
            FontFamily::Norms => "norms",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical font style
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    Underline,
    #[serde(rename = "bolditalic")]
    BoldItalic,
}

/// Horizontal anchoring of a field's text at (pos_x, pos_y)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text color, 0-255 per channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

fn default_font_size() -> f32 {
    12.0
}

/// One positioned field: where and how a value is drawn on a template
///
/// The anchor (pos_x, pos_y) is in template space (millimeters, y from
/// the top). A present `max_width` switches the field to wrapped
/// multi-line mode; `prefix` is literal text prepended before layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub pos_x: f64,
    pub pos_y: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub max_width: Option<f64>,
    #[serde(default)]
    pub color: Rgb,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl FieldDefinition {
    /// A left-aligned 12pt black field at the given anchor
    pub fn at(pos_x: f64, pos_y: f64) -> Self {
        Self {
            pos_x,
            pos_y,
            font_size: default_font_size(),
            font_family: FontFamily::default(),
            font_style: FontStyle::default(),
            text_align: TextAlign::default(),
            max_width: None,
            color: Rgb::default(),
            prefix: None,
        }
    }
}

/// The field definitions of one template asset, by field name
pub type FieldSet = BTreeMap<FieldName, FieldDefinition>;

/// The display strings to render, one per configured field.
///
/// Assembled by the issuance collaborator; fields configured on the
/// template but absent here are skipped at composition time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderValues(BTreeMap<FieldName, String>);

impl RenderValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: FieldName, value: impl Into<String>) -> &mut Self {
        self.0.insert(name, value.into());
        self
    }

    pub fn get(&self, name: FieldName) -> Option<&str> {
        self.0.get(&name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

impl FromIterator<(FieldName, String)> for RenderValues {
    fn from_iter<T: IntoIterator<Item = (FieldName, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
