//! End-to-end composition tests
//!
//! Template fixtures are minimal PDFs built in-test with lopdf; output
//! documents are reopened and their content streams inspected directly.

use certificate::{
    ArtifactCache, CertificateData, CertificateError, CertificateService, Composer,
    FieldDefinition, FieldName, FieldSet, FontFamily, FontLibrary, FontRegistry, FontStyle,
    RenderValues, TemplateCatalog, TemplateKind, TextAlign,
};
use chrono::NaiveDate;
use lopdf::dictionary;
use pdf_core::unit::{mm_to_pt, pt_to_mm};
use pdf_core::BuiltinFont;
use std::path::Path;

/// Create a minimal one-page PDF with the given page size in points
fn create_test_pdf(width: f64, height: f64) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Pages",
        "Count" => 1,
        "Kids" => vec![], // Updated below
    }));

    let contents_id = doc.add_object(lopdf::Object::Stream(lopdf::Stream::new(
        lopdf::dictionary! {},
        vec![],
    )));

    let page_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            lopdf::Object::Real(width as f32),
            lopdf::Object::Real(height as f32),
        ],
        "Resources" => lopdf::dictionary! {},
        "Contents" => contents_id,
    }));

    let mut pages_dict = doc.get_object(pages_id).unwrap().as_dict().unwrap().clone();
    pages_dict.set("Kids", lopdf::Object::Array(vec![page_id.into()]));
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Write a US Letter landscape template (792 x 612 pt) to disk
fn write_letter_template(path: &Path) {
    std::fs::write(path, create_test_pdf(792.0, 612.0)).unwrap();
}

/// Content stream of a page in a saved document
fn page_content(path: &Path, page: usize) -> String {
    let doc = lopdf::Document::load(path).expect("Failed to parse output");
    let pages = doc.get_pages();
    let page_id = *pages.get(&(page as u32)).expect("page exists");
    let content = doc.get_page_content(page_id).expect("page content");
    String::from_utf8_lossy(&content).to_string()
}

fn page_count(path: &Path) -> usize {
    lopdf::Document::load(path).unwrap().get_pages().len()
}

fn page_size(path: &Path, page: usize) -> (f64, f64) {
    let doc = lopdf::Document::load(path).unwrap();
    let pages = doc.get_pages();
    let page_id = *pages.get(&(page as u32)).unwrap();
    let media_box = doc
        .get_object(page_id)
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .clone();
    let coord = |i: usize| -> f64 {
        media_box[i]
            .as_f32()
            .map(|v| v as f64)
            .ok()
            .or_else(|| media_box[i].as_i64().ok().map(|v| v as f64))
            .unwrap()
    };
    (coord(2) - coord(0), coord(3) - coord(1))
}

/// Every `x y Td` position in a content stream
fn td_positions(content: &str) -> Vec<(f64, f64)> {
    content
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_suffix(" Td")?;
            let mut parts = rest.split_whitespace();
            let x = parts.next()?.parse().ok()?;
            let y = parts.next()?.parse().ok()?;
            Some((x, y))
        })
        .collect()
}

struct Fixture {
    _dir: tempfile::TempDir,
    catalog: TemplateCatalog,
    registry: FontRegistry,
    out_dir: std::path::PathBuf,
}

impl Fixture {
    /// A catalog with a letter-landscape base template, optionally a
    /// course template for course 7
    fn new(with_course: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let base_path = dir.path().join("certificado-base.pdf");
        write_letter_template(&base_path);

        let mut catalog = TemplateCatalog::new();
        catalog.register_base(&base_path, 0);

        if with_course {
            let course_path = dir.path().join("curso-7-contenidos.pdf");
            write_letter_template(&course_path);
            catalog.register_course(7, &course_path, 0);
        }

        let registry = FontRegistry::new(FontLibrary::new(dir.path().join("fonts")));
        let out_dir = dir.path().join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        Self {
            _dir: dir,
            catalog,
            registry,
            out_dir,
        }
    }

    fn base_id(&self) -> u64 {
        self.catalog.active_base().unwrap().id
    }

    fn compose(
        &self,
        fields: &FieldSet,
        values: &RenderValues,
        with_course: bool,
        name: &str,
    ) -> std::path::PathBuf {
        let composer = Composer::new(&self.registry);
        let output = self.out_dir.join(name);
        composer
            .compose(
                self.catalog.active_base().unwrap(),
                if with_course {
                    self.catalog.active_course(7)
                } else {
                    None
                },
                fields,
                values,
                Some(&output),
            )
            .expect("composition failed")
    }
}

fn centered_field(pos_x: f64, pos_y: f64, size: f32) -> FieldDefinition {
    FieldDefinition {
        font_size: size,
        text_align: TextAlign::Center,
        ..FieldDefinition::at(pos_x, pos_y)
    }
}

#[test]
fn test_single_page_keeps_native_letter_size() {
    let fx = Fixture::new(false);
    let fields = FieldSet::new();
    let out = fx.compose(&fields, &RenderValues::new(), false, "plain.pdf");

    assert_eq!(page_count(&out), 1);
    let (w, h) = page_size(&out, 1);
    // 279.4 x 215.9 mm, as points
    assert!((pt_to_mm(w) - 279.4).abs() < 0.01);
    assert!((pt_to_mm(h) - 215.9).abs() < 0.01);
}

#[test]
fn test_center_alignment_half_width_shift() {
    let fx = Fixture::new(false);

    let mut fields = FieldSet::new();
    fields.insert(FieldName::Curso, centered_field(139.7, 100.0, 12.0));

    let mut values = RenderValues::new();
    values.set(FieldName::Curso, "DEMO");

    let out = fx.compose(&fields, &values, false, "center.pdf");
    let positions = td_positions(&page_content(&out, 1));
    assert_eq!(positions.len(), 1);

    let width = BuiltinFont::Helvetica.text_width_points("DEMO", 12.0) as f64;
    let expected_x = mm_to_pt(139.7) - width / 2.0;
    assert!((positions[0].0 - expected_x).abs() < 1e-6);
}

#[test]
fn test_right_alignment_ends_at_anchor() {
    let fx = Fixture::new(false);

    let mut fields = FieldSet::new();
    fields.insert(
        FieldName::CertificadoId,
        FieldDefinition {
            text_align: TextAlign::Right,
            ..FieldDefinition::at(260.0, 200.0)
        },
    );

    let mut values = RenderValues::new();
    values.set(FieldName::CertificadoId, "CV-3490");

    let out = fx.compose(&fields, &values, false, "right.pdf");
    let positions = td_positions(&page_content(&out, 1));
    assert_eq!(positions.len(), 1);

    let width = BuiltinFont::Helvetica.text_width_points("CV-3490", 12.0) as f64;
    assert!((positions[0].0 + width - mm_to_pt(260.0)).abs() < 1e-6);
}

#[test]
fn test_wrapped_field_line_height() {
    let fx = Fixture::new(false);

    let mut fields = FieldSet::new();
    fields.insert(
        FieldName::Curso,
        FieldDefinition {
            font_size: 14.0,
            max_width: Some(40.0),
            ..FieldDefinition::at(50.0, 100.0)
        },
    );

    let mut values = RenderValues::new();
    values.set(
        FieldName::Curso,
        "Auditoría interna de sistemas de gestión de calidad",
    );

    let out = fx.compose(&fields, &values, false, "wrapped.pdf");
    let positions = td_positions(&page_content(&out, 1));
    assert!(positions.len() >= 2, "expected a wrapped block");

    // Lines step down by 120% of the font size (as mm), independent of
    // content; left alignment keeps each line at the anchor
    let expected_step = mm_to_pt(14.0 * 0.352778 * 1.20);
    for pair in positions.windows(2) {
        assert!((pair[0].1 - pair[1].1 - expected_step).abs() < 1e-6);
        assert!((pair[0].0 - mm_to_pt(50.0)).abs() < 1e-6);
    }
}

#[test]
fn test_prefix_measured_as_single_unit() {
    let fx = Fixture::new(false);

    let mut fields = FieldSet::new();
    fields.insert(
        FieldName::Curso,
        FieldDefinition {
            prefix: Some("EN EL CURSO ".to_string()),
            ..centered_field(139.7, 100.0, 12.0)
        },
    );

    let mut values = RenderValues::new();
    values.set(FieldName::Curso, "SQL");

    let out = fx.compose(&fields, &values, false, "prefix.pdf");
    let content = page_content(&out, 1);

    assert!(content.contains("(EN EL CURSO SQL) Tj"));

    let width = BuiltinFont::Helvetica.text_width_points("EN EL CURSO SQL", 12.0) as f64;
    let positions = td_positions(&content);
    assert!((positions[0].0 - (mm_to_pt(139.7) - width / 2.0)).abs() < 1e-6);
}

#[test]
fn test_two_page_composition_field_split() {
    let fx = Fixture::new(true);

    let mut fields = FieldSet::new();
    fields.insert(FieldName::CertificadoId, FieldDefinition::at(20.0, 200.0));
    fields.insert(
        FieldName::CertificadoIdPagina2,
        FieldDefinition::at(250.0, 200.0),
    );

    let mut values = RenderValues::new();
    values.set(FieldName::CertificadoId, "CV-1111");
    values.set(FieldName::CertificadoIdPagina2, "P2-2222");

    let out = fx.compose(&fields, &values, true, "two-page.pdf");
    assert_eq!(page_count(&out), 2);

    let first = page_content(&out, 1);
    let second = page_content(&out, 2);

    // Page 1 carries only the first-page fields, page 2 only _pagina2
    assert!(first.contains("(CV-1111) Tj"));
    assert!(!first.contains("(P2-2222)"));
    assert!(second.contains("(P2-2222) Tj"));
    assert!(!second.contains("(CV-1111)"));
}

#[test]
fn test_missing_course_file_downgrades_to_one_page() {
    let fx = Fixture::new(true);
    let course_path = fx.catalog.active_course(7).unwrap().file_path.clone();
    std::fs::remove_file(course_path).unwrap();

    let mut values = RenderValues::new();
    values.set(FieldName::CertificadoIdPagina2, "P2");

    let mut fields = FieldSet::new();
    fields.insert(
        FieldName::CertificadoIdPagina2,
        FieldDefinition::at(250.0, 200.0),
    );

    let out = fx.compose(&fields, &values, true, "downgraded.pdf");
    assert_eq!(page_count(&out), 1);
}

#[test]
fn test_missing_base_file_is_fatal() {
    let fx = Fixture::new(false);
    let base = fx.catalog.active_base().unwrap().clone();
    std::fs::remove_file(&base.file_path).unwrap();

    let composer = Composer::new(&fx.registry);
    let err = composer
        .compose(
            &base,
            None,
            &FieldSet::new(),
            &RenderValues::new(),
            Some(&fx.out_dir.join("never.pdf")),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        CertificateError::SourceFileMissing { asset_id, .. } if asset_id == base.id
    ));
    assert!(!fx.out_dir.join("never.pdf").exists());
}

#[test]
fn test_configured_field_without_value_is_skipped() {
    let fx = Fixture::new(false);

    let mut fields = FieldSet::new();
    fields.insert(FieldName::Participante, FieldDefinition::at(10.0, 10.0));
    fields.insert(FieldName::Curso, FieldDefinition::at(10.0, 30.0));

    let mut values = RenderValues::new();
    values.set(FieldName::Curso, "SQL");

    let out = fx.compose(&fields, &values, false, "partial.pdf");
    let content = page_content(&out, 1);

    // Only the supplied value renders; no placeholder for the rest
    assert!(content.contains("(SQL) Tj"));
    assert_eq!(content.matches(" Tj").count(), 1);
}

#[test]
fn test_repeat_generation_identical_overlay() {
    let fx = Fixture::new(false);

    let mut fields = FieldSet::new();
    fields.insert(FieldName::Curso, centered_field(139.7, 100.0, 12.0));

    let mut values = RenderValues::new();
    values.set(FieldName::Curso, "DEMO");

    let first = fx.compose(&fields, &values, false, "idempotent-a.pdf");
    let second = fx.compose(&fields, &values, false, "idempotent-b.pdf");

    assert_eq!(page_content(&first, 1), page_content(&second, 1));
}

#[test]
fn test_preview_writes_temp_path() {
    let fx = Fixture::new(false);

    let mut fields = FieldSet::new();
    fields.insert(FieldName::Curso, FieldDefinition::at(10.0, 10.0));
    let mut values = RenderValues::new();
    values.set(FieldName::Curso, "SQL");

    let composer = Composer::new(&fx.registry);
    let out = composer
        .compose(
            fx.catalog.active_base().unwrap(),
            None,
            &fields,
            &values,
            None,
        )
        .unwrap();

    assert!(out.exists());
    assert_eq!(page_count(&out), 1);
    std::fs::remove_file(out).unwrap();
}

#[test]
fn test_service_issue_then_reuse() {
    let fx = Fixture::new(false);
    let base_id = fx.base_id();

    let mut catalog = fx.catalog.clone();
    let mut fields = FieldSet::new();
    fields.insert(FieldName::Participante, centered_field(139.7, 95.0, 18.0));
    catalog.save_fields(base_id, fields).unwrap();

    let cache = ArtifactCache::open(fx.out_dir.join("pdfs")).unwrap();
    let service = CertificateService::new(catalog, fx.registry.clone(), cache);

    let data = CertificateData {
        certificate_number: "CV-3490".to_string(),
        first_name: "Juan".to_string(),
        last_name: "Pérez".to_string(),
        id_number: None,
        course_name: "SQL".to_string(),
        hours: 40,
        issued_on: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        course_id: None,
    };

    let first = service.issue(&data).unwrap();
    assert!(first.exists());
    let name = first.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("certificado_CV_3490_"));
    assert!(name.ends_with(".pdf"));

    // A second issue reuses the artifact instead of regenerating
    let second = service.issue(&data).unwrap();
    assert_eq!(first, second);

    // Regeneration replaces it
    let third = service.regenerate(&data).unwrap();
    assert!(third.exists());
    assert_eq!(
        service.cache().artifacts_for("CV-3490").unwrap().len(),
        1
    );
}

#[test]
fn test_save_fields_rejected_for_unknown_kind_mismatch() {
    let fx = Fixture::new(true);
    let mut catalog = fx.catalog.clone();
    let course_id = catalog.active_course(7).unwrap().id;

    let mut fields = FieldSet::new();
    fields.insert(FieldName::Participante, FieldDefinition::at(0.0, 0.0));

    let err = catalog.save_fields(course_id, fields).unwrap_err();
    assert!(matches!(
        err,
        CertificateError::InvalidFieldName {
            kind: TemplateKind::Course,
            ..
        }
    ));
}

#[test]
fn test_cinzel_italic_falls_back_without_failing() {
    // Style resolution is pure; the fallback never errors
    let resolved = certificate::registry::resolve(FontFamily::Cinzel, FontStyle::Italic);
    assert_eq!(
        resolved,
        certificate::registry::resolve(FontFamily::Cinzel, FontStyle::Normal)
    );
}
