//! Integration tests for pdf-core
//!
//! These tests verify end-to-end behavior against real PDF bytes; the
//! fixture documents are built in-test with lopdf.

use lopdf::dictionary;
use pdf_core::{unit, Align, BuiltinFont, Orientation, PdfDocument, PdfError};

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

/// US Letter landscape fixture (792 x 612 pt)
fn letter_landscape() -> Vec<u8> {
    create_test_pdf(792.0, 612.0)
}

/// Content stream of a page in a saved document
fn page_content(data: &[u8], page: usize) -> String {
    let doc = lopdf::Document::load_mem(data).expect("Failed to parse output");
    let pages = doc.get_pages();
    let page_id = *pages.get(&(page as u32)).expect("page exists");
    let content = doc.get_page_content(page_id).expect("page content");
    String::from_utf8_lossy(&content).to_string()
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

#[test]
fn test_open_save_roundtrip() {
    let pdf_data = letter_landscape();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    assert_eq!(doc.page_count(), 1);

    let saved_data = doc.to_bytes().expect("Failed to save PDF");
    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_append_page_keeps_native_size() {
    let template = letter_landscape();

    let mut doc = PdfDocument::new();
    assert_eq!(doc.page_count(), 0);

    let page = doc
        .append_pdf_page_from_bytes(&template, 1)
        .expect("Failed to import page");
    assert_eq!(page, 1);
    assert_eq!(doc.page_count(), 1);

    let (width, height) = doc.page_size(1).expect("page size");
    assert!((width - 792.0).abs() < 1e-6);
    assert!((height - 612.0).abs() < 1e-6);
    assert_eq!(doc.page_orientation(1).unwrap(), Orientation::Landscape);
}

#[test]
fn test_append_two_pages_with_different_sizes() {
    let first = letter_landscape();
    let second = create_test_pdf(595.28, 841.89); // A4 portrait

    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&first, 1).unwrap();
    doc.append_pdf_page_from_bytes(&second, 1).unwrap();
    assert_eq!(doc.page_count(), 2);

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let reopened = PdfDocument::open_from_bytes(&saved).expect("Failed to re-open");
    assert_eq!(reopened.page_count(), 2);
    assert_eq!(reopened.page_orientation(1).unwrap(), Orientation::Landscape);
    assert_eq!(reopened.page_orientation(2).unwrap(), Orientation::Portrait);

    let (w2, h2) = reopened.page_size(2).unwrap();
    assert!((w2 - 595.28).abs() < 1e-3);
    assert!((h2 - 841.89).abs() < 1e-3);
}

#[test]
fn test_append_invalid_source_page() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();

    let result = doc.append_pdf_page_from_bytes(&template, 2);
    assert!(matches!(result, Err(PdfError::InvalidPage(2, 1))));
}

#[test]
fn test_insert_text_builtin_left() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);
    doc.insert_text("Hello", 1, 100.0, 112.0, Align::Left)
        .expect("Failed to insert text");

    let saved = doc.to_bytes().unwrap();
    let content = page_content(&saved, 1);

    assert!(content.contains("(Hello) Tj"));
    let positions = td_positions(&content);
    assert_eq!(positions.len(), 1);
    // Left alignment leaves the anchor untouched; y flips to bottom
    // origin (612 - 112 = 500)
    assert!((positions[0].0 - 100.0).abs() < 1e-6);
    assert!((positions[0].1 - 500.0).abs() < 1e-6);
}

#[test]
fn test_insert_text_center_shifts_half_width() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);
    let width = doc.text_width("DEMO").unwrap();
    doc.insert_text("DEMO", 1, 396.0, 100.0, Align::Center)
        .unwrap();

    let saved = doc.to_bytes().unwrap();
    let positions = td_positions(&page_content(&saved, 1));
    assert_eq!(positions.len(), 1);

    // Left edge of the rendered text sits at anchor - width/2
    assert!((positions[0].0 - (396.0 - width / 2.0)).abs() < 1e-6);
}

#[test]
fn test_insert_text_right_ends_at_anchor() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    doc.set_builtin_font(BuiltinFont::TimesRoman, 10.0);
    let width = doc.text_width("CV-3490").unwrap();
    doc.insert_text("CV-3490", 1, 700.0, 80.0, Align::Right)
        .unwrap();

    let saved = doc.to_bytes().unwrap();
    let positions = td_positions(&page_content(&saved, 1));
    assert_eq!(positions.len(), 1);

    // Right edge equals the anchor
    assert!((positions[0].0 + width - 700.0).abs() < 1e-6);
}

#[test]
fn test_insert_text_latin1_literal() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);
    doc.insert_text("Pérez", 1, 100.0, 100.0, Align::Left)
        .unwrap();

    let saved = doc.to_bytes().unwrap();
    let content = page_content(&saved, 1);
    // é is escaped as octal \351 in the WinAnsi literal
    assert!(content.contains("(P\\351rez) Tj"));
}

#[test]
fn test_underline_rule_emitted() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);
    doc.set_underline(true);
    doc.insert_text("Hola", 1, 100.0, 100.0, Align::Left)
        .unwrap();

    let saved = doc.to_bytes().unwrap();
    let content = page_content(&saved, 1);
    assert!(content.contains("re f"));
}

#[test]
fn test_empty_text_is_noop() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);
    doc.insert_text("", 1, 100.0, 100.0, Align::Left).unwrap();

    let saved = doc.to_bytes().unwrap();
    let content = page_content(&saved, 1);
    assert!(!content.contains("Tj"));
}

#[test]
fn test_insert_text_invalid_page() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();
    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);

    let result = doc.insert_text("Test", 999, 100.0, 100.0, Align::Left);
    assert!(matches!(result, Err(PdfError::InvalidPage(999, 1))));
}

#[test]
fn test_no_font_selected() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    let result = doc.insert_text("Test", 1, 100.0, 100.0, Align::Left);
    assert!(matches!(result, Err(PdfError::FontNotFound(_))));
}

#[test]
fn test_set_unknown_embedded_font() {
    let mut doc = PdfDocument::new();
    let result = doc.set_font("nonexistent", 12.0);
    assert!(matches!(result, Err(PdfError::FontNotFound(name)) if name == "nonexistent"));
}

#[test]
fn test_text_on_second_page_only() {
    let template = letter_landscape();
    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();

    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);
    doc.insert_text("Page two", 2, 100.0, 100.0, Align::Left)
        .unwrap();

    let saved = doc.to_bytes().unwrap();
    assert!(!page_content(&saved, 1).contains("Tj"));
    assert!(page_content(&saved, 2).contains("(Page two) Tj"));
}

#[test]
fn test_save_writes_file_atomically() {
    let template = letter_landscape();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");

    let mut doc = PdfDocument::new();
    doc.append_pdf_page_from_bytes(&template, 1).unwrap();
    doc.set_builtin_font(BuiltinFont::Helvetica, 12.0);
    doc.insert_text("Hola", 1, 100.0, 100.0, Align::Left)
        .unwrap();
    doc.save(&output).expect("Failed to save");

    assert!(output.exists());
    let reopened = PdfDocument::open(&output).expect("Failed to reopen saved file");
    assert_eq!(reopened.page_count(), 1);

    // No stray temp files left beside the output
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "out.pdf")
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_unit_conversion_letter() {
    // 792 x 612 pt is 279.4 x 215.9 mm within rounding
    assert!((unit::pt_to_mm(792.0) - 279.4).abs() < 0.01);
    assert!((unit::pt_to_mm(612.0) - 215.9).abs() < 0.01);
}
