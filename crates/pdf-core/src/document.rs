//! PDF Document wrapper

use crate::font::FontData;
use crate::metrics::BuiltinFont;
use crate::text::{escape_literal, text_operators, underline_operators, TextRenderContext};
use crate::{Align, Orientation, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// The face currently selected for text insertion
#[derive(Debug, Clone)]
enum ActiveFont {
    /// A base-14 face, never embedded
    Builtin(BuiltinFont),
    /// An embedded TrueType face, by font name
    Embedded(String),
}

impl ActiveFont {
    fn key(&self) -> String {
        match self {
            ActiveFont::Builtin(b) => b.base_name().to_string(),
            ActiveFont::Embedded(name) => name.clone(),
        }
    }
}

/// PDF Document wrapper providing high-level operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Embedded TrueType faces by name
    fonts: HashMap<String, FontData>,
    /// Built-in faces referenced by inserted text (font key -> face)
    used_builtins: HashMap<String, BuiltinFont>,
    /// Currently selected font
    active_font: Option<ActiveFont>,
    /// Current font size in points
    font_size: f32,
    /// Current text color
    text_color: Color,
    /// Draw an underline rule beneath inserted text
    underline: bool,
    /// Font objects written to the PDF (font key -> object ID)
    font_objects: HashMap<String, ObjectId>,
    /// Page font resources (page number -> font key -> resource name)
    page_font_resources: HashMap<usize, HashMap<String, String>>,
    /// Next font resource number
    next_font_resource: u32,
    /// Buffered content operators per page (flushed at save time)
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Create an empty document (catalog and page tree, no pages)
    ///
    /// Pages are added by importing them from source PDFs with
    /// [`PdfDocument::append_pdf_page`].
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.add_object(dictionary! {
            "Type" => "Pages",
            "Count" => 0,
            "Kids" => Object::Array(vec![]),
        });
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self::wrap(inner)
    }

    /// Open a PDF document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::wrap(inner))
    }

    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::wrap(inner))
    }

    fn wrap(inner: Document) -> Self {
        Self {
            inner,
            fonts: HashMap::new(),
            used_builtins: HashMap::new(),
            active_font: None,
            font_size: 12.0,
            text_color: Color::default(),
            underline: false,
            font_objects: HashMap::new(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            page_content_buffer: HashMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Import a page from another PDF file, appended at its native size
    ///
    /// Returns the new page number (1-indexed).
    pub fn append_pdf_page<P: AsRef<Path>>(&mut self, path: P, source_page: usize) -> Result<usize> {
        let data = std::fs::read(path.as_ref())?;
        self.append_pdf_page_from_bytes(&data, source_page)
    }

    /// Import a page from PDF bytes, appended at its native size
    ///
    /// The whole source object graph moves across (renumbered above this
    /// document's id space); the imported page keeps its own content
    /// streams and resources, so it renders exactly as in the source.
    pub fn append_pdf_page_from_bytes(&mut self, data: &[u8], source_page: usize) -> Result<usize> {
        let mut src = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;

        {
            let src_pages = src.get_pages();
            if source_page == 0 || source_page > src_pages.len() {
                return Err(PdfError::InvalidPage(source_page, src_pages.len()));
            }
        }

        // Renumber the source objects above our current id space
        src.renumber_objects_with(self.inner.max_id + 1);

        let src_page_id = {
            let src_pages = src.get_pages();
            let len = src_pages.len();
            *src_pages
                .get(&(source_page as u32))
                .ok_or(PdfError::InvalidPage(source_page, len))?
        };

        // Materialize attributes the page may inherit from its parents,
        // before the parent chain is cut
        let media_box = inherited_page_attr(&src, src_page_id, b"MediaBox")
            .or_else(|| inherited_page_attr(&src, src_page_id, b"CropBox"))
            .unwrap_or_else(default_media_box);
        let resources = inherited_page_attr(&src, src_page_id, b"Resources")
            .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));

        // Move every source object across; the source's own catalog and
        // page tree become inert orphans
        let src_max = src.max_id;
        for (id, obj) in std::mem::take(&mut src.objects) {
            self.inner.objects.insert(id, obj);
        }
        self.inner.max_id = src_max;

        // Re-parent the imported page under our page tree
        let pages_id = self.root_pages_id()?;
        let mut page_dict = self
            .inner
            .get_object(src_page_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Imported page is not a dictionary".to_string()))?
            .clone();
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set("MediaBox", media_box);
        page_dict.set("Resources", resources);
        self.inner.objects.insert(src_page_id, page_dict.into());

        self.push_page_to_tree(pages_id, src_page_id)?;

        Ok(self.page_count())
    }

    /// Resolve the root Pages node
    fn root_pages_id(&self) -> Result<ObjectId> {
        let root = self.inner.trailer.get(b"Root").map_err(|_| {
            PdfError::ParseError("Document trailer missing Root entry".to_string())
        })?;
        let catalog_id = root
            .as_reference()
            .map_err(|_| PdfError::ParseError("Root is not a reference".to_string()))?;
        let catalog = self
            .inner
            .get_object(catalog_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Catalog is not a dictionary".to_string()))?;
        catalog
            .get(b"Pages")
            .map_err(|_| PdfError::ParseError("Catalog missing Pages entry".to_string()))?
            .as_reference()
            .map_err(|_| PdfError::ParseError("Pages is not a reference".to_string()))
    }

    /// Append a page reference to the Kids array and bump Count
    fn push_page_to_tree(&mut self, pages_id: ObjectId, page_id: ObjectId) -> Result<()> {
        let pages_dict = self
            .inner
            .get_object(pages_id)?
            .as_dict()
            .map_err(|_| PdfError::ParseError("Pages object is not a dictionary".to_string()))?
            .clone();

        let mut kids = match pages_dict.get(b"Kids") {
            Ok(kids) => kids
                .as_array()
                .map_err(|_| PdfError::ParseError("Kids is not an array".to_string()))?
                .clone(),
            Err(_) => Vec::new(),
        };
        kids.push(Object::Reference(page_id));

        let count = pages_dict
            .get(b"Count")
            .ok()
            .and_then(|c| c.as_i64().ok())
            .unwrap_or(0);

        let mut new_pages = pages_dict;
        new_pages.set("Kids", Object::Array(kids));
        new_pages.set("Count", Object::Integer(count + 1));
        self.inner.objects.insert(pages_id, new_pages.into());

        Ok(())
    }

    /// Look up a page's object ID (1-indexed)
    fn page_object_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        let len = pages.len();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, len))
    }

    /// Page size in points (width, height), from the page box
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let page_id = self.page_object_id(page)?;
        let media_box = inherited_page_attr(&self.inner, page_id, b"MediaBox")
            .or_else(|| inherited_page_attr(&self.inner, page_id, b"CropBox"))
            .unwrap_or_else(default_media_box);

        let arr = media_box
            .as_array()
            .map_err(|_| PdfError::ParseError("MediaBox is not an array".to_string()))?
            .clone();
        if arr.len() < 4 {
            return Err(PdfError::ParseError("Invalid MediaBox format".to_string()));
        }

        let coords: Vec<f64> = arr
            .iter()
            .take(4)
            .map(|o| {
                as_number(o)
                    .ok_or_else(|| PdfError::ParseError("Invalid MediaBox coordinate".to_string()))
            })
            .collect::<Result<_>>()?;

        Ok((coords[2] - coords[0], coords[3] - coords[1]))
    }

    /// Page orientation, derived from the page box
    pub fn page_orientation(&self, page: usize) -> Result<Orientation> {
        let (width, height) = self.page_size(page)?;
        Ok(Orientation::from_size(width, height))
    }

    fn page_height(&self, page: usize) -> Result<f64> {
        Ok(self.page_size(page)?.1)
    }

    /// Add an embedded TrueType font to the document
    pub fn add_font(&mut self, name: &str, ttf_data: &[u8]) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        let font_data = FontData::from_ttf(name, ttf_data)?;
        self.fonts.insert(name.to_string(), font_data);
        Ok(())
    }

    /// Whether an embedded font with this name is already registered
    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Select an embedded font for subsequent text insertions
    pub fn set_font(&mut self, name: &str, size: f32) -> Result<()> {
        if !self.fonts.contains_key(name) {
            return Err(PdfError::FontNotFound(name.to_string()));
        }
        self.active_font = Some(ActiveFont::Embedded(name.to_string()));
        self.font_size = size;
        Ok(())
    }

    /// Select a built-in (base-14) font for subsequent text insertions
    pub fn set_builtin_font(&mut self, font: BuiltinFont, size: f32) {
        self.active_font = Some(ActiveFont::Builtin(font));
        self.font_size = size;
    }

    /// Set only the font size (keeps the current face)
    pub fn set_font_size(&mut self, size: f32) -> Result<()> {
        if self.active_font.is_none() {
            return Err(PdfError::FontNotFound("no font selected".to_string()));
        }
        self.font_size = size;
        Ok(())
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    /// Enable or disable the underline rule for inserted text
    pub fn set_underline(&mut self, underline: bool) {
        self.underline = underline;
    }

    /// Width of `text` in points at the current font and size
    pub fn text_width(&self, text: &str) -> Result<f64> {
        match &self.active_font {
            None => Err(PdfError::FontNotFound("no font selected".to_string())),
            Some(ActiveFont::Builtin(font)) => {
                Ok(font.text_width_points(text, self.font_size) as f64)
            }
            Some(ActiveFont::Embedded(name)) => {
                let font_data = self
                    .fonts
                    .get(name)
                    .ok_or_else(|| PdfError::FontNotFound(name.clone()))?;
                Ok(font_data.text_width_points(text, self.font_size) as f64)
            }
        }
    }

    /// Insert text at a specific position
    ///
    /// The x coordinate is the text's left edge for `Align::Left`, its
    /// midpoint for `Align::Center` and its right edge for `Align::Right`.
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Baseline Y coordinate in points (from top)
    /// * `align` - Text alignment
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        // Nothing to render
        if text.is_empty() {
            return Ok(());
        }

        let font = self
            .active_font
            .clone()
            .ok_or_else(|| PdfError::FontNotFound("no font selected".to_string()))?;

        let width = self.text_width(text)?;

        let draw_x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };

        // Convert top-origin y to PDF bottom-origin
        let page_height = self.page_height(page)?;
        let pdf_y = page_height - y;

        let font_key = font.key();
        if let ActiveFont::Builtin(builtin) = &font {
            self.used_builtins.insert(font_key.clone(), *builtin);
        }
        let font_resource = self.font_resource_for_page(&font_key, page);

        let show = match &font {
            ActiveFont::Builtin(_) => escape_literal(text),
            ActiveFont::Embedded(name) => {
                let font_data = self
                    .fonts
                    .get_mut(name)
                    .ok_or_else(|| PdfError::FontNotFound(name.clone()))?;
                font_data.add_chars(text);
                font_data.encode_text_hex(text)
            }
        };

        let ctx = TextRenderContext {
            font_resource,
            font_size: self.font_size,
            color: self.text_color,
        };
        let mut ops = text_operators(&show, draw_x, pdf_y, &ctx);
        if self.underline {
            ops.extend_from_slice(&underline_operators(
                draw_x,
                pdf_y,
                width,
                self.font_size,
                self.text_color,
            ));
        }
        self.buffer_content(page, &ops);

        Ok(())
    }

    /// Get or create the content-stream resource name for a font key on
    /// a page (e.g. "F1"); the font object itself is written at save
    /// time, when every used face is known
    fn font_resource_for_page(&mut self, font_key: &str, page: usize) -> String {
        let page_resources = self.page_font_resources.entry(page).or_default();

        if let Some(resource_name) = page_resources.get(font_key) {
            return resource_name.clone();
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        page_resources.insert(font_key.to_string(), resource_name.clone());
        resource_name
    }

    /// Save the document to a file, atomically (temp file + rename)
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        write_atomic(path.as_ref(), &bytes)
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        // 1. Flush buffered content streams to pages
        self.flush_content_buffers()?;

        // 2. Write font objects (built-in dictionaries, embedded files)
        self.write_font_objects()?;

        // 3. Point page resources at the font objects
        self.finalize_page_font_resources()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Write all referenced font objects into the PDF
    fn write_font_objects(&mut self) -> Result<()> {
        self.font_objects.clear();

        // Built-in faces: a bare Type1 dictionary, nothing embedded
        let mut builtins: Vec<(String, BuiltinFont)> = self
            .used_builtins
            .iter()
            .map(|(key, font)| (key.clone(), *font))
            .collect();
        builtins.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, font) in builtins {
            let font_id = self.inner.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            self.font_objects.insert(key, font_id);
        }

        // Embedded faces that were actually drawn with
        let mut names: Vec<String> = self
            .fonts
            .iter()
            .filter(|(_, font_data)| !font_data.used_chars.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();

        for name in names {
            self.embed_font_object(&name)?;
        }

        Ok(())
    }

    /// Embed a single TrueType font object into the PDF
    fn embed_font_object(&mut self, font_name: &str) -> Result<ObjectId> {
        let font_data = self
            .fonts
            .get(font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.to_string()))?;

        let font_objects = font_data.to_pdf_objects()?;

        // Font file stream
        let font_file_id = self.inner.add_object(font_objects.font_file_stream);

        // Font descriptor with the font file reference
        let mut font_descriptor = font_objects.font_descriptor;
        font_descriptor.set("FontFile2", Object::Reference(font_file_id));
        let font_descriptor_id = self.inner.add_object(font_descriptor);

        // CIDFont with the descriptor reference
        let mut cid_font = font_objects.cid_font;
        cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
        let cid_font_id = self.inner.add_object(cid_font);

        // Type0 font with CIDFont and ToUnicode references
        let mut type0_font = font_objects.type0_font;
        type0_font.set(
            "DescendantFonts",
            Object::Array(vec![Object::Reference(cid_font_id)]),
        );
        let tounicode_id = self.inner.add_object(font_objects.tounicode_stream);
        type0_font.set("ToUnicode", Object::Reference(tounicode_id));

        let type0_font_id = self.inner.add_object(type0_font);
        self.font_objects
            .insert(font_name.to_string(), type0_font_id);

        Ok(type0_font_id)
    }

    /// Add font references to every page that uses them
    fn finalize_page_font_resources(&mut self) -> Result<()> {
        let page_resources: Vec<(usize, Vec<(String, String)>)> = self
            .page_font_resources
            .iter()
            .map(|(&page, fonts)| {
                let font_list: Vec<_> = fonts
                    .iter()
                    .map(|(font_key, resource_name)| (font_key.clone(), resource_name.clone()))
                    .collect();
                (page, font_list)
            })
            .collect();

        for (page, fonts) in page_resources {
            if !fonts.is_empty() {
                self.add_fonts_to_page_resources(page, &fonts)?;
            }
        }

        Ok(())
    }

    /// Add multiple font references to a page's Resources dictionary
    fn add_fonts_to_page_resources(
        &mut self,
        page: usize,
        fonts: &[(String, String)],
    ) -> Result<()> {
        let page_id = self.page_object_id(page)?;

        let page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?
            .clone();

        let mut resources_dict = match page_dict.get(b"Resources") {
            Ok(resources) => match resources.as_dict() {
                Ok(dict) => dict.clone(),
                Err(_) => Dictionary::new(),
            },
            Err(_) => Dictionary::new(),
        };

        let mut font_dict = match resources_dict.get(b"Font") {
            Ok(font) => match font.as_dict() {
                Ok(dict) => dict.clone(),
                Err(_) => Dictionary::new(),
            },
            Err(_) => Dictionary::new(),
        };

        for (font_key, resource_name) in fonts {
            let font_ref = self
                .font_objects
                .get(font_key)
                .ok_or_else(|| PdfError::FontNotFound(font_key.to_string()))?;
            font_dict.set(resource_name.as_bytes(), Object::Reference(*font_ref));
        }

        resources_dict.set(b"Font", Object::Dictionary(font_dict));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Resources", Object::Dictionary(resources_dict));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Buffer content operators for a page (written at save time)
    ///
    /// Appending to the content stream immediately would create one
    /// orphan stream object per insertion; buffering flushes them all at
    /// once during save.
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    ///
    /// Handles single streams, referenced streams and stream arrays,
    /// compressed or not; the result is one uncompressed stream.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_object_id(page)?;

        let (existing_content, page_dict_clone) = {
            let page_obj = self.inner.get_object(page_id)?;
            let page_dict = page_obj
                .as_dict()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;

            let page_dict_clone = page_dict.clone();

            let existing_content = match page_dict.get(b"Contents") {
                Ok(contents) => match contents {
                    Object::Stream(stream) => stream
                        .decompressed_content()
                        .unwrap_or_else(|_| stream.content.clone()),
                    Object::Reference(ref_id) => {
                        if let Ok(Object::Stream(stream)) = self.inner.get_object(*ref_id) {
                            stream
                                .decompressed_content()
                                .unwrap_or_else(|_| stream.content.clone())
                        } else {
                            Vec::new()
                        }
                    }
                    Object::Array(arr) => {
                        let mut combined = Vec::new();
                        for obj in arr {
                            match obj {
                                Object::Reference(ref_id) => {
                                    if let Ok(Object::Stream(stream)) =
                                        self.inner.get_object(*ref_id)
                                    {
                                        let data = stream
                                            .decompressed_content()
                                            .unwrap_or_else(|_| stream.content.clone());
                                        combined.extend_from_slice(&data);
                                    }
                                }
                                Object::Stream(stream) => {
                                    let data = stream
                                        .decompressed_content()
                                        .unwrap_or_else(|_| stream.content.clone());
                                    combined.extend_from_slice(&data);
                                }
                                _ => {}
                            }
                        }
                        combined
                    }
                    _ => Vec::new(),
                },
                Err(_) => Vec::new(),
            };

            (existing_content, page_dict_clone)
        };

        // Append the overlay after the template content; the separating
        // newline guards against a stream that ends without whitespace
        let mut new_content = existing_content;
        new_content.push(b'\n');
        new_content.extend_from_slice(content);

        let new_stream = Stream::new(Dictionary::new(), new_content);
        let stream_id = self.inner.add_object(new_stream);

        let mut new_page_dict = page_dict_clone;
        new_page_dict.set(b"Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric value of a PDF object, integers included
fn as_number(obj: &Object) -> Option<f64> {
    obj.as_f32()
        .map(|v| v as f64)
        .ok()
        .or_else(|| obj.as_i64().ok().map(|v| v as f64))
}

/// Resolve a page attribute, following the Parent inheritance chain
///
/// A reference value is dereferenced one level so the result stays valid
/// when the page is re-parented into another tree.
fn inherited_page_attr(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = page_id;

    // Safety limit on the parent chain depth
    for _ in 0..10 {
        let dict = doc.get_object(current).ok()?.as_dict().ok()?;

        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(ref_id) => doc.get_object(*ref_id).ok().cloned(),
                other => Some(other.clone()),
            };
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => current = *parent_id,
            _ => break,
        }
    }

    None
}

/// Fallback page box: A4 in points
fn default_media_box() -> Object {
    Object::Array(vec![
        0.into(),
        0.into(),
        Object::Real(595.28),
        Object::Real(841.89),
    ])
}

/// Write bytes to a sibling temp file, then rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| PdfError::IoError(e.error))?;

    Ok(())
}
