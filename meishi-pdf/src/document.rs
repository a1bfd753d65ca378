use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Write};
use std::mem;
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;

use crate::error::{PdfError, Result};
use crate::fonts::{BuiltinFont, FontMetrics, FontRef, TrueTypeFontId};
use crate::graphics::{self, format_coord, Color};
use crate::images::{self, ImageData, ImageFormat, ImageHandle, ImageId};
use crate::objects::{ObjId, PdfObject};
use crate::truetype::{FontObjectIds, TrueTypeFont};
use crate::writer::{escape_pdf_string, PdfWriter};

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FONT_HELV_OBJ: ObjId = ObjId(3, 0);
const FIRST_FREE_OBJ_NUM: u32 = 4;
/// Resource numbering for embedded fonts starts after the builtin F1.
const FIRST_TRUETYPE_FONT_NUM: u32 = 2;

/// Font, size, and fill color for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontRef,
    pub font_size: f64,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font: BuiltinFont::Helvetica.into(),
            font_size: 12.0,
            color: Color::BLACK,
        }
    }
}

/// High-level API for building PDF documents.
///
/// Generic over `Write`: build into a `Vec<u8>` and persist the bytes
/// afterwards, or stream straight into a file.
///
/// Pages are written when they end; images are written as soon as
/// they are loaded. TrueType fonts are written last, once every
/// glyph they need is known.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    current_page: Option<PageBuilder>,
    next_obj_num: u32,
    compress: bool,
    fonts: Vec<EmbeddedFont>,
    images: Vec<ObjId>,
}

struct EmbeddedFont {
    font: TrueTypeFont,
    type0_id: ObjId,
}

struct PageBuilder {
    width: f64,
    height: f64,
    content_ops: Vec<u8>,
    fonts: BTreeSet<FontRef>,
    images: BTreeSet<ImageId>,
}

impl<W: Write> PdfDocument<W> {
    /// Create a new PDF document that writes to the given writer.
    /// Writes the header and the shared Helvetica font immediately.
    pub fn new(writer: W) -> Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;

        let helvetica = BuiltinFont::Helvetica;
        let font = PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type1")),
            ("BaseFont", PdfObject::name(helvetica.pdf_base_name())),
            ("Encoding", PdfObject::name("WinAnsiEncoding")),
        ]);
        pdf_writer.write_object(FONT_HELV_OBJ, &font)?;

        Ok(PdfDocument {
            writer: pdf_writer,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_FREE_OBJ_NUM,
            compress: true,
            fonts: Vec::new(),
            images: Vec::new(),
        })
    }

    /// Set a document info entry (e.g. "Creator", "Title").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Enable or disable Flate compression of content streams,
    /// image samples, and embedded font files. On by default.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    /// Number of pages finished so far.
    pub fn page_count(&self) -> usize {
        self.page_obj_ids.len()
    }

    fn alloc_id(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }

    fn page_mut(&mut self) -> Result<&mut PageBuilder> {
        self.current_page.as_mut().ok_or(PdfError::NoOpenPage)
    }

    /// Flate-compress `data` when compression is on; returns the
    /// (possibly compressed) bytes and the Filter entry to use.
    fn encode_stream(&self, data: Vec<u8>) -> io::Result<(Vec<u8>, Option<PdfObject>)> {
        if !self.compress {
            return Ok((data, None));
        }
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&data)?;
        Ok((encoder.finish()?, Some(PdfObject::name("FlateDecode"))))
    }

    // -------------------------------------------------------
    // Fonts
    // -------------------------------------------------------

    /// Parse and register a TrueType font from raw bytes.
    pub fn load_font_bytes(&mut self, data: Vec<u8>) -> Result<FontRef> {
        let index = self.fonts.len();
        let font = TrueTypeFont::from_bytes(data, FIRST_TRUETYPE_FONT_NUM + index as u32)?;
        // The Type0 id is reserved now so pages can reference it;
        // the font objects themselves are written by end_document.
        let type0_id = self.alloc_id();
        debug!("registered font {} as {}", font.postscript_name, font.pdf_name);
        self.fonts.push(EmbeddedFont { font, type0_id });
        Ok(FontRef::TrueType(TrueTypeFontId(index)))
    }

    /// Read a TrueType font file and register it.
    pub fn load_font_file<P: AsRef<Path>>(&mut self, path: P) -> Result<FontRef> {
        let data = fs::read(path)?;
        self.load_font_bytes(data)
    }

    fn truetype(&self, id: TrueTypeFontId) -> Result<&TrueTypeFont> {
        self.fonts
            .get(id.0)
            .map(|f| &f.font)
            .ok_or_else(|| PdfError::Font(format!("unknown font id {}", id.0)))
    }

    /// Width of `text` in points when set in `font` at `font_size`.
    pub fn measure_text(&self, font: FontRef, text: &str, font_size: f64) -> Result<f64> {
        match font {
            FontRef::Builtin(b) => {
                b.check_encodable(text)?;
                Ok(FontMetrics::measure_text(text, b, font_size))
            }
            FontRef::TrueType(id) => Ok(self.truetype(id)?.measure_text(text, font_size)),
        }
    }

    /// Ascent-to-descent height of `font` at `font_size`, in points.
    pub fn font_height(&self, font: FontRef, font_size: f64) -> Result<f64> {
        match font {
            FontRef::Builtin(b) => Ok(FontMetrics::height_at_size(b, font_size)),
            FontRef::TrueType(id) => Ok(self.truetype(id)?.height_at_size(font_size)),
        }
    }

    // -------------------------------------------------------
    // Images
    // -------------------------------------------------------

    /// Decode image bytes with the decoder for `format` and embed
    /// the result as an image XObject.
    pub fn load_image_bytes_as(&mut self, data: Vec<u8>, format: ImageFormat) -> Result<ImageHandle> {
        let image = images::load_image_as(data, format)?;
        self.embed_image(image)
    }

    fn embed_image(&mut self, image: ImageData) -> Result<ImageHandle> {
        let smask_id = match image.smask_data {
            Some(alpha) => {
                let id = self.alloc_id();
                let (data, filter) = self.encode_stream(alpha)?;
                let mut dict = image_dict(image.width, image.height, "DeviceGray");
                dict.extend(filter.map(|f| ("Filter", f)));
                self.writer.write_object(id, &PdfObject::stream(dict, data))?;
                Some(id)
            }
            None => None,
        };

        let obj_id = self.alloc_id();
        let (data, filter) = match image.format {
            // JPEG bytes are already DCT-compressed.
            ImageFormat::Jpeg => (image.data, Some(PdfObject::name("DCTDecode"))),
            ImageFormat::Png => self.encode_stream(image.data)?,
        };
        let mut dict = image_dict(image.width, image.height, image.color_space.pdf_name());
        if image.inverted {
            let decode = [1, 0, 1, 0, 1, 0, 1, 0].map(PdfObject::Integer);
            dict.push(("Decode", PdfObject::array(decode.to_vec())));
        }
        dict.extend(filter.map(|f| ("Filter", f)));
        dict.extend(smask_id.map(|id| ("SMask", id.into())));
        self.writer.write_object(obj_id, &PdfObject::stream(dict, data))?;

        let id = ImageId(self.images.len());
        self.images.push(obj_id);
        debug!(
            "embedded {:?} image {}x{} as {}",
            image.format,
            image.width,
            image.height,
            id.pdf_name()
        );
        Ok(ImageHandle {
            id,
            width: image.width,
            height: image.height,
        })
    }

    // -------------------------------------------------------
    // Pages and drawing
    // -------------------------------------------------------

    /// Begin a new page with the given dimensions in points.
    /// An open page is ended first.
    pub fn begin_page(&mut self, width: f64, height: f64) -> Result<&mut Self> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        });
        Ok(self)
    }

    /// Place text with its baseline origin at (x, y), bottom-left
    /// page coordinates, using 12pt black Helvetica.
    pub fn place_text(&mut self, text: &str, x: f64, y: f64) -> Result<&mut Self> {
        self.place_text_styled(text, x, y, &TextStyle::default())
    }

    /// Place text at (x, y) with an explicit font, size, and color.
    pub fn place_text_styled(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> Result<&mut Self> {
        let (name, encoded) = match style.font {
            FontRef::Builtin(b) => {
                b.check_encodable(text)?;
                (b.pdf_name().to_string(), format!("({})", escape_pdf_string(text)))
            }
            FontRef::TrueType(id) => {
                let embedded = self
                    .fonts
                    .get_mut(id.0)
                    .ok_or_else(|| PdfError::Font(format!("unknown font id {}", id.0)))?;
                (embedded.font.pdf_name.clone(), embedded.font.encode_text_hex(text))
            }
        };
        let ops = format!(
            "BT\n/{} {} Tf\n{}{} {} Td\n{} Tj\nET\n",
            name,
            format_coord(style.font_size),
            style.color.fill_op(),
            format_coord(x),
            format_coord(y),
            encoded,
        );
        let page = self.page_mut()?;
        page.fonts.insert(style.font);
        page.content_ops.extend_from_slice(ops.as_bytes());
        Ok(self)
    }

    /// Draw a loaded image with its bottom-left corner at (x, y),
    /// stretched to `width` × `height` points.
    pub fn place_image(
        &mut self,
        image: &ImageHandle,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<&mut Self> {
        if image.id.0 >= self.images.len() {
            return Err(PdfError::Image(format!("unknown image id {}", image.id.0)));
        }
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            format_coord(width),
            format_coord(height),
            format_coord(x),
            format_coord(y),
            image.id.pdf_name(),
        );
        let page = self.page_mut()?;
        page.images.insert(image.id);
        page.content_ops.extend_from_slice(ops.as_bytes());
        Ok(self)
    }

    /// Fill a rectangle whose bottom-left corner is (x, y).
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<&mut Self> {
        let ops = graphics::fill_rect_ops(x, y, width, height, color);
        self.page_mut()?.content_ops.extend_from_slice(ops.as_bytes());
        Ok(self)
    }

    /// Outline a rectangle whose bottom-left corner is (x, y).
    pub fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        line_width: f64,
    ) -> Result<&mut Self> {
        let ops = graphics::stroke_rect_ops(x, y, width, height, color, line_width);
        self.page_mut()?.content_ops.extend_from_slice(ops.as_bytes());
        Ok(self)
    }

    /// End the current page and write its content stream and
    /// page dictionary.
    pub fn end_page(&mut self) -> Result<()> {
        let page = self.current_page.take().ok_or(PdfError::NoOpenPage)?;

        let content_id = self.alloc_id();
        let page_id = self.alloc_id();

        let (data, filter) = self.encode_stream(page.content_ops)?;
        let content_dict = filter.map(|f| ("Filter", f)).into_iter().collect();
        self.writer
            .write_object(content_id, &PdfObject::stream(content_dict, data))?;

        let mut font_entries = vec![(BuiltinFont::Helvetica.pdf_name(), FONT_HELV_OBJ.into())];
        for font in &page.fonts {
            if let FontRef::TrueType(id) = font {
                let embedded = &self.fonts[id.0];
                font_entries.push((embedded.font.pdf_name.as_str(), embedded.type0_id.into()));
            }
        }
        let image_names: Vec<(String, ObjId)> = page
            .images
            .iter()
            .map(|id| (id.pdf_name(), self.images[id.0]))
            .collect();

        let mut resources = vec![("Font", PdfObject::dict(font_entries))];
        if !image_names.is_empty() {
            let entries = image_names
                .iter()
                .map(|(name, id)| (name.as_str(), PdfObject::from(*id)))
                .collect();
            resources.push(("XObject", PdfObject::dict(entries)));
        }

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PAGES_OBJ.into()),
            ("MediaBox", PdfObject::rect(0.0, 0.0, page.width, page.height)),
            ("Contents", content_id.into()),
            ("Resources", PdfObject::dict(resources)),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        debug!(
            "wrote page {} ({} x {} pt)",
            self.page_obj_ids.len(),
            page.width,
            page.height
        );
        Ok(())
    }

    fn write_fonts(&mut self) -> Result<()> {
        for embedded in mem::take(&mut self.fonts) {
            let font = &embedded.font;
            let ids = FontObjectIds {
                type0: embedded.type0_id,
                cid_font: self.alloc_id(),
                descriptor: self.alloc_id(),
                font_file: self.alloc_id(),
                to_unicode: self.alloc_id(),
            };

            let original_len = font.font_data.len() as i64;
            let (data, filter) = self.encode_stream(font.font_data.clone())?;
            let mut dict = vec![("Length1", PdfObject::Integer(original_len))];
            dict.extend(filter.map(|f| ("Filter", f)));
            self.writer
                .write_object(ids.font_file, &PdfObject::stream(dict, data))?;

            self.writer
                .write_object(ids.descriptor, &font.descriptor_object(ids.font_file))?;
            self.writer
                .write_object(ids.cid_font, &font.cid_font_object(ids.descriptor))?;

            let (cmap, filter) = self.encode_stream(font.build_tounicode_cmap())?;
            let cmap_dict = filter.map(|f| ("Filter", f)).into_iter().collect();
            self.writer
                .write_object(ids.to_unicode, &PdfObject::stream(cmap_dict, cmap))?;

            self.writer.write_object(ids.type0, &font.type0_object(&ids))?;
        }
        Ok(())
    }

    /// Finish the document: embedded fonts, info dictionary, page
    /// tree, catalog, xref, and trailer. Returns the inner writer.
    pub fn end_document(mut self) -> Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.write_fonts()?;

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.alloc_id();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self.page_obj_ids.iter().map(|&id| id.into()).collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PAGES_OBJ.into()),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        let mut inner = self.writer.into_inner();
        inner.flush()?;
        Ok(inner)
    }
}

fn image_dict(width: u32, height: u32, color_space: &str) -> Vec<(&'static str, PdfObject)> {
    vec![
        ("Type", PdfObject::name("XObject")),
        ("Subtype", PdfObject::name("Image")),
        ("Width", PdfObject::Integer(width as i64)),
        ("Height", PdfObject::Integer(height as i64)),
        ("ColorSpace", PdfObject::name(color_space)),
        ("BitsPerComponent", PdfObject::Integer(8)),
    ]
}
