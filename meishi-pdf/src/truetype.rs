use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::error::{PdfError, Result};
use crate::objects::{ObjId, PdfObject};

/// A parsed TrueType font, ready for metrics queries and embedding
/// as a Type0/CIDFontType2 composite font.
pub struct TrueTypeFont {
    pub(crate) postscript_name: String,
    pub(crate) font_data: Vec<u8>,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    bbox: [i16; 4],
    cap_height: i16,
    italic_angle: f64,
    flags: u32,
    stem_v: i16,
    /// Unicode codepoint -> glyph ID
    cmap: BTreeMap<u32, u16>,
    /// Glyph ID -> advance width in font units
    glyph_widths: Vec<u16>,
    /// Glyph IDs referenced by drawn text (for the W array)
    used_glyphs: BTreeSet<u16>,
    /// Glyph ID -> Unicode codepoint (for ToUnicode CMap)
    glyph_to_unicode: BTreeMap<u16, u32>,
    /// Resource name in content streams (e.g. "F2")
    pub(crate) pdf_name: String,
}

/// Object ids for the pieces of an embedded composite font.
pub(crate) struct FontObjectIds {
    pub type0: ObjId,
    pub cid_font: ObjId,
    pub descriptor: ObjId,
    pub font_file: ObjId,
    pub to_unicode: ObjId,
}

impl TrueTypeFont {
    /// Parse a TrueType font from raw .ttf bytes.
    pub fn from_bytes(data: Vec<u8>, font_num: u32) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| PdfError::Font(format!("failed to parse TrueType data: {}", e)))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(PdfError::Font("font reports zero units per em".to_string()));
        }
        if face.tables().glyf.is_none() {
            return Err(PdfError::Font(
                "font has no glyf outlines (CFF-flavoured OpenType is not supported)".to_string(),
            ));
        }
        let ascent = face.ascender();
        let descent = face.descender();
        let bbox = face.global_bounding_box();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let italic_angle = face.italic_angle() as f64;
        let flags = compute_flags(&face);
        let stem_v = estimate_stem_v(&face);

        let postscript_name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME && n.is_unicode())
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| format!("EmbeddedFont{}", font_num));

        let mut cmap = BTreeMap::new();
        let mut glyph_to_unicode = BTreeMap::new();
        let subtables = face
            .tables()
            .cmap
            .ok_or_else(|| PdfError::Font("font has no cmap table".to_string()))?;
        for subtable in subtables.subtables {
            if !subtable.is_unicode() {
                continue;
            }
            subtable.codepoints(|cp| {
                if let Some(gid) = subtable.glyph_index(cp) {
                    cmap.insert(cp, gid.0);
                    glyph_to_unicode.entry(gid.0).or_insert(cp);
                }
            });
        }

        let glyph_widths = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0))
            .collect();

        debug!(
            "parsed TrueType font {} ({} glyphs mapped)",
            postscript_name,
            cmap.len()
        );

        Ok(TrueTypeFont {
            postscript_name,
            font_data: data,
            units_per_em,
            ascent,
            descent,
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            cap_height,
            italic_angle,
            flags,
            stem_v,
            cmap,
            glyph_widths,
            used_glyphs: BTreeSet::new(),
            glyph_to_unicode,
            pdf_name: format!("F{}", font_num),
        })
    }

    /// Scale a raw font unit value to 1/1000 of text space.
    fn scale_to_pdf(&self, value: i16) -> i64 {
        (value as i64 * 1000) / self.units_per_em as i64
    }

    fn glyph_width_pdf(&self, gid: u16) -> u16 {
        let raw = self
            .glyph_widths
            .get(gid as usize)
            .copied()
            .unwrap_or_else(|| self.glyph_widths.first().copied().unwrap_or(0));
        ((raw as u32 * 1000) / self.units_per_em as u32) as u16
    }

    /// Width of a character in 1/1000 of text space.
    pub fn char_width_pdf(&self, ch: char) -> u16 {
        let gid = self.cmap.get(&(ch as u32)).copied().unwrap_or(0);
        self.glyph_width_pdf(gid)
    }

    /// Width of a text string in points.
    pub fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        let total: u32 = text.chars().map(|ch| self.char_width_pdf(ch) as u32).sum();
        total as f64 * font_size / 1000.0
    }

    /// Ascent-to-descent height in points.
    pub fn height_at_size(&self, font_size: f64) -> f64 {
        let height = (self.ascent as i32 - self.descent as i32) as f64 / self.units_per_em as f64;
        height * font_size
    }

    /// Encode text as hex glyph IDs (`<0048006C>`), recording each
    /// glyph as used.
    pub fn encode_text_hex(&mut self, text: &str) -> String {
        let mut hex = String::with_capacity(text.len() * 4 + 2);
        hex.push('<');
        for ch in text.chars() {
            let gid = match self.cmap.get(&(ch as u32)) {
                Some(&gid) => gid,
                None => {
                    warn!("font {} has no glyph for {:?}", self.postscript_name, ch);
                    0
                }
            };
            self.used_glyphs.insert(gid);
            hex.push_str(&format!("{:04X}", gid));
        }
        hex.push('>');
        hex
    }

    /// The /W array for used glyphs: runs of consecutive glyph IDs
    /// as `start [w1 w2 ...]`.
    pub fn build_w_array(&self) -> Vec<PdfObject> {
        let mut result = Vec::new();
        let mut run: Option<(u16, Vec<PdfObject>)> = None;
        let mut prev: Option<u16> = None;

        for &gid in &self.used_glyphs {
            let width = PdfObject::Integer(self.glyph_width_pdf(gid) as i64);
            let consecutive = prev.and_then(|p| p.checked_add(1)) == Some(gid);
            match run.as_mut() {
                Some((_, widths)) if consecutive => widths.push(width),
                _ => {
                    if let Some((start, widths)) = run.take() {
                        result.push(PdfObject::Integer(start as i64));
                        result.push(PdfObject::Array(widths));
                    }
                    run = Some((gid, vec![width]));
                }
            }
            prev = Some(gid);
        }
        if let Some((start, widths)) = run {
            result.push(PdfObject::Integer(start as i64));
            result.push(PdfObject::Array(widths));
        }
        result
    }

    /// ToUnicode CMap stream bytes for the used glyphs.
    pub fn build_tounicode_cmap(&self) -> Vec<u8> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let mappings: Vec<(u16, u32)> = self
            .used_glyphs
            .iter()
            .filter_map(|&gid| self.glyph_to_unicode.get(&gid).map(|&cp| (gid, cp)))
            .collect();

        // At most 100 entries per beginbfchar block.
        for chunk in mappings.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for &(gid, cp) in chunk {
                cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16_hex(cp)));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap.into_bytes()
    }

    pub(crate) fn descriptor_object(&self, font_file: ObjId) -> PdfObject {
        let [x_min, y_min, x_max, y_max] = self.bbox;
        PdfObject::dict(vec![
            ("Type", PdfObject::name("FontDescriptor")),
            ("FontName", PdfObject::name(&self.postscript_name)),
            ("Flags", PdfObject::Integer(self.flags as i64)),
            (
                "FontBBox",
                PdfObject::array(vec![
                    PdfObject::Integer(self.scale_to_pdf(x_min)),
                    PdfObject::Integer(self.scale_to_pdf(y_min)),
                    PdfObject::Integer(self.scale_to_pdf(x_max)),
                    PdfObject::Integer(self.scale_to_pdf(y_max)),
                ]),
            ),
            ("ItalicAngle", PdfObject::Real(self.italic_angle)),
            ("Ascent", PdfObject::Integer(self.scale_to_pdf(self.ascent))),
            ("Descent", PdfObject::Integer(self.scale_to_pdf(self.descent))),
            ("CapHeight", PdfObject::Integer(self.scale_to_pdf(self.cap_height))),
            ("StemV", PdfObject::Integer(self.stem_v as i64)),
            ("FontFile2", font_file.into()),
        ])
    }

    pub(crate) fn cid_font_object(&self, descriptor: ObjId) -> PdfObject {
        PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("CIDFontType2")),
            ("BaseFont", PdfObject::name(&self.postscript_name)),
            (
                "CIDSystemInfo",
                PdfObject::dict(vec![
                    ("Registry", PdfObject::literal_string("Adobe")),
                    ("Ordering", PdfObject::literal_string("Identity")),
                    ("Supplement", PdfObject::Integer(0)),
                ]),
            ),
            ("FontDescriptor", descriptor.into()),
            ("DW", PdfObject::Integer(self.glyph_width_pdf(0) as i64)),
            ("W", PdfObject::Array(self.build_w_array())),
            ("CIDToGIDMap", PdfObject::name("Identity")),
        ])
    }

    pub(crate) fn type0_object(&self, ids: &FontObjectIds) -> PdfObject {
        PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type0")),
            ("BaseFont", PdfObject::name(&self.postscript_name)),
            ("Encoding", PdfObject::name("Identity-H")),
            ("DescendantFonts", PdfObject::array(vec![ids.cid_font.into()])),
            ("ToUnicode", ids.to_unicode.into()),
        ])
    }
}

/// Hex UTF-16BE code units for a codepoint (surrogate pair above the BMP).
fn utf16_hex(cp: u32) -> String {
    match char::from_u32(cp) {
        Some(ch) => {
            let mut units = [0u16; 2];
            ch.encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect()
        }
        None => format!("{:04X}", cp),
    }
}

/// PDF font descriptor flags.
fn compute_flags(face: &ttf_parser::Face) -> u32 {
    let mut flags = 0u32;
    // FixedPitch
    if face.is_monospaced() {
        flags |= 1;
    }
    // Nonsymbolic
    flags |= 32;
    // Italic
    if face.is_italic() {
        flags |= 64;
    }
    flags
}

/// Rough StemV from the weight class: 10 + 220 * (weight/1000)^2.
fn estimate_stem_v(face: &ttf_parser::Face) -> i16 {
    let w = face.weight().to_number() as f64 / 1000.0;
    (10.0 + 220.0 * w * w) as i16
}
