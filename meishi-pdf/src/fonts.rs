use crate::error::{PdfError, Result};

/// Index into the document's TrueType font list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrueTypeFontId(pub usize);

/// Unified font reference: either a builtin PDF font or a loaded
/// TrueType font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontRef {
    Builtin(BuiltinFont),
    TrueType(TrueTypeFontId),
}

impl From<BuiltinFont> for FontRef {
    fn from(font: BuiltinFont) -> Self {
        FontRef::Builtin(font)
    }
}

/// Standard PDF fonts that viewers provide without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
}

impl BuiltinFont {
    /// Resource name used in content streams.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
        }
    }

    /// PDF BaseFont name.
    pub fn pdf_base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
        }
    }

    /// Fails on characters outside printable ASCII, which the width
    /// table and the literal-string encoding cover.
    pub(crate) fn check_encodable(&self, text: &str) -> Result<()> {
        match text.chars().find(|ch| !(' '..='~').contains(ch)) {
            Some(ch) => Err(PdfError::Font(format!(
                "{} cannot encode {:?}",
                self.pdf_base_name(),
                ch
            ))),
            None => Ok(()),
        }
    }

    /// AFM (ascender, descender) in 1/1000 em.
    fn vertical_metrics(&self) -> (i16, i16) {
        match self {
            BuiltinFont::Helvetica => (718, -207),
        }
    }
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
/// Source: Adobe Helvetica AFM.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Width for characters outside the mapped range (1/1000 em).
const DEFAULT_WIDTH: u16 = 278;

/// Font metrics for built-in PDF fonts.
pub struct FontMetrics;

impl FontMetrics {
    /// Width of a character in 1/1000 em units.
    pub fn char_width(font: BuiltinFont, ch: char) -> u16 {
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return DEFAULT_WIDTH;
        }
        let index = (code - 32) as usize;
        match font {
            BuiltinFont::Helvetica => HELVETICA_WIDTHS[index],
        }
    }

    /// Width of a text string in points.
    pub fn measure_text(text: &str, font: BuiltinFont, font_size: f64) -> f64 {
        let total: u32 = text
            .chars()
            .map(|ch| Self::char_width(font, ch) as u32)
            .sum();
        total as f64 * font_size / 1000.0
    }

    /// Ascender-to-descender height in points.
    pub fn height_at_size(font: BuiltinFont, font_size: f64) -> f64 {
        let (ascender, descender) = font.vertical_metrics();
        (ascender as f64 - descender as f64) * font_size / 1000.0
    }
}
