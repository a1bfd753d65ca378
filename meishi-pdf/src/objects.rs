/// Object identifier: (object_number, generation_number).
/// Generation is always 0 for new documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub u32, pub u16);

/// The subset of PDF object types (PDF 32000-1:2008 Section 7.3)
/// needed to describe pages, fonts, and images.
#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// PDF name object (stored without the leading `/`).
    Name(String),
    /// PDF literal string (stored without the enclosing parens).
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Key-value pairs. Uses Vec for deterministic output order.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn literal_string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn array(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(owned_entries(entries))
    }

    pub fn stream(
        dict_entries: Vec<(&str, PdfObject)>,
        data: Vec<u8>,
    ) -> Self {
        PdfObject::Stream {
            dict: owned_entries(dict_entries),
            data,
        }
    }

    /// A `[x0 y0 x1 y1]` rectangle array, as used by MediaBox
    /// and FontBBox.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Real(x0),
            PdfObject::Real(y0),
            PdfObject::Real(x1),
            PdfObject::Real(y1),
        ])
    }
}

impl From<ObjId> for PdfObject {
    fn from(id: ObjId) -> Self {
        PdfObject::Reference(id)
    }
}

fn owned_entries(
    entries: Vec<(&str, PdfObject)>,
) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
