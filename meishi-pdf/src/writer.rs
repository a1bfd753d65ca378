use std::collections::BTreeMap;
use std::io::{self, Write};

use log::trace;

use crate::objects::{ObjId, PdfObject};

/// Low-level PDF serializer. Writes objects to any `Write` target
/// while recording byte offsets for the xref table.
pub struct PdfWriter<W: Write> {
    writer: W,
    offset: usize,
    xref: BTreeMap<u32, usize>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        PdfWriter {
            writer,
            offset: 0,
            xref: BTreeMap::new(),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Write the PDF 1.7 header followed by the binary marker comment.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_str("%PDF-1.7\n")?;
        self.write_bytes(b"%\xe2\xe3\xcf\xd3\n")
    }

    /// Write an indirect object and record its offset.
    pub fn write_object(
        &mut self,
        id: ObjId,
        obj: &PdfObject,
    ) -> io::Result<()> {
        trace!("writing object {} at offset {}", id.0, self.offset);
        self.xref.insert(id.0, self.offset);
        self.write_str(&format!("{} {} obj\n", id.0, id.1))?;
        self.write_value(obj)?;
        self.write_str("\nendobj\n")
    }

    fn write_value(&mut self, obj: &PdfObject) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => self.write_str(&n.to_string()),
            PdfObject::Real(f) => self.write_str(&format_real(*f)),
            PdfObject::Name(name) => {
                self.write_str("/")?;
                self.write_str(name)
            }
            PdfObject::LiteralString(s) => {
                self.write_str("(")?;
                self.write_str(&escape_pdf_string(s))?;
                self.write_str(")")
            }
            PdfObject::Array(items) => {
                self.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write_str(" ")?;
                    }
                    self.write_value(item)?;
                }
                self.write_str("]")
            }
            PdfObject::Dictionary(entries) => {
                self.write_str("<<")?;
                self.write_entries(entries)?;
                self.write_str(" >>")
            }
            PdfObject::Stream { dict, data } => {
                self.write_str("<<")?;
                self.write_entries(dict)?;
                self.write_str(&format!(" /Length {} >>\nstream\n", data.len()))?;
                self.write_bytes(data)?;
                self.write_str("\nendstream")
            }
            PdfObject::Reference(id) => {
                self.write_str(&format!("{} {} R", id.0, id.1))
            }
        }
    }

    fn write_entries(
        &mut self,
        entries: &[(String, PdfObject)],
    ) -> io::Result<()> {
        for (key, val) in entries {
            self.write_str(" /")?;
            self.write_str(key)?;
            self.write_str(" ")?;
            self.write_value(val)?;
        }
        Ok(())
    }

    /// Write the xref table, trailer, startxref, and %%EOF.
    ///
    /// Object numbers that were never written become free entries,
    /// so reserved-but-unused ids still yield a valid table.
    pub fn write_xref_and_trailer(
        &mut self,
        root_id: ObjId,
        info_id: Option<ObjId>,
    ) -> io::Result<()> {
        let xref_offset = self.offset;
        let size = self.xref.keys().next_back().map_or(1, |&n| n + 1);

        let mut table = format!("xref\n0 {}\n", size);
        // Each entry is exactly 20 bytes including the CRLF.
        table.push_str("0000000000 65535 f\r\n");
        for obj_num in 1..size {
            match self.xref.get(&obj_num) {
                Some(off) => table.push_str(&format!("{:010} 00000 n\r\n", off)),
                None => table.push_str("0000000000 00000 f\r\n"),
            }
        }
        self.write_str(&table)?;

        let mut trailer = format!(
            "trailer\n<< /Size {} /Root {} {} R",
            size, root_id.0, root_id.1
        );
        if let Some(info) = info_id {
            trailer.push_str(&format!(" /Info {} {} R", info.0, info.1));
        }
        trailer.push_str(&format!(
            " >>\nstartxref\n{}\n%%EOF\n",
            xref_offset
        ));
        self.write_str(&trailer)
    }

    /// Return the inner writer, consuming this PdfWriter.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Escape special characters in a PDF literal string.
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            _ => result.push(c),
        }
    }
    result
}

/// Format a float for object syntax: no trailing zeros, no
/// scientific notation, always a decimal point.
fn format_real(f: f64) -> String {
    if f == f.floor() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        let s = format!("{:.6}", f);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_one(obj: &PdfObject) -> String {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_object(ObjId(1, 0), obj).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn header_has_binary_marker() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        assert!(buf.starts_with(b"%PDF-1.7\n%"));
        assert!(buf[10..14].iter().all(|&b| b >= 128));
    }

    #[test]
    fn dictionary_with_reference() {
        let out = write_one(&PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", ObjId(2, 0).into()),
        ]));
        assert!(out.starts_with("1 0 obj\n"));
        assert!(out.contains("<< /Type /Catalog /Pages 2 0 R >>"));
        assert!(out.ends_with("\nendobj\n"));
    }

    #[test]
    fn stream_reports_length() {
        let out = write_one(&PdfObject::stream(vec![], b"0 0 10 10 re f".to_vec()));
        assert!(out.contains("<< /Length 14 >>\nstream\n0 0 10 10 re f\nendstream"));
    }

    #[test]
    fn media_box_array() {
        let out = write_one(&PdfObject::rect(0.0, 0.0, 249.45, 150.75));
        assert!(out.contains("[0.0 0.0 249.45 150.75]"));
    }

    #[test]
    fn literal_string_is_escaped() {
        let out = write_one(&PdfObject::literal_string("a(b)c\\d"));
        assert!(out.contains("(a\\(b\\)c\\\\d)"));
    }

    #[test]
    fn xref_fills_gaps_with_free_entries() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &PdfObject::name("Catalog")).unwrap();
        w.write_object(ObjId(3, 0), &PdfObject::Integer(7)).unwrap();
        w.write_xref_and_trailer(ObjId(1, 0), None).unwrap();

        let out = String::from_utf8_lossy(&buf);
        assert!(out.contains("xref\n0 4\n"));
        assert!(out.contains("0000000000 00000 f\r\n"));
        assert!(out.contains("/Size 4 /Root 1 0 R >>"));
        assert!(out.ends_with("%%EOF\n"));
    }

    #[test]
    fn trailer_includes_info() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_object(ObjId(1, 0), &PdfObject::name("Catalog")).unwrap();
        w.write_object(ObjId(2, 0), &PdfObject::literal_string("meishi")).unwrap();
        w.write_xref_and_trailer(ObjId(1, 0), Some(ObjId(2, 0))).unwrap();
        let out = String::from_utf8_lossy(&buf);
        assert!(out.contains("/Info 2 0 R"));
    }

    #[test]
    fn format_real_values() {
        assert_eq!(format_real(612.0), "612.0");
        assert_eq!(format_real(12.5), "12.5");
        assert_eq!(format_real(2.741208), "2.741208");
    }
}
