//! Business card ("meishi") PDF generator.
//!
//! [`layout`] describes what goes on each side of the card,
//! [`placement`] resolves anchored positions, and [`render`] draws
//! the layout through a [`context::Surface`], normally a
//! [`meishi_pdf::PdfDocument`].

pub mod context;
pub mod draw;
pub mod error;
pub mod layout;
pub mod placement;
pub mod render;

use std::fs;
use std::path::Path;

use log::info;
use meishi_pdf::{BuiltinFont, FontRef, PdfDocument};

pub use context::{RenderContext, Surface};
pub use error::{Error, Result};
pub use placement::{Extent, HorizontalAlign, Placement, Point, VerticalAlign};

/// File written to the working directory by the command-line tool.
pub const OUTPUT_FILE: &str = "meishi.pdf";

/// What a card build may vary.
#[derive(Debug, Clone, Default)]
pub struct CardOptions<'a> {
    /// TrueType font to embed instead of Helvetica.
    pub font_path: Option<&'a Path>,
    /// Outline every text run with its measured box.
    pub show_blocks: bool,
    /// Directory that image paths in the layout are relative to.
    pub asset_root: Option<&'a Path>,
}

/// Build the complete two-sided card and return the PDF bytes.
///
/// Nothing is written to disk; a failure at any step returns the
/// error and discards the partial document.
pub fn build_card(options: &CardOptions<'_>) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(Vec::new())?;
    doc.set_info("Creator", "meishi")
        .set_info("Title", "Business card");

    let font: FontRef = match options.font_path {
        Some(path) => {
            info!("embedding font {}", path.display());
            let data = fs::read(path).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            doc.load_font_bytes(data)?
        }
        None => BuiltinFont::Helvetica.into(),
    };

    let mut ctx = RenderContext::new(doc, font).with_blocks(options.show_blocks);
    if let Some(root) = options.asset_root {
        ctx = ctx.with_asset_root(root);
    }
    render::render_card(&mut ctx, &layout::card())?;

    let bytes = ctx.into_surface().end_document()?;
    info!("serialized card, {} bytes", bytes.len());
    Ok(bytes)
}
