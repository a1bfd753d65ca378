use std::io::Write;
use std::path::{Path, PathBuf};

use meishi_pdf::{Color, FontRef, ImageFormat, ImageHandle, PdfDocument, TextStyle};

use crate::error::Result;
use crate::placement::{Extent, Point};

/// Drawing operations the card renderer needs from a document.
///
/// Coordinates are bottom-left origins in Y-up page space; alignment
/// has already been resolved by the caller.
pub trait Surface {
    fn begin_page(&mut self, size: Extent) -> Result<()>;

    /// Width of `text` and the font's ascent-to-descent height at `size`.
    fn text_extent(&self, font: FontRef, text: &str, size: f64) -> Result<Extent>;

    /// Decode and register an image so it can be drawn.
    fn embed_image(&mut self, data: Vec<u8>, format: ImageFormat) -> Result<ImageHandle>;

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> Result<()>;

    fn draw_image(&mut self, image: &ImageHandle, origin: Point, extent: Extent) -> Result<()>;

    fn fill_rect(&mut self, origin: Point, extent: Extent, color: Color) -> Result<()>;

    fn stroke_rect(&mut self, origin: Point, extent: Extent, color: Color, line_width: f64) -> Result<()>;
}

impl<W: Write> Surface for PdfDocument<W> {
    fn begin_page(&mut self, size: Extent) -> Result<()> {
        PdfDocument::begin_page(self, size.width, size.height)?;
        Ok(())
    }

    fn text_extent(&self, font: FontRef, text: &str, size: f64) -> Result<Extent> {
        Ok(Extent::new(
            self.measure_text(font, text, size)?,
            self.font_height(font, size)?,
        ))
    }

    fn embed_image(&mut self, data: Vec<u8>, format: ImageFormat) -> Result<ImageHandle> {
        Ok(self.load_image_bytes_as(data, format)?)
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: &TextStyle) -> Result<()> {
        self.place_text_styled(text, origin.x, origin.y, style)?;
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageHandle, origin: Point, extent: Extent) -> Result<()> {
        self.place_image(image, origin.x, origin.y, extent.width, extent.height)?;
        Ok(())
    }

    fn fill_rect(&mut self, origin: Point, extent: Extent, color: Color) -> Result<()> {
        PdfDocument::fill_rect(self, origin.x, origin.y, extent.width, extent.height, color)?;
        Ok(())
    }

    fn stroke_rect(&mut self, origin: Point, extent: Extent, color: Color, line_width: f64) -> Result<()> {
        PdfDocument::stroke_rect(
            self,
            origin.x,
            origin.y,
            extent.width,
            extent.height,
            color,
            line_width,
        )?;
        Ok(())
    }
}

/// State shared by every draw call of a render: the surface being
/// drawn into, the active font, and the debug-block switch.
pub struct RenderContext<S> {
    pub surface: S,
    pub font: FontRef,
    /// Outline every text run with its measured box.
    pub show_blocks: bool,
    /// Directory that relative image paths are resolved against.
    pub asset_root: PathBuf,
}

impl<S: Surface> RenderContext<S> {
    pub fn new(surface: S, font: FontRef) -> Self {
        RenderContext {
            surface,
            font,
            show_blocks: false,
            asset_root: PathBuf::from("."),
        }
    }

    pub fn with_blocks(mut self, show_blocks: bool) -> Self {
        self.show_blocks = show_blocks;
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    /// Resolve an asset path against the asset root.
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.asset_root.join(path)
    }

    /// Give back the surface once rendering is done.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
