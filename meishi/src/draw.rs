//! Text and image drawing with anchored placement.

use std::fs;
use std::path::Path;

use log::debug;
use meishi_pdf::{Color, ImageFormat, TextStyle};

use crate::context::{RenderContext, Surface};
use crate::error::{Error, Result};
use crate::placement::{Extent, Placement};

/// Outline color for debug blocks.
const BLOCK_COLOR: Color = Color::RED;
/// Outline width for debug blocks, in points.
const BLOCK_LINE_WIDTH: f64 = 1.5;

/// Draw `text` at `size` in the context's font, aligned to `at`.
///
/// With `show_blocks` set, the measured box is outlined too.
pub fn draw_text<S: Surface>(
    ctx: &mut RenderContext<S>,
    text: &str,
    size: f64,
    at: Placement,
    color: Color,
) -> Result<()> {
    let extent = ctx.surface.text_extent(ctx.font, text, size)?;
    let origin = at.origin(extent);
    debug!(
        "text {:?} at ({:.2}, {:.2}) size {:.2}x{:.2}",
        text, origin.x, origin.y, extent.width, extent.height
    );

    let style = TextStyle {
        font: ctx.font,
        font_size: size,
        color,
    };
    ctx.surface.draw_text(text, origin, &style)?;
    if ctx.show_blocks {
        ctx.surface
            .stroke_rect(origin, extent, BLOCK_COLOR, BLOCK_LINE_WIDTH)?;
    }
    Ok(())
}

/// Pick the image decoder from the path's extension.
pub fn image_format_for(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => Ok(ImageFormat::Png),
        Some("jpg") => Ok(ImageFormat::Jpeg),
        _ => Err(Error::UnsupportedImageFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load the image at `path`, scale it uniformly, and draw it
/// aligned to `at`. The format is checked before the file is read.
pub fn draw_image<S: Surface>(
    ctx: &mut RenderContext<S>,
    path: &Path,
    scale: f64,
    at: Placement,
) -> Result<()> {
    let format = image_format_for(path)?;
    let full_path = ctx.resolve(path);
    let data = fs::read(&full_path).map_err(|source| Error::Io {
        path: full_path.clone(),
        source,
    })?;

    let image = ctx.surface.embed_image(data, format)?;
    let (width, height) = image.scaled(scale);
    let extent = Extent::new(width, height);
    let origin = at.origin(extent);
    debug!(
        "image {} at ({:.2}, {:.2}) size {:.2}x{:.2}",
        full_path.display(),
        origin.x,
        origin.y,
        width,
        height
    );
    ctx.surface.draw_image(&image, origin, extent)
}
