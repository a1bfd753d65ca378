use log::{debug, info};

use crate::context::{RenderContext, Surface};
use crate::draw::{draw_image, draw_text};
use crate::error::Result;
use crate::layout::{CardPage, Element};

/// Render every page in order. Elements are painted in list order;
/// the first failure stops the render.
pub fn render_card<S: Surface>(ctx: &mut RenderContext<S>, pages: &[CardPage]) -> Result<()> {
    for page in pages {
        info!(
            "rendering {} ({:.2} x {:.2} pt, {} elements)",
            page.name,
            page.size.width,
            page.size.height,
            page.elements.len()
        );
        ctx.surface.begin_page(page.size)?;
        for element in &page.elements {
            render_element(ctx, element)?;
        }
    }
    Ok(())
}

fn render_element<S: Surface>(ctx: &mut RenderContext<S>, element: &Element) -> Result<()> {
    match element {
        Element::Text {
            text,
            size,
            color,
            at,
        } => draw_text(ctx, text, *size, *at, *color),
        Element::Image { path, scale, at } => draw_image(ctx, path, *scale, *at),
        Element::Rect {
            origin,
            extent,
            fill,
        } => {
            debug!(
                "rect at ({:.2}, {:.2}) size {:.2}x{:.2}",
                origin.x, origin.y, extent.width, extent.height
            );
            ctx.surface.fill_rect(*origin, *extent, *fill)
        }
    }
}
