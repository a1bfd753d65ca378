//! A small streaming PDF writer: pages with text, images, and
//! rectangles in bottom-left, Y-up page space.

pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod truetype;
pub mod writer;

pub use document::{PdfDocument, TextStyle};
pub use error::{PdfError, Result};
pub use fonts::{BuiltinFont, FontMetrics, FontRef, TrueTypeFontId};
pub use graphics::Color;
pub use images::{ImageFormat, ImageHandle, ImageId};
