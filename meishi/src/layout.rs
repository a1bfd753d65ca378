//! The card itself: page size and the elements on each side.
//!
//! Elements are painted in list order, so anything that must sit
//! behind other content comes first.

use std::path::PathBuf;

use meishi_pdf::Color;

use crate::placement::{Extent, HorizontalAlign, Placement, Point, VerticalAlign};

/// Width of a B5 page in points.
const B5_WIDTH_PT: f64 = 498.9;

/// One millimetre in points (B5 is 182 mm wide).
pub const MM: f64 = B5_WIDTH_PT / 182.0;

/// Japanese business card size, 91 mm × 55 mm.
pub const CARD_SIZE: Extent = Extent::new(91.0 * MM, 55.0 * MM);

const INK: Color = Color::rgb(0.1, 0.1, 0.1);
const MUTED: Color = Color::gray(0.4);
const NIGHT: Color = Color::rgb(0.11, 0.15, 0.23);

/// One thing to draw on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        text: String,
        size: f64,
        color: Color,
        at: Placement,
    },
    /// A png or jpg file, scaled uniformly (one pixel per point at 1.0).
    Image {
        path: PathBuf,
        scale: f64,
        at: Placement,
    },
    /// A filled rectangle, used for background panels.
    Rect {
        origin: Point,
        extent: Extent,
        fill: Color,
    },
}

impl Element {
    pub fn text(text: &str, size: f64, color: Color, at: Placement) -> Self {
        Element::Text {
            text: text.to_string(),
            size,
            color,
            at,
        }
    }

    pub fn image(path: &str, scale: f64, at: Placement) -> Self {
        Element::Image {
            path: PathBuf::from(path),
            scale,
            at,
        }
    }
}

/// A single side of the card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardPage {
    pub name: &'static str,
    pub size: Extent,
    pub elements: Vec<Element>,
}

/// Both sides of the card, front first.
pub fn card() -> Vec<CardPage> {
    vec![omote(CARD_SIZE), ura(CARD_SIZE)]
}

/// Front: icon on the left, name and handle centred.
pub fn omote(size: Extent) -> CardPage {
    let (w, h) = (size.width, size.height);
    CardPage {
        name: "omote",
        size,
        elements: vec![
            Element::text(
                "Haruyuki",
                24.0,
                INK,
                Placement::at(w / 2.0, h / 2.0 + 10.0).centered(),
            ),
            Element::image(
                "icon.jpg",
                0.1,
                Placement::at(w * 0.1, h / 2.0).vertical(VerticalAlign::Center),
            ),
            Element::text(
                "@haruyuki",
                10.0,
                MUTED,
                Placement::at(w / 2.0, h / 2.0 - 8.0)
                    .horizontal(HorizontalAlign::Center)
                    .vertical(VerticalAlign::Top),
            ),
        ],
    }
}

/// Back: dark panel with two QR codes and their labels.
pub fn ura(size: Extent) -> CardPage {
    let (w, h) = (size.width, size.height);
    let qr_y = h / 2.0 - 2.0 * MM;
    let label_y = 6.0 * MM;
    CardPage {
        name: "ura",
        size,
        elements: vec![
            Element::Rect {
                origin: Point::new(0.0, 0.0),
                extent: size,
                fill: NIGHT,
            },
            Element::text(
                "Find me online",
                11.0,
                Color::WHITE,
                Placement::at(w / 2.0, h - 5.0 * MM)
                    .horizontal(HorizontalAlign::Center)
                    .vertical(VerticalAlign::Top),
            ),
            Element::image("qr_twitter.png", 0.25, Placement::at(w * 0.3, qr_y).centered()),
            Element::image("qr_github.png", 0.25, Placement::at(w * 0.7, qr_y).centered()),
            Element::text(
                "Twitter @haruyuki",
                7.0,
                Color::WHITE,
                Placement::at(w * 0.3, label_y).horizontal(HorizontalAlign::Center),
            ),
            Element::text(
                "GitHub haruyuki",
                7.0,
                Color::WHITE,
                Placement::at(w * 0.7, label_y).horizontal(HorizontalAlign::Center),
            ),
        ],
    }
}
