//! Anchored placement: turn an anchor point plus alignment into the
//! bottom-left origin that the PDF draw operations expect.

/// A point in page space (points, bottom-left origin, Y up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Measured width and height of an item to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Extent { width, height }
    }
}

/// Which part of the item's box sits on the anchor horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Which part of the item's box sits on the anchor vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    Center,
    #[default]
    Bottom,
}

/// An anchor point with alignment. Defaults to left/bottom, where the
/// anchor is the origin itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub anchor: Point,
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Placement {
    /// Anchor at (x, y) with the default left/bottom alignment.
    pub const fn at(x: f64, y: f64) -> Self {
        Placement {
            anchor: Point::new(x, y),
            horizontal: HorizontalAlign::Left,
            vertical: VerticalAlign::Bottom,
        }
    }

    pub fn horizontal(mut self, align: HorizontalAlign) -> Self {
        self.horizontal = align;
        self
    }

    pub fn vertical(mut self, align: VerticalAlign) -> Self {
        self.vertical = align;
        self
    }

    /// Shorthand for center/center.
    pub fn centered(self) -> Self {
        self.horizontal(HorizontalAlign::Center)
            .vertical(VerticalAlign::Center)
    }

    /// Bottom-left origin for an item of `extent` placed by this request.
    ///
    /// Results are not rounded or clamped; an item anchored near an
    /// edge may land partly off the page.
    pub fn origin(&self, extent: Extent) -> Point {
        let x = match self.horizontal {
            HorizontalAlign::Left => self.anchor.x,
            HorizontalAlign::Center => self.anchor.x - extent.width / 2.0,
            HorizontalAlign::Right => self.anchor.x - extent.width,
        };
        let y = match self.vertical {
            VerticalAlign::Bottom => self.anchor.y,
            VerticalAlign::Center => self.anchor.y - extent.height / 2.0,
            VerticalAlign::Top => self.anchor.y - extent.height,
        };
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORIZONTAL: [HorizontalAlign; 3] = [
        HorizontalAlign::Left,
        HorizontalAlign::Center,
        HorizontalAlign::Right,
    ];
    const VERTICAL: [VerticalAlign; 3] = [
        VerticalAlign::Top,
        VerticalAlign::Center,
        VerticalAlign::Bottom,
    ];

    #[test]
    fn center_center_example() {
        let p = Placement::at(100.0, 50.0).centered();
        assert_eq!(p.origin(Extent::new(40.0, 20.0)), Point::new(80.0, 40.0));
    }

    #[test]
    fn right_top_example() {
        let p = Placement::at(100.0, 50.0)
            .horizontal(HorizontalAlign::Right)
            .vertical(VerticalAlign::Top);
        assert_eq!(p.origin(Extent::new(40.0, 20.0)), Point::new(60.0, 30.0));
    }

    #[test]
    fn default_alignment_is_left_bottom() {
        let explicit = Placement::at(12.0, 34.0)
            .horizontal(HorizontalAlign::Left)
            .vertical(VerticalAlign::Bottom);
        assert_eq!(Placement::at(12.0, 34.0), explicit);
        assert_eq!(Placement::default().horizontal, HorizontalAlign::Left);
        assert_eq!(Placement::default().vertical, VerticalAlign::Bottom);

        let extent = Extent::new(7.0, 9.0);
        assert_eq!(Placement::at(12.0, 34.0).origin(extent), Point::new(12.0, 34.0));
    }

    #[test]
    fn anchor_lands_on_matching_edge_or_midpoint() {
        let anchor = Point::new(123.25, 47.5);
        let extents = [
            Extent::new(0.0, 0.0),
            Extent::new(40.0, 20.0),
            Extent::new(249.45, 0.5),
            Extent::new(3.0, 150.77),
        ];

        for h in HORIZONTAL {
            for v in VERTICAL {
                for extent in extents {
                    let p = Placement { anchor, horizontal: h, vertical: v };
                    let o = p.origin(extent);
                    let ref_x = match h {
                        HorizontalAlign::Left => o.x,
                        HorizontalAlign::Center => o.x + extent.width / 2.0,
                        HorizontalAlign::Right => o.x + extent.width,
                    };
                    let ref_y = match v {
                        VerticalAlign::Bottom => o.y,
                        VerticalAlign::Center => o.y + extent.height / 2.0,
                        VerticalAlign::Top => o.y + extent.height,
                    };
                    assert!((ref_x - anchor.x).abs() < 1e-9, "{:?}/{:?} {:?}", h, v, extent);
                    assert!((ref_y - anchor.y).abs() < 1e-9, "{:?}/{:?} {:?}", h, v, extent);
                }
            }
        }
    }

    #[test]
    fn same_inputs_same_origin() {
        let p = Placement::at(10.0, 10.0).centered();
        let extent = Extent::new(33.3, 11.1);
        assert_eq!(p.origin(extent), p.origin(extent));
    }

    #[test]
    fn results_are_not_clamped() {
        let p = Placement::at(5.0, 5.0)
            .horizontal(HorizontalAlign::Right)
            .vertical(VerticalAlign::Top);
        assert_eq!(p.origin(Extent::new(20.0, 30.0)), Point::new(-15.0, -25.0));
    }
}
