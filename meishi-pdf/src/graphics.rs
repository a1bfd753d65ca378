/// RGB color for PDF graphics operations.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    /// Create a color from RGB components (each 0.0–1.0).
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a grayscale color (r = g = b = level).
    pub const fn gray(level: f64) -> Self {
        Color::rgb(level, level, level)
    }

    /// `r g b rg`: set the non-stroking (fill) color.
    pub(crate) fn fill_op(&self) -> String {
        format!(
            "{} {} {} rg\n",
            format_coord(self.r),
            format_coord(self.g),
            format_coord(self.b)
        )
    }

    /// `r g b RG`: set the stroking color.
    pub(crate) fn stroke_op(&self) -> String {
        format!(
            "{} {} {} RG\n",
            format_coord(self.r),
            format_coord(self.g),
            format_coord(self.b)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Format a number for content streams: integers without a
/// decimal point, otherwise up to four fractional digits.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Content-stream ops for a filled rectangle, isolated in q/Q.
pub(crate) fn fill_rect_ops(x: f64, y: f64, w: f64, h: f64, color: Color) -> String {
    format!(
        "q\n{}{} {} {} {} re\nf\nQ\n",
        color.fill_op(),
        format_coord(x),
        format_coord(y),
        format_coord(w),
        format_coord(h)
    )
}

/// Content-stream ops for a stroked (unfilled) rectangle.
pub(crate) fn stroke_rect_ops(
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    color: Color,
    line_width: f64,
) -> String {
    format!(
        "q\n{}{} w\n{} {} {} {} re\nS\nQ\n",
        color.stroke_op(),
        format_coord(line_width),
        format_coord(x),
        format_coord(y),
        format_coord(w),
        format_coord(h)
    )
}
