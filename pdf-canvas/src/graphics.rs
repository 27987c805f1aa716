use crate::writer::format_num;

/// RGB color, each component in 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Build a color from 0-255 channel values.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Content-stream operands, e.g. `0.7843 0.8627 1`.
    pub(crate) fn operands(&self) -> String {
        format!(
            "{} {} {}",
            format_num(self.r),
            format_num(self.g),
            format_num(self.b)
        )
    }
}
