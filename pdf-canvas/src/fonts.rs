use crate::writer::win_ansi_byte;

/// Style variants of the Helvetica standard font.
///
/// Standard fonts are available in every viewer without embedding, so the
/// canvas only ever references these four and measures them with the AFM
/// widths below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];

    /// Resource name used in content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Italic => "F3",
            FontStyle::BoldItalic => "F4",
        }
    }

    /// PDF BaseFont name.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontStyle::Regular => "Helvetica",
            FontStyle::Bold => "Helvetica-Bold",
            FontStyle::Italic => "Helvetica-Oblique",
            FontStyle::BoldItalic => "Helvetica-BoldOblique",
        }
    }

    fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }
}

/// Helvetica widths for ASCII 32..=126, 1/1000 em (Adobe AFM).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, //
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, //
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, //
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for ASCII 32..=126, 1/1000 em (Adobe AFM).
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, //
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, //
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, //
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, //
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, //
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for WinAnsi codes above ASCII; most of them are accented
/// letters whose widths sit around the lowercase average.
const UPPER_RANGE_WIDTH: u16 = 556;

/// Width of `?`, which replaces characters the font cannot show.
const REPLACEMENT_WIDTH: u16 = 556;

/// Character width in 1/1000 em.
pub fn char_width(style: FontStyle, ch: char) -> u16 {
    let code = match win_ansi_byte(ch) {
        Some(code) => code,
        None => return REPLACEMENT_WIDTH,
    };
    if !(32..=126).contains(&code) {
        return UPPER_RANGE_WIDTH;
    }
    let index = (code - 32) as usize;
    if style.is_bold() {
        HELVETICA_BOLD_WIDTHS[index]
    } else {
        HELVETICA_WIDTHS[index]
    }
}

/// Width of `text` in points at `font_size` points.
pub fn measure_text(text: &str, style: FontStyle, font_size: f64) -> f64 {
    let total: u32 = text.chars().map(|ch| char_width(style, ch) as u32).sum();
    total as f64 * font_size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oblique_shares_upright_widths() {
        assert_eq!(
            measure_text("Invoice", FontStyle::Italic, 10.0),
            measure_text("Invoice", FontStyle::Regular, 10.0)
        );
        assert_eq!(
            measure_text("TOTAL", FontStyle::BoldItalic, 10.0),
            measure_text("TOTAL", FontStyle::Bold, 10.0)
        );
    }

    #[test]
    fn bold_is_wider() {
        assert!(
            measure_text("Subtotal:", FontStyle::Bold, 10.0)
                > measure_text("Subtotal:", FontStyle::Regular, 10.0)
        );
    }

    #[test]
    fn digits_are_tabular() {
        assert_eq!(
            measure_text("$111.11", FontStyle::Regular, 9.0),
            measure_text("$888.88", FontStyle::Regular, 9.0)
        );
    }

    #[test]
    fn known_widths() {
        assert_eq!(char_width(FontStyle::Regular, ' '), 278);
        assert_eq!(char_width(FontStyle::Regular, 'W'), 944);
        assert_eq!(char_width(FontStyle::Bold, 'm'), 889);
        assert_eq!(char_width(FontStyle::Regular, 'é'), UPPER_RANGE_WIDTH);
        assert_eq!(char_width(FontStyle::Regular, '漢'), REPLACEMENT_WIDTH);
    }

    #[test]
    fn resource_names_are_distinct() {
        let mut names: Vec<&str> = FontStyle::ALL.iter().map(|s| s.resource_name()).collect();
        names.dedup();
        assert_eq!(names.len(), 4);
    }
}
