use std::cell::RefCell;
use std::rc::Rc;

use pdf_canvas::{Align, Border, Canvas, CellStyle, Color, FontStyle, PageSize};

/// 720 x 720 pt page, so millimetre positions map to round point values.
const SQUARE: PageSize = PageSize {
    width: 254.0,
    height: 254.0,
};

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

// -------------------------------------------------------
// Document structure
// -------------------------------------------------------

#[test]
fn empty_canvas_still_has_one_page() {
    let bytes = Canvas::new(PageSize::A4).finish_to_vec().unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(contains(&bytes, b"/Count 1"));
    assert!(bytes.ends_with(b"%%EOF\n"));
}

#[test]
fn fonts_use_win_ansi_encoding() {
    let bytes = Canvas::new(PageSize::A4).finish_to_vec().unwrap();
    for base in ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique", "Helvetica-BoldOblique"] {
        let entry = format!("/BaseFont /{} /Encoding /WinAnsiEncoding", base);
        assert!(contains(&bytes, entry.as_bytes()), "missing {}", base);
    }
}

#[test]
fn info_entries_are_written() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.set_info("Title", "Invoice INV-000001-20250513");
    canvas.set_info("Creator", "pdf-canvas");
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"/Title (Invoice INV-000001-20250513)"));
    assert!(contains(&bytes, b"/Info "));
}

#[test]
fn media_box_is_in_points() {
    let mut canvas = Canvas::new(SQUARE);
    canvas.add_page();
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"/MediaBox [0 0 720"));
}

#[test]
fn compression_shrinks_content_streams() {
    let make = |compress: bool| {
        let mut canvas = Canvas::new(PageSize::A4);
        canvas.set_compression(compress);
        canvas.add_page();
        for i in 0..40 {
            canvas.cell(0.0, 6.0, &format!("Line item number {}", i), &CellStyle::line());
        }
        canvas.finish_to_vec().unwrap()
    };
    let plain = make(false);
    let packed = make(true);
    assert!(packed.len() < plain.len());
    assert!(contains(&packed, b"/Filter /FlateDecode"));
    assert!(!contains(&plain, b"/Filter /FlateDecode"));
}

// -------------------------------------------------------
// Cells
// -------------------------------------------------------

#[test]
fn cell_text_uses_current_font() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    canvas.set_font(FontStyle::Bold, 10.0);
    canvas.cell(40.0, 7.0, "Invoice Number:", &CellStyle::inline());
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"/F2 10 Tf"));
    assert!(contains(&bytes, b"(Invoice Number:) Tj"));
}

#[test]
fn cell_text_is_escaped_and_encoded() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    canvas.cell(0.0, 7.0, "Discount (SUMMER10): Crème 日", &CellStyle::inline());
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"(Discount \\(SUMMER10\\): Cr\xe8me ?) Tj"));
}

#[test]
fn filled_bordered_cell_geometry() {
    let mut canvas = Canvas::new(SQUARE);
    canvas.add_page();
    canvas.set_fill_color(Color::rgb8(200, 220, 255));
    canvas.set_xy(25.4, 25.4);
    canvas.cell(50.8, 12.7, "", &CellStyle::inline().border(Border::ALL).filled(true));
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"72 648 144 -36 re\nB\n"));
    assert!(contains(&bytes, b"0.7843 0.8627 1 rg\n"));
}

#[test]
fn fill_without_border_uses_fill_operator() {
    let mut canvas = Canvas::new(SQUARE);
    canvas.add_page();
    canvas.set_xy(25.4, 25.4);
    canvas.cell(50.8, 12.7, "x", &CellStyle::inline().filled(true));
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"72 648 144 -36 re\nf\n"));
}

#[test]
fn side_borders_are_separate_segments() {
    let mut canvas = Canvas::new(SQUARE);
    canvas.add_page();
    canvas.set_xy(25.4, 25.4);
    canvas.cell(50.8, 12.7, "", &CellStyle::inline().border(Border::LEFT_RIGHT));
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"72 648 m\n72 612 l\nS\n"));
    assert!(contains(&bytes, b"216 648 m\n216 612 l\nS\n"));
    assert!(!contains(&bytes, b" re\n"));
}

#[test]
fn right_aligned_text_ends_at_inner_margin() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    canvas.set_font(FontStyle::Regular, 10.0);
    let text = "$524.30";
    let w = canvas.string_width(text);
    canvas.set_x(100.0);
    canvas.cell(30.0, 7.0, text, &CellStyle::inline().align(Align::Right));
    // Right edge 130 mm minus the 1 mm inner margin.
    let expected_x = (129.0 - w) * pdf_canvas::PT_PER_MM;
    let bytes = canvas.finish_to_vec().unwrap();
    let needle = format!("{:.4}", expected_x);
    let needle = needle.trim_end_matches('0').trim_end_matches('.');
    assert!(contains(&bytes, format!("{} ", needle).as_bytes()));
}

#[test]
fn draw_color_and_line_width_apply_to_borders() {
    let mut canvas = Canvas::new(SQUARE);
    canvas.add_page();
    canvas.set_draw_color(Color::rgb8(255, 0, 0));
    canvas.set_line_width(2.0 / pdf_canvas::PT_PER_MM);
    canvas.set_xy(25.4, 25.4);
    canvas.cell(50.8, 12.7, "", &CellStyle::inline().border(Border::ALL));
    canvas.line(25.4, 50.8, 76.2, 50.8);
    let bytes = canvas.finish_to_vec().unwrap();
    assert_eq!(count(&bytes, b"1 0 0 RG\n2 w\n"), 2);
    assert!(contains(&bytes, b"72 648 144 -36 re\nS\n"));
}

#[test]
fn default_stroke_is_thin_black() {
    let mut canvas = Canvas::new(SQUARE);
    canvas.add_page();
    canvas.line(25.4, 25.4, 76.2, 25.4);
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"0 0 0 RG\n0.5669 w\n"));
}

#[test]
fn text_color_applies_to_following_cells() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    canvas.cell(40.0, 7.0, "before", &CellStyle::inline());
    canvas.set_text_color(Color::rgb8(0, 0, 255));
    canvas.cell(40.0, 7.0, "after", &CellStyle::inline());
    let bytes = canvas.finish_to_vec().unwrap();
    assert_eq!(count(&bytes, b"0 0 0 rg\nBT\n"), 1);
    assert_eq!(count(&bytes, b"0 0 1 rg\nBT\n"), 1);
}

#[test]
fn multi_cell_wraps_and_advances() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    canvas.set_font(FontStyle::Regular, 10.0);
    canvas.set_xy(115.0, 40.0);
    let lines = canvas.multi_cell(90.0, 6.0, "John Doe\njohn.doe@example.com\nUSA", &CellStyle::inline());
    assert_eq!(lines, 3);
    assert_eq!(canvas.y(), 58.0);
    assert_eq!(canvas.x(), 115.0);
}

#[test]
fn multi_cell_wraps_long_text() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    canvas.set_font(FontStyle::Regular, 10.0);
    let long = "Leather Oxford Shoes - Black, Size 10 ".repeat(6);
    let lines = canvas.multi_cell(40.0, 5.0, &long, &CellStyle::inline());
    assert!(lines > 3);
}

// -------------------------------------------------------
// Pages and hooks
// -------------------------------------------------------

#[test]
fn hooks_run_on_every_page() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.on_page_start(|c| {
        c.set_font(FontStyle::Bold, 15.0);
        c.cell(0.0, 10.0, "ACME", &CellStyle::line().align(Align::Center));
    });
    canvas.on_page_end(|c| {
        c.set_y(-15.0);
        c.set_font(FontStyle::Italic, 8.0);
        let label = format!("Page {}/{{nb}}", c.page_no());
        c.cell(0.0, 10.0, &label, &CellStyle::inline().align(Align::Center));
    });
    canvas.add_page();
    canvas.add_page();
    canvas.add_page();
    let bytes = canvas.finish_to_vec().unwrap();

    assert_eq!(count(&bytes, b"(ACME) Tj"), 3);
    assert!(contains(&bytes, b"(Page 1/3) Tj"));
    assert!(contains(&bytes, b"(Page 2/3) Tj"));
    assert!(contains(&bytes, b"(Page 3/3) Tj"));
    assert!(!contains(&bytes, b"{nb}"));
}

#[test]
fn page_alias_in_body_text_is_kept() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.on_page_end(|c| {
        c.set_y(-15.0);
        let label = format!("Page {}/{}", c.page_no(), pdf_canvas::TOTAL_PAGES_ALIAS);
        c.cell(0.0, 10.0, &label, &CellStyle::inline());
    });
    canvas.add_page();
    canvas.cell(0.0, 7.0, "Pack {nb} socks", &CellStyle::line());
    canvas.add_page();
    let bytes = canvas.finish_to_vec().unwrap();

    assert!(contains(&bytes, b"(Pack {nb} socks) Tj"));
    assert!(contains(&bytes, b"(Page 1/2) Tj"));
    assert!(contains(&bytes, b"(Page 2/2) Tj"));
    assert_eq!(count(&bytes, b"{nb}"), 1);
}

#[test]
fn content_starts_below_header() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.on_page_start(|c| {
        c.cell(0.0, 10.0, "HEADER", &CellStyle::line());
        c.ln(Some(5.0));
    });
    canvas.add_page();
    assert_eq!(canvas.y(), 25.0);
}

#[test]
fn auto_page_break_starts_new_pages() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    // 297 - 20 break margin - 10 top margin leaves room for 26 rows of 10 mm.
    for i in 0..30 {
        canvas.cell(0.0, 10.0, &format!("row {}", i), &CellStyle::line());
    }
    assert_eq!(canvas.page_count(), 2);
    assert_eq!(canvas.y(), 10.0 + 4.0 * 10.0);
}

#[test]
fn page_break_preserves_x_and_font() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.on_page_start(|c| {
        c.set_font(FontStyle::BoldItalic, 18.0);
        c.cell(0.0, 10.0, "INVOICE", &CellStyle::line());
    });
    canvas.add_page();
    canvas.set_font(FontStyle::Bold, 9.0);
    canvas.set_xy(140.0, 270.0);
    canvas.cell(30.0, 10.0, "Tax:", &CellStyle::inline());
    assert_eq!(canvas.page_count(), 2);
    assert_eq!(canvas.x(), 170.0);
    assert_eq!(canvas.y(), 20.0);
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"/F2 9 Tf"));
}

#[test]
fn cells_inside_hooks_do_not_break_pages() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.on_page_end(|c| {
        c.set_y(-15.0);
        c.cell(0.0, 10.0, "footer", &CellStyle::line());
    });
    canvas.add_page();
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"/Count 1"));
}

#[test]
fn will_break_reports_trigger() {
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.add_page();
    canvas.set_y(270.0);
    assert!(!canvas.will_break(7.0));
    assert!(canvas.will_break(7.5));
    canvas.set_auto_page_break(false, 0.0);
    assert!(!canvas.will_break(50.0));
}

#[test]
fn hook_can_capture_shared_state() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.on_page_end(move |c| log.borrow_mut().push(c.page_no()));
    canvas.add_page();
    canvas.add_page();
    canvas.finish_to_vec().unwrap();
    assert_eq!(*seen.borrow(), vec![1, 2]);
}

// -------------------------------------------------------
// Lines and images
// -------------------------------------------------------

#[test]
fn line_is_stroked() {
    let mut canvas = Canvas::new(SQUARE);
    canvas.add_page();
    canvas.line(25.4, 25.4, 76.2, 25.4);
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"72 648 m\n216 648 l\nS\n"));
}

fn encode_png(color: png::ColorType, pixels: &[u8], w: u32, h: u32) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, w, h);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(pixels).unwrap();
    }
    out
}

#[test]
fn png_is_embedded_as_xobject() {
    let png = encode_png(png::ColorType::Rgb, &[255, 0, 0, 0, 0, 255], 2, 1);
    let mut canvas = Canvas::new(SQUARE);
    let logo = canvas.register_png(&png).unwrap();
    canvas.add_page();
    canvas.image(logo, 25.4, 25.4, 50.8, None);
    let bytes = canvas.finish_to_vec().unwrap();

    assert!(contains(&bytes, b"/Subtype /Image /Width 2 /Height 1"));
    assert!(contains(&bytes, b"/XObject << /Im1 "));
    // Aspect 1:2 gives 25.4 mm (72 pt) of height.
    assert!(contains(&bytes, b"144 0 0 72 72 576 cm\n/Im1 Do"));
    assert!(!contains(&bytes, b"/SMask"));
}

#[test]
fn png_alpha_becomes_smask() {
    let png = encode_png(png::ColorType::Rgba, &[10, 20, 30, 128], 1, 1);
    let mut canvas = Canvas::new(PageSize::A4);
    canvas.register_png(&png).unwrap();
    let bytes = canvas.finish_to_vec().unwrap();
    assert!(contains(&bytes, b"/SMask "));
    assert!(contains(&bytes, b"/ColorSpace /DeviceGray"));
}

#[test]
fn unreadable_logo_file_is_an_error() {
    let mut canvas = Canvas::new(PageSize::A4);
    assert!(canvas.register_png_file("does/not/exist.png").is_err());
}
