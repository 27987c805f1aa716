use std::io::{self, Write};
use std::ops::Range;
use std::path::Path;

use crate::fonts::{measure_text, FontStyle};
use crate::graphics::Color;
use crate::images::{load_png, ImageData, ImageError, ImageId};
use crate::objects::{ObjId, PdfObject};
use crate::wrap::wrap_lines;
use crate::writer::{deflate, encode_text, format_num, PdfWriter};

/// Points per millimetre. The canvas API works in millimetres with a
/// top-left origin; content streams are emitted in points from bottom-left.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;

/// Placeholder in hook text that `finish` replaces with the page count.
pub const TOTAL_PAGES_ALIAS: &str = "{nb}";

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
}

/// Which edges of a cell get a stroked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Border {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Border {
    pub const ALL: Border = Border {
        left: true,
        top: true,
        right: true,
        bottom: true,
    };
    pub const TOP: Border = Border {
        left: false,
        top: true,
        right: false,
        bottom: false,
    };
    pub const LEFT_RIGHT: Border = Border {
        left: true,
        top: false,
        right: true,
        bottom: false,
    };

    fn is_all(&self) -> bool {
        self.left && self.top && self.right && self.bottom
    }

    fn is_none(&self) -> bool {
        !(self.left || self.top || self.right || self.bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Where the cursor goes after a cell is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMove {
    /// To the right edge of the cell, same line.
    #[default]
    Right,
    /// To the left margin of the next line.
    NextLine,
    /// Directly below the cell, same x.
    Below,
}

/// Presentation of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellStyle {
    pub border: Border,
    pub align: Align,
    /// Paint the cell background with the current fill color.
    pub fill: bool,
    pub next: CursorMove,
}

impl CellStyle {
    /// Borderless, left-aligned, cursor moves right.
    pub fn inline() -> Self {
        CellStyle::default()
    }

    /// Borderless, left-aligned, cursor moves to the next line.
    pub fn line() -> Self {
        CellStyle {
            next: CursorMove::NextLine,
            ..CellStyle::default()
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn filled(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }
}

/// Callback run at a page boundary with the canvas positioned on that page.
pub type PageHook = Box<dyn FnMut(&mut Canvas)>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    font: FontStyle,
    /// Font size in points.
    font_size: f64,
    fill: Color,
    stroke: Color,
    text: Color,
    /// Line width in millimetres.
    line_width: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        DrawState {
            font: FontStyle::Regular,
            font_size: 12.0,
            fill: Color::WHITE,
            stroke: Color::BLACK,
            text: Color::BLACK,
            line_width: 0.2,
        }
    }
}

/// Content stream of one page, plus the byte ranges written by hooks.
#[derive(Default)]
struct PageBuf {
    content: Vec<u8>,
    hook_spans: Vec<Range<usize>>,
}

impl PageBuf {
    fn push(&mut self, ops: &[u8], from_hook: bool) {
        let start = self.content.len();
        self.content.extend_from_slice(ops);
        if from_hook {
            self.hook_spans.push(start..self.content.len());
        }
    }

    /// Replace `alias` inside hook-written ranges only; body text is kept
    /// as written.
    fn resolve_alias(&mut self, alias: &[u8], total: &[u8]) {
        if self.hook_spans.is_empty() {
            return;
        }
        let mut out = Vec::with_capacity(self.content.len());
        let mut done = 0;
        for span in self.hook_spans.drain(..) {
            out.extend_from_slice(&self.content[done..span.start]);
            out.extend_from_slice(&replace_bytes(&self.content[span.clone()], alias, total));
            done = span.end;
        }
        out.extend_from_slice(&self.content[done..]);
        self.content = out;
    }
}

#[derive(Clone, Copy)]
enum HookSlot {
    PageStart,
    PageEnd,
}

/// Cursor-based page layout engine.
///
/// Content is laid out with a moving cursor: each `cell` places a box of
/// text at the cursor and advances it. When a cell would cross the
/// page-break line a new page is started automatically, running the
/// registered page-end hook on the old page and the page-start hook on the
/// new one. Every drawing operation is self-contained (`q ... Q`), so the
/// logical font and colors never leak between operations or pages.
///
/// Pages are kept in memory until `finish`, where the total-page alias is
/// substituted in hook output and the whole document is serialized.
pub struct Canvas {
    page_size: PageSize,
    left_margin: f64,
    top_margin: f64,
    right_margin: f64,
    break_margin: f64,
    auto_page_break: bool,
    /// Inner horizontal padding of cell text.
    cell_margin: f64,
    x: f64,
    y: f64,
    last_height: f64,
    state: DrawState,
    pages: Vec<PageBuf>,
    page_open: bool,
    in_hook: bool,
    on_page_start: Option<PageHook>,
    on_page_end: Option<PageHook>,
    images: Vec<ImageData>,
    info: Vec<(String, String)>,
    compress: bool,
}

impl Canvas {
    /// A canvas with 10 mm margins and automatic page breaks 20 mm above
    /// the bottom edge. No page is open until `add_page`.
    pub fn new(page_size: PageSize) -> Self {
        Canvas {
            page_size,
            left_margin: 10.0,
            top_margin: 10.0,
            right_margin: 10.0,
            break_margin: 20.0,
            auto_page_break: true,
            cell_margin: 1.0,
            x: 10.0,
            y: 10.0,
            last_height: 0.0,
            state: DrawState::default(),
            pages: Vec::new(),
            page_open: false,
            in_hook: false,
            on_page_start: None,
            on_page_end: None,
            images: Vec::new(),
            info: Vec::new(),
            compress: false,
        }
    }

    /// Enable or disable automatic page breaks `margin` mm above the bottom.
    pub fn set_auto_page_break(&mut self, enabled: bool, margin: f64) -> &mut Self {
        self.auto_page_break = enabled;
        self.break_margin = margin;
        self
    }

    /// Flate-compress page content streams.
    pub fn set_compression(&mut self, compress: bool) -> &mut Self {
        self.compress = compress;
        self
    }

    /// Set a document info entry (e.g. "Title", "Creator").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Register the hook run right after every page begins. `{nb}` in text
    /// drawn by a hook becomes the total page count.
    pub fn on_page_start<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&mut Canvas) + 'static,
    {
        self.on_page_start = Some(Box::new(hook));
        self
    }

    /// Register the hook run right before every page is closed.
    pub fn on_page_end<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&mut Canvas) + 'static,
    {
        self.on_page_end = Some(Box::new(hook));
        self
    }

    // -------------------------------------------------------
    // Pages
    // -------------------------------------------------------

    /// Close the current page (if any) and start a new one. The cursor moves
    /// to the top-left margin; font and colors survive the page-start hook.
    pub fn add_page(&mut self) {
        let saved = self.state;
        if self.page_open {
            self.close_page();
        }
        self.pages.push(PageBuf::default());
        self.page_open = true;
        self.x = self.left_margin;
        self.y = self.top_margin;
        self.last_height = 0.0;
        self.state = DrawState::default();
        self.run_hook(HookSlot::PageStart);
        self.state = saved;
    }

    fn close_page(&mut self) {
        let saved = self.state;
        self.state = DrawState::default();
        self.run_hook(HookSlot::PageEnd);
        self.state = saved;
        self.page_open = false;
    }

    fn run_hook(&mut self, slot: HookSlot) {
        let hook = match slot {
            HookSlot::PageStart => self.on_page_start.take(),
            HookSlot::PageEnd => self.on_page_end.take(),
        };
        let Some(mut hook) = hook else {
            return;
        };
        self.in_hook = true;
        hook(self);
        self.in_hook = false;
        match slot {
            HookSlot::PageStart => self.on_page_start = Some(hook),
            HookSlot::PageEnd => self.on_page_end = Some(hook),
        }
    }

    /// 1-based number of the current page; 0 before the first page.
    pub fn page_no(&self) -> usize {
        self.pages.len()
    }

    pub fn width(&self) -> f64 {
        self.page_size.width
    }

    pub fn left_margin(&self) -> f64 {
        self.left_margin
    }

    pub fn right_margin(&self) -> f64 {
        self.right_margin
    }

    /// True when a block of height `h` at the cursor would trigger an
    /// automatic page break.
    pub fn will_break(&self, h: f64) -> bool {
        self.auto_page_break && self.y + h > self.page_size.height - self.break_margin
    }

    // -------------------------------------------------------
    // Cursor
    // -------------------------------------------------------

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move horizontally. Negative values count from the right edge.
    pub fn set_x(&mut self, x: f64) {
        self.x = if x >= 0.0 { x } else { self.page_size.width + x };
    }

    /// Move vertically and return to the left margin. Negative values
    /// count from the bottom edge.
    pub fn set_y(&mut self, y: f64) {
        self.x = self.left_margin;
        self.y = if y >= 0.0 { y } else { self.page_size.height + y };
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.set_y(y);
        self.set_x(x);
    }

    /// Line break: back to the left margin, down by `h` or by the height of
    /// the last cell.
    pub fn ln(&mut self, h: Option<f64>) {
        self.x = self.left_margin;
        self.y += h.unwrap_or(self.last_height);
    }

    // -------------------------------------------------------
    // Drawing state
    // -------------------------------------------------------

    /// Select the Helvetica variant and size (points) for following text.
    pub fn set_font(&mut self, style: FontStyle, size: f64) {
        self.state.font = style;
        self.state.font_size = size;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    pub fn set_draw_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.state.text = color;
    }

    /// Stroke width in millimetres.
    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    /// Width of `text` in millimetres in the current font.
    pub fn string_width(&self, text: &str) -> f64 {
        measure_text(text, self.state.font, self.state.font_size) / PT_PER_MM
    }

    // -------------------------------------------------------
    // Cells
    // -------------------------------------------------------

    /// Place a single-line cell of width `w` and height `h` at the cursor.
    ///
    /// A `w` of zero or less extends the cell to the right margin. Text is
    /// vertically centered with a 1 mm inner margin. Starts a new page first
    /// when the cell would cross the page-break line (except inside hooks).
    pub fn cell(&mut self, w: f64, h: f64, text: &str, style: &CellStyle) {
        if !self.page_open {
            self.add_page();
        }
        if !self.in_hook && self.will_break(h) {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
        let w = if w > 0.0 {
            w
        } else {
            self.page_size.width - self.right_margin - self.x
        };

        let mut ops: Vec<u8> = Vec::new();
        self.emit_box(&mut ops, w, h, style);
        if !text.is_empty() {
            self.emit_text(&mut ops, w, h, text, style.align);
        }
        self.append(&ops);

        self.last_height = h;
        match style.next {
            CursorMove::Right => self.x += w,
            CursorMove::NextLine => {
                self.x = self.left_margin;
                self.y += h;
            }
            CursorMove::Below => self.y += h,
        }
    }

    /// Place word-wrapped text as a stack of `h`-high lines of width `w`.
    ///
    /// Side borders are applied to every line, the top border to the first
    /// and the bottom border to the last. Afterwards the cursor sits below
    /// the block at the x where it started. Returns the number of lines.
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str, style: &CellStyle) -> usize {
        let w = if w > 0.0 {
            w
        } else {
            self.page_size.width - self.right_margin - self.x
        };
        let avail = w - 2.0 * self.cell_margin;
        let lines = wrap_lines(text, avail, |s| self.string_width(s));
        let start_x = self.x;
        let last = lines.len().saturating_sub(1);

        for (i, line) in lines.iter().enumerate() {
            let border = Border {
                left: style.border.left,
                right: style.border.right,
                top: style.border.top && i == 0,
                bottom: style.border.bottom && i == last,
            };
            self.x = start_x;
            let line_style = CellStyle {
                border,
                next: CursorMove::Below,
                ..*style
            };
            self.cell(w, h, line, &line_style);
        }
        self.x = start_x;
        lines.len()
    }

    /// Draw a straight line between two points.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        if !self.page_open {
            self.add_page();
        }
        let mut ops = Vec::new();
        self.push_stroke_setup(&mut ops);
        self.push_segment(&mut ops, x1, y1, x2, y2);
        ops.extend_from_slice(b"Q\n");
        self.append(&ops);
    }

    // -------------------------------------------------------
    // Images
    // -------------------------------------------------------

    /// Decode and register a PNG for later placement with `image`.
    pub fn register_png(&mut self, bytes: &[u8]) -> Result<ImageId, ImageError> {
        let data = load_png(bytes)?;
        self.images.push(data);
        Ok(ImageId(self.images.len() - 1))
    }

    /// Read, decode and register a PNG file.
    pub fn register_png_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ImageId, ImageError> {
        let bytes = std::fs::read(path)?;
        self.register_png(&bytes)
    }

    /// Draw a registered image with its top-left corner at (x, y) and
    /// width `w`. Height follows the aspect ratio unless given. Unknown
    /// ids are ignored.
    pub fn image(&mut self, id: ImageId, x: f64, y: f64, w: f64, h: Option<f64>) {
        let Some(img) = self.images.get(id.0) else {
            return;
        };
        let h = h.unwrap_or(w * img.aspect());
        if !self.page_open {
            self.add_page();
        }
        let k = PT_PER_MM;
        let ops = format!(
            "q\n{} 0 0 {} {} {} cm\n/Im{} Do\nQ\n",
            format_num(w * k),
            format_num(h * k),
            format_num(x * k),
            format_num((self.page_size.height - y - h) * k),
            id.0 + 1,
        );
        self.append(ops.as_bytes());
    }

    // -------------------------------------------------------
    // Content emission
    // -------------------------------------------------------

    fn append(&mut self, ops: &[u8]) {
        let from_hook = self.in_hook;
        if let Some(page) = self.pages.last_mut() {
            page.push(ops, from_hook);
        }
    }

    /// Background fill and borders for a cell at the cursor.
    fn emit_box(&self, ops: &mut Vec<u8>, w: f64, h: f64, style: &CellStyle) {
        let k = PT_PER_MM;
        let full_border = style.border.is_all();
        if style.fill || full_border {
            let op = match (style.fill, full_border) {
                (true, true) => "B",
                (true, false) => "f",
                _ => "S",
            };
            ops.extend_from_slice(b"q\n");
            if style.fill {
                ops.extend_from_slice(format!("{} rg\n", self.state.fill.operands()).as_bytes());
            }
            if full_border {
                self.push_stroke_state(ops);
            }
            ops.extend_from_slice(
                format!(
                    "{} {} {} {} re\n{}\nQ\n",
                    format_num(self.x * k),
                    format_num((self.page_size.height - self.y) * k),
                    format_num(w * k),
                    format_num(-h * k),
                    op,
                )
                .as_bytes(),
            );
        }
        if full_border || style.border.is_none() {
            return;
        }

        let (left, top) = (self.x, self.y);
        let (right, bottom) = (self.x + w, self.y + h);
        self.push_stroke_setup(ops);
        if style.border.left {
            self.push_segment(ops, left, top, left, bottom);
        }
        if style.border.top {
            self.push_segment(ops, left, top, right, top);
        }
        if style.border.right {
            self.push_segment(ops, right, top, right, bottom);
        }
        if style.border.bottom {
            self.push_segment(ops, left, bottom, right, bottom);
        }
        ops.extend_from_slice(b"Q\n");
    }

    fn push_stroke_state(&self, ops: &mut Vec<u8>) {
        ops.extend_from_slice(
            format!(
                "{} RG\n{} w\n",
                self.state.stroke.operands(),
                format_num(self.state.line_width * PT_PER_MM),
            )
            .as_bytes(),
        );
    }

    /// Opens a `q` block with the current stroke color and width; the
    /// caller closes it.
    fn push_stroke_setup(&self, ops: &mut Vec<u8>) {
        ops.extend_from_slice(b"q\n");
        self.push_stroke_state(ops);
    }

    fn push_segment(&self, ops: &mut Vec<u8>, x1: f64, y1: f64, x2: f64, y2: f64) {
        let k = PT_PER_MM;
        let page_h = self.page_size.height;
        ops.extend_from_slice(
            format!(
                "{} {} m\n{} {} l\nS\n",
                format_num(x1 * k),
                format_num((page_h - y1) * k),
                format_num(x2 * k),
                format_num((page_h - y2) * k),
            )
            .as_bytes(),
        );
    }

    fn emit_text(&self, ops: &mut Vec<u8>, w: f64, h: f64, text: &str, align: Align) {
        let k = PT_PER_MM;
        let text_w = self.string_width(text);
        let dx = match align {
            Align::Left => self.cell_margin,
            Align::Center => (w - text_w) / 2.0,
            Align::Right => w - self.cell_margin - text_w,
        };
        let font_mm = self.state.font_size / k;
        // Baseline sits 0.3 em below the vertical center of the cell.
        let baseline = self.y + 0.5 * h + 0.3 * font_mm;

        ops.extend_from_slice(
            format!(
                "q\n{} rg\nBT\n/{} {} Tf\n{} {} Td\n(",
                self.state.text.operands(),
                self.state.font.resource_name(),
                format_num(self.state.font_size),
                format_num((self.x + dx) * k),
                format_num((self.page_size.height - baseline) * k),
            )
            .as_bytes(),
        );
        ops.extend_from_slice(&encode_text(text));
        ops.extend_from_slice(b") Tj\nET\nQ\n");
    }

    // -------------------------------------------------------
    // Output
    // -------------------------------------------------------

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Close the last page, substitute the total-page alias in hook output
    /// and serialize the document to `writer`. A canvas with no pages gets
    /// one blank page.
    pub fn finish<W: Write>(mut self, writer: W) -> io::Result<W> {
        if self.pages.is_empty() {
            self.add_page();
        }
        if self.page_open {
            self.close_page();
        }

        let total = self.pages.len().to_string();
        let alias = encode_text(TOTAL_PAGES_ALIAS);
        for page in &mut self.pages {
            page.resolve_alias(&alias, total.as_bytes());
        }

        let mut w = PdfWriter::new(writer);
        w.write_header()?;
        let mut next_obj = FIRST_FONT_OBJ_NUM;
        let mut alloc = || {
            let id = ObjId(next_obj, 0);
            next_obj += 1;
            id
        };

        let mut font_refs = Vec::new();
        for style in FontStyle::ALL {
            let id = alloc();
            let font = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(style.base_font())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            w.write_object(id, &font)?;
            font_refs.push((style.resource_name(), PdfObject::Reference(id)));
        }

        let mut image_refs = Vec::new();
        for (i, img) in self.images.iter().enumerate() {
            let smask_id = match img.smask_xobject()? {
                Some(smask) => {
                    let id = alloc();
                    w.write_object(id, &smask)?;
                    Some(id)
                }
                None => None,
            };
            let id = alloc();
            w.write_object(id, &img.xobject(smask_id)?)?;
            image_refs.push((format!("Im{}", i + 1), PdfObject::Reference(id)));
        }

        let mut resources = vec![("Font", PdfObject::dict(font_refs))];
        if !image_refs.is_empty() {
            let entries = image_refs
                .iter()
                .map(|(name, r)| (name.as_str(), r.clone()))
                .collect();
            resources.push(("XObject", PdfObject::dict(entries)));
        }
        let resources = PdfObject::dict(resources);

        let media_box = PdfObject::media_box(
            self.page_size.width * PT_PER_MM,
            self.page_size.height * PT_PER_MM,
        );
        let mut kids = Vec::new();
        for PageBuf { content, .. } in std::mem::take(&mut self.pages) {
            let content_id = alloc();
            let stream = if self.compress {
                PdfObject::stream(
                    vec![("Filter", PdfObject::name("FlateDecode"))],
                    deflate(&content)?,
                )
            } else {
                PdfObject::stream(vec![], content)
            };
            w.write_object(content_id, &stream)?;

            let page_id = alloc();
            let page = PdfObject::dict(vec![
                ("Type", PdfObject::name("Page")),
                ("Parent", PdfObject::Reference(PAGES_OBJ)),
                ("MediaBox", media_box.clone()),
                ("Resources", resources.clone()),
                ("Contents", PdfObject::Reference(content_id)),
            ]);
            w.write_object(page_id, &page)?;
            kids.push(PdfObject::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::array(kids)),
            ("Count", PdfObject::Integer(count)),
        ]);
        w.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        w.write_object(CATALOG_OBJ, &catalog)?;

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = alloc();
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::text(v)))
                .collect();
            w.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        w.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(w.into_inner())
    }

    /// `finish` into a fresh buffer.
    pub fn finish_to_vec(self) -> io::Result<Vec<u8>> {
        self.finish(Vec::new())
    }
}

fn replace_bytes(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return haystack.to_vec();
    }
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(needle) {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}
