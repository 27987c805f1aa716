//! Page sections of an invoice, drawn top to bottom at the canvas cursor.
//!
//! Positions and sizes are millimetres on an A4 page; font sizes are points.

use pdf_canvas::{
    Align, Border, Canvas, CellStyle, Color, CursorMove, FontStyle, ImageId, TOTAL_PAGES_ALIAS,
};
use tracing::debug;

use crate::config::CompanyProfile;
use crate::fields::{InvoiceFields, ItemRow, Payment, Totals};

/// Inner horizontal padding the canvas applies to cell text.
const CELL_PADDING: f64 = 1.0;

// ── letterhead & footer ───────────────────────────────────────────────────────

const LOGO_X: f64 = 10.0;
const LOGO_Y: f64 = 8.0;
const LOGO_WIDTH: f64 = 25.0;

/// Page-start content: logo, company lines and the `INVOICE` title.
pub(crate) fn letterhead(canvas: &mut Canvas, company: &CompanyProfile, logo: Option<ImageId>) {
    if let Some(logo) = logo {
        canvas.image(logo, LOGO_X, LOGO_Y, LOGO_WIDTH, None);
    }
    let centered = CellStyle::line().align(Align::Center);

    canvas.set_font(FontStyle::Bold, 15.0);
    canvas.cell(0.0, 10.0, &company.name, &centered);
    canvas.set_font(FontStyle::Regular, 9.0);
    canvas.cell(0.0, 5.0, &company.address, &centered);
    canvas.cell(0.0, 5.0, &company.contact, &centered);
    canvas.ln(Some(5.0));

    canvas.set_font(FontStyle::Bold, 18.0);
    canvas.cell(0.0, 10.0, "INVOICE", &centered);
    canvas.ln(Some(5.0));
}

/// Page-end content: page counter and thank-you line, 15 mm above the edge.
pub(crate) fn footer(canvas: &mut Canvas) {
    let centered = CellStyle::inline().align(Align::Center);
    canvas.set_y(-15.0);
    canvas.set_font(FontStyle::Italic, 8.0);
    let counter = format!("Page {}/{}", canvas.page_no(), TOTAL_PAGES_ALIAS);
    canvas.cell(0.0, 10.0, &counter, &centered);
    canvas.ln(Some(4.0));
    canvas.cell(0.0, 10.0, "Thank you for your business!", &centered);
}

// ── metadata ──────────────────────────────────────────────────────────────────

const LABEL_WIDTH: f64 = 40.0;

pub(crate) fn invoice_details(canvas: &mut Canvas, fields: &InvoiceFields) {
    let rows = [
        ("Invoice Number:", fields.invoice_number.as_str()),
        ("Order Number:", fields.order_number.as_str()),
        ("Invoice Date:", fields.invoice_date.as_str()),
        ("Due Date:", fields.due_date.as_str()),
    ];
    for (label, value) in rows {
        canvas.set_font(FontStyle::Bold, 10.0);
        canvas.cell(LABEL_WIDTH, 7.0, label, &CellStyle::inline());
        canvas.set_font(FontStyle::Regular, 10.0);
        canvas.cell(0.0, 7.0, value, &CellStyle::line());
    }
    canvas.ln(Some(10.0));
    debug!(y = canvas.y(), "invoice details placed");
}

// ── addresses ─────────────────────────────────────────────────────────────────

/// Left edge of the ship-to column, past the bill-to column width.
const SHIP_TO_OFFSET: f64 = 20.0;

pub(crate) fn addresses(canvas: &mut Canvas, fields: &InvoiceFields) {
    let column_width = canvas.width() / 2.0 - 15.0;
    let top = canvas.y();

    address_column(canvas, column_width, "BILL TO:", &fields.bill_to.lines());
    let bill_bottom = canvas.y();

    canvas.set_xy(column_width + SHIP_TO_OFFSET, top);
    address_column(canvas, column_width, "SHIP TO:", &fields.ship_to.lines());
    let ship_bottom = canvas.y();

    canvas.set_y(bill_bottom.max(ship_bottom) + 5.0);
    canvas.ln(Some(5.0));
    debug!(y = canvas.y(), "addresses placed");
}

fn address_column(canvas: &mut Canvas, width: f64, heading: &str, lines: &[&str]) {
    let style = CellStyle::line();
    canvas.set_font(FontStyle::Bold, 11.0);
    canvas.multi_cell(width, 7.0, heading, &style);
    canvas.set_font(FontStyle::Regular, 10.0);
    canvas.multi_cell(width, 6.0, &lines.join("\n"), &style);
}

// ── items table ───────────────────────────────────────────────────────────────

const COLUMN_WIDTHS: [f64; 5] = [10.0, 80.0, 20.0, 30.0, 30.0];
const HEADERS: [&str; 5] = ["#", "Product Description", "Qty", "Unit Price", "Total"];
const ALIGNS: [Align; 5] = [Align::Center, Align::Left, Align::Center, Align::Right, Align::Right];
const HEADER_HEIGHT: f64 = 7.0;
const ROW_HEIGHT: f64 = 6.0;
const NAME_COLUMN: usize = 1;
const BODY_FONT_SIZE: f64 = 9.0;
/// Product names shrink in half-point steps down to this size, then overflow.
const MIN_NAME_FONT_SIZE: f64 = 6.0;

fn header_fill() -> Color {
    Color::rgb8(200, 220, 255)
}

fn stripe_fill() -> Color {
    Color::rgb8(230, 230, 230)
}

fn table_width() -> f64 {
    COLUMN_WIDTHS.iter().sum()
}

/// Line items with alternating row fill. When a row would cross the page
/// break, the table is closed, a new page started and the header repeated.
/// A product name too wide for its column is set in a smaller font.
pub(crate) fn items_table(canvas: &mut Canvas, items: &[ItemRow]) {
    if canvas.will_break(HEADER_HEIGHT + ROW_HEIGHT) {
        canvas.add_page();
    }
    items_header(canvas);

    let mut fill = false;
    for item in items {
        if canvas.will_break(ROW_HEIGHT) {
            closing_rule(canvas);
            canvas.add_page();
            items_header(canvas);
        }
        let name_size = name_font_size(canvas, &item.name, COLUMN_WIDTHS[NAME_COLUMN]);
        let cells = [
            item.number.to_string(),
            item.name.clone(),
            item.qty.clone(),
            item.unit_price.clone(),
            item.line_total.clone(),
        ];
        let columns = cells.iter().zip(COLUMN_WIDTHS).zip(ALIGNS).enumerate();
        for (column, ((text, width), align)) in columns {
            let size = if column == NAME_COLUMN {
                name_size
            } else {
                BODY_FONT_SIZE
            };
            canvas.set_font(FontStyle::Regular, size);
            let style = CellStyle::inline()
                .border(Border::LEFT_RIGHT)
                .align(align)
                .filled(fill);
            canvas.cell(width, ROW_HEIGHT, text, &style);
        }
        canvas.ln(None);
        fill = !fill;
    }
    closing_rule(canvas);
    canvas.ln(Some(5.0));
    debug!(rows = items.len(), page = canvas.page_no(), "items table placed");
}

/// Draws the header row and leaves the body font and stripe color selected.
fn items_header(canvas: &mut Canvas) {
    canvas.set_font(FontStyle::Bold, 10.0);
    canvas.set_fill_color(header_fill());
    for (header, width) in HEADERS.iter().zip(COLUMN_WIDTHS) {
        let style = CellStyle::inline()
            .border(Border::ALL)
            .align(Align::Center)
            .filled(true);
        canvas.cell(width, HEADER_HEIGHT, header, &style);
    }
    canvas.ln(None);

    canvas.set_font(FontStyle::Regular, BODY_FONT_SIZE);
    canvas.set_fill_color(stripe_fill());
}

fn closing_rule(canvas: &mut Canvas) {
    canvas.cell(table_width(), 0.0, "", &CellStyle::inline().border(Border::TOP));
}

/// Largest font size, in half points, at which `text` fits a cell of
/// `width`. Text width scales linearly with size.
fn name_font_size(canvas: &mut Canvas, text: &str, width: f64) -> f64 {
    canvas.set_font(FontStyle::Regular, BODY_FONT_SIZE);
    let room = width - 2.0 * CELL_PADDING;
    let natural = canvas.string_width(text);
    if natural <= room {
        return BODY_FONT_SIZE;
    }
    let fitted = (BODY_FONT_SIZE * room / natural * 2.0).floor() / 2.0;
    fitted.max(MIN_NAME_FONT_SIZE)
}

// ── totals ────────────────────────────────────────────────────────────────────

const SUMMARY_LABEL_WIDTH: f64 = 50.0;
const SUMMARY_VALUE_WIDTH: f64 = 30.0;

pub(crate) fn totals(canvas: &mut Canvas, totals: &Totals) {
    let x = canvas.width() - canvas.right_margin() - SUMMARY_LABEL_WIDTH - SUMMARY_VALUE_WIDTH;

    summary_row(canvas, x, "Subtotal:", &totals.subtotal);
    if let Some(discount) = &totals.discount {
        summary_row(canvas, x, &discount.label, &discount.amount);
    }
    summary_row(canvas, x, "Shipping:", &totals.shipping);
    summary_row(canvas, x, "Tax:", &totals.tax);

    let boxed = CellStyle::inline().border(Border::ALL).align(Align::Right);
    canvas.set_font(FontStyle::Bold, 12.0);
    canvas.set_x(x);
    canvas.cell(SUMMARY_LABEL_WIDTH, 8.0, "GRAND TOTAL:", &boxed);
    let boxed = CellStyle {
        next: CursorMove::NextLine,
        ..boxed
    };
    canvas.cell(SUMMARY_VALUE_WIDTH, 8.0, &totals.grand_total, &boxed);
    canvas.ln(Some(10.0));
}

fn summary_row(canvas: &mut Canvas, x: f64, label: &str, value: &str) {
    canvas.set_font(FontStyle::Bold, 10.0);
    canvas.set_x(x);
    canvas.cell(
        SUMMARY_LABEL_WIDTH,
        7.0,
        label,
        &CellStyle::inline().align(Align::Right),
    );
    canvas.set_font(FontStyle::Regular, 10.0);
    canvas.cell(
        SUMMARY_VALUE_WIDTH,
        7.0,
        value,
        &CellStyle::line().align(Align::Right),
    );
}

// ── payment ───────────────────────────────────────────────────────────────────

pub(crate) fn payment_info(canvas: &mut Canvas, payment: &Payment) {
    canvas.set_font(FontStyle::Bold, 11.0);
    canvas.cell(0.0, 7.0, "Payment Information", &CellStyle::line());

    canvas.set_font(FontStyle::Regular, 10.0);
    payment_row(canvas, "Payment Method:", &payment.method);
    payment_row(canvas, "Payment Status:", payment.status.as_str());
    if let Some(id) = &payment.transaction_id {
        payment_row(canvas, "Transaction ID:", id);
    }
    if let Some(date) = &payment.date_paid {
        payment_row(canvas, "Date Paid:", date);
    }
    canvas.ln(Some(5.0));
}

fn payment_row(canvas: &mut Canvas, label: &str, value: &str) {
    canvas.cell(LABEL_WIDTH, 6.0, label, &CellStyle::inline());
    canvas.cell(0.0, 6.0, value, &CellStyle::line());
}
