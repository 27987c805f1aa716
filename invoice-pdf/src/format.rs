//! Text formatting for amounts, dates and invoice numbers.

use chrono::NaiveDate;

use crate::error::{RenderError, RenderResult};

/// Characters of a timestamp that hold its calendar date.
const DATE_PREFIX_LEN: usize = 10;

/// Trailing characters of the order id kept in the invoice number.
const INVOICE_ID_TAIL: usize = 6;

/// `$` followed by the amount to exactly two decimals.
pub fn money(amount: f64) -> String {
    format!("${:.2}", normalize(amount))
}

/// A deduction: `-$` followed by the amount to two decimals.
pub fn deduction(amount: f64) -> String {
    format!("-${:.2}", normalize(amount))
}

fn normalize(amount: f64) -> f64 {
    // -0.0 would print as "-0.00"
    if amount == 0.0 {
        0.0
    } else {
        amount
    }
}

/// Parse the `YYYY-MM-DD` prefix of a timestamp. Anything after the first
/// ten characters is ignored, whatever it holds.
pub fn parse_date_prefix(field: &'static str, raw: &str) -> RenderResult<NaiveDate> {
    let prefix: String = raw.chars().take(DATE_PREFIX_LEN).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").map_err(|_| RenderError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Long form used on the invoice, e.g. `May 13, 2025`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// `INV-<last six characters of the id>-<YYYYMMDD>`.
pub fn invoice_number(order_id: &str, issued: NaiveDate) -> String {
    let count = order_id.chars().count();
    let tail: String = order_id
        .chars()
        .skip(count.saturating_sub(INVOICE_ID_TAIL))
        .collect();
    format!("INV-{}-{}", tail, issued.format("%Y%m%d"))
}
