//! PDF invoices for shop orders.
//!
//! An [`OrderRecord`] (usually deserialized from the order service's JSON)
//! is laid out on A4 pages: letterhead, invoice metadata, billing and
//! shipping addresses, a line-item table, totals and payment status, with
//! a page counter in every footer. Absent fields show placeholders instead
//! of failing; see [`defaults`].
//!
//! ```no_run
//! use std::path::Path;
//! use invoice_pdf::{render, OrderRecord};
//!
//! let order = OrderRecord::from_json(r#"{"_id": "60c72b2f9b1e8a001c8e4d8b"}"#)?;
//! render(&order, Path::new("invoice.pdf"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod fields;
pub mod format;
mod layout;
pub mod order;
pub mod renderer;

use std::path::Path;

pub use config::{CompanyProfile, InvoiceConfig};
pub use error::{RenderError, RenderResult};
pub use fields::{InvoiceFields, PaymentStatus};
pub use order::{invoice_file_name, OrderRecord};
pub use renderer::InvoiceRenderer;

/// Render `order` with the built-in letterhead and write it to
/// `destination`, replacing any existing file.
pub fn render(order: &OrderRecord, destination: &Path) -> RenderResult<()> {
    InvoiceRenderer::default().render(order, destination)
}
