use std::io::Write;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use pdf_canvas::{Canvas, PageSize};
use tracing::{debug, info, instrument};

use crate::config::InvoiceConfig;
use crate::error::{RenderError, RenderResult};
use crate::fields::InvoiceFields;
use crate::layout;
use crate::order::OrderRecord;

/// Renders orders to PDF invoices with a fixed letterhead configuration.
///
/// Holds configuration only; every call builds a fresh document, so one
/// renderer can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct InvoiceRenderer {
    config: InvoiceConfig,
    clock: Option<NaiveDateTime>,
}

impl InvoiceRenderer {
    pub fn new(config: InvoiceConfig) -> Self {
        Self {
            config,
            clock: None,
        }
    }

    /// Use `now` instead of the local clock for the invoice number and for
    /// missing timestamps.
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.clock = Some(now);
        self
    }

    pub fn config(&self) -> &InvoiceConfig {
        &self.config
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Render `order` and write it to `destination`, replacing any file
    /// already there. Nothing is written when rendering fails.
    #[instrument(
        skip(self, order),
        fields(order_id = order.id.as_deref().unwrap_or("N/A"), destination = %destination.display())
    )]
    pub fn render(&self, order: &OrderRecord, destination: &Path) -> RenderResult<()> {
        let (bytes, pages) = self.build(order)?;
        write_atomically(destination, &bytes)?;
        info!(pages, bytes = bytes.len(), "invoice written");
        Ok(())
    }

    /// Render `order` into an in-memory PDF.
    pub fn render_to_vec(&self, order: &OrderRecord) -> RenderResult<Vec<u8>> {
        self.build(order).map(|(bytes, _)| bytes)
    }

    fn build(&self, order: &OrderRecord) -> RenderResult<(Vec<u8>, usize)> {
        let fields = InvoiceFields::from_order(order, self.now())?;
        let canvas = self.compose(&fields)?;
        let pages = canvas.page_count();
        let bytes = canvas
            .finish_to_vec()
            .map_err(|source| RenderError::IoFailure { path: None, source })?;
        debug!(pages, invoice = %fields.invoice_number, "document serialized");
        Ok((bytes, pages))
    }

    fn compose(&self, fields: &InvoiceFields) -> RenderResult<Canvas> {
        let company = self.config.company.clone();
        let mut canvas = Canvas::new(PageSize::A4);
        canvas
            .set_compression(self.config.compress)
            .set_info("Title", &format!("Invoice {}", fields.invoice_number))
            .set_info("Author", &company.name)
            .set_info("Creator", &company.name)
            .set_info("Subject", &format!("Order {}", fields.order_number));

        let logo = match &self.config.logo_path {
            Some(path) => Some(canvas.register_png_file(path).map_err(|source| {
                RenderError::Logo {
                    path: path.clone(),
                    source,
                }
            })?),
            None => None,
        };

        canvas.on_page_start(move |c| layout::letterhead(c, &company, logo));
        canvas.on_page_end(layout::footer);
        canvas.add_page();

        layout::invoice_details(&mut canvas, fields);
        layout::addresses(&mut canvas, fields);
        layout::items_table(&mut canvas, &fields.items);
        layout::totals(&mut canvas, &fields.totals);
        layout::payment_info(&mut canvas, &fields.payment);
        Ok(canvas)
    }
}

/// Write through a temporary file in the destination directory and rename
/// it into place. The temporary file is removed on any failure.
fn write_atomically(destination: &Path, bytes: &[u8]) -> RenderResult<()> {
    let fail = |source| RenderError::io_at(destination, source);
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".invoice-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;

    // Temporary files are created owner-only; published invoices are not.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(fail)?;
    }

    tmp.persist(destination).map_err(|e| fail(e.error))?;
    Ok(())
}
