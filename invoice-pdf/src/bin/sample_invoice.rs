//! Render a hardcoded sample order to `output/invoice_<id>.pdf`.
//!
//! Run with:
//!   cargo run -p invoice-pdf --bin sample_invoice
//!
//! Letterhead settings are read from the environment (or a `.env` file);
//! set `RUST_LOG=debug` to follow the layout.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use invoice_pdf::{invoice_file_name, InvoiceConfig, InvoiceRenderer, OrderRecord};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const OUTPUT_DIR: &str = "output";

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let order: OrderRecord =
        serde_json::from_value(sample_order()).context("sample order does not deserialize")?;

    let dir = PathBuf::from(OUTPUT_DIR);
    fs::create_dir_all(&dir).with_context(|| format!("cannot create {}", dir.display()))?;
    let path = dir.join(invoice_file_name(&order));

    InvoiceRenderer::new(InvoiceConfig::from_env())
        .render(&order, &path)
        .with_context(|| format!("cannot render {}", path.display()))?;

    println!("Invoice generated: {}", path.display());
    Ok(())
}

fn sample_order() -> serde_json::Value {
    json!({
        "_id": "60c72b2f9b1e8a001c8e4d8b",
        "user": { "name": "John Doe", "email": "john.doe@example.com" },
        "orderItems": [
            { "name": "Men's Classic Suit - Navy, 40R", "qty": 1, "price": 299.99 },
            { "name": "Leather Oxford Shoes - Black, Size 10", "qty": 1, "price": 120.50 },
            { "name": "Silk Tie - Red Polka Dot", "qty": 2, "price": 25.00 }
        ],
        "shippingAddress": {
            "address": "123 Main St",
            "city": "Anytown",
            "postalCode": "12345",
            "country": "USA"
        },
        "paymentMethod": "Stripe",
        "paymentResult": { "id": "pi_1Jt...", "status": "succeeded" },
        "itemsPrice": 470.49,
        "taxPrice": 38.81,
        "shippingPrice": 15.00,
        "totalPrice": 524.30,
        "isPaid": true,
        "paidAt": "2025-05-13T12:30:00.000Z",
        "createdAt": "2025-05-13T12:00:00.000Z",
        "appliedCoupon": { "code": "SUMMER10", "discountAmount": 47.05 }
    })
}
