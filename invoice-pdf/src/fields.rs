//! Display values for one invoice, resolved from an order record.
//!
//! Everything shown on the page is computed here, before any drawing
//! happens, so a date error surfaces before a file is touched and the
//! layout code only places finished strings.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::defaults::{self, text};
use crate::error::RenderResult;
use crate::format::{deduction, display_date, invoice_number, money, parse_date_prefix};
use crate::order::{OrderItem, OrderRecord};

/// Tolerance when comparing the supplied grand total with its components.
const TOTAL_TOLERANCE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceFields {
    pub invoice_number: String,
    pub order_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub bill_to: BillTo,
    pub ship_to: ShipTo,
    pub items: Vec<ItemRow>,
    pub totals: Totals,
    pub payment: Payment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillTo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city_line: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipTo {
    pub name: String,
    pub address: String,
    pub city_line: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    /// 1-based position in the order.
    pub number: usize,
    pub name: String,
    pub qty: String,
    pub unit_price: String,
    pub line_total: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub subtotal: String,
    pub discount: Option<Discount>,
    pub shipping: String,
    pub tax: String,
    pub grand_total: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Discount {
    pub label: String,
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Unpaid => "UNPAID",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub method: String,
    pub status: PaymentStatus,
    /// Only for paid orders with a non-empty transaction id.
    pub transaction_id: Option<String>,
    /// Only for paid orders.
    pub date_paid: Option<String>,
}

impl BillTo {
    pub fn lines(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.email.as_str(),
            self.address.as_str(),
            self.city_line.as_str(),
            self.country.as_str(),
        ]
    }
}

impl ShipTo {
    pub fn lines(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.address.as_str(),
            self.city_line.as_str(),
            self.country.as_str(),
        ]
    }
}

impl InvoiceFields {
    /// Resolve every display value of `order`. `now` stands in for every
    /// missing timestamp and dates the invoice number.
    pub fn from_order(order: &OrderRecord, now: NaiveDateTime) -> RenderResult<Self> {
        let order_id = text(order.id.as_deref(), defaults::ORDER_ID);

        let invoice_date = match (order.paid_at.as_deref(), order.created_at.as_deref()) {
            (Some(paid), _) => parse_date_prefix("paidAt", paid)?,
            (None, Some(created)) => parse_date_prefix("createdAt", created)?,
            (None, None) => now.date(),
        };

        Ok(InvoiceFields {
            invoice_number: invoice_number(order_id, now.date()),
            order_number: order_id.to_string(),
            invoice_date: display_date(invoice_date),
            due_date: defaults::DUE_DATE.to_string(),
            bill_to: bill_to(order),
            ship_to: ship_to(order),
            items: order
                .order_items
                .iter()
                .enumerate()
                .map(|(i, item)| item_row(i + 1, item))
                .collect(),
            totals: totals(order),
            payment: payment(order, now)?,
        })
    }
}

fn bill_to(order: &OrderRecord) -> BillTo {
    let user = order.user.as_ref();
    let address = order.shipping_address.as_ref();
    BillTo {
        name: text(user.and_then(|u| u.name.as_deref()), defaults::CUSTOMER_NAME).to_string(),
        email: text(user.and_then(|u| u.email.as_deref()), defaults::CUSTOMER_EMAIL).to_string(),
        address: text(address.and_then(|a| a.address.as_deref()), defaults::ADDRESS_LINE)
            .to_string(),
        city_line: city_line(order),
        country: text(address.and_then(|a| a.country.as_deref()), defaults::COUNTRY).to_string(),
    }
}

fn ship_to(order: &OrderRecord) -> ShipTo {
    let address = order.shipping_address.as_ref();
    let billing_name = order.user.as_ref().and_then(|u| u.name.as_deref());
    let name = text(
        address.and_then(|a| a.name.as_deref()),
        text(billing_name, defaults::CUSTOMER_NAME),
    );
    ShipTo {
        name: name.to_string(),
        address: text(address.and_then(|a| a.address.as_deref()), defaults::ADDRESS_LINE)
            .to_string(),
        city_line: city_line(order),
        country: text(address.and_then(|a| a.country.as_deref()), defaults::COUNTRY).to_string(),
    }
}

fn city_line(order: &OrderRecord) -> String {
    let address = order.shipping_address.as_ref();
    format!(
        "{}, {}",
        text(address.and_then(|a| a.city.as_deref()), defaults::CITY),
        text(address.and_then(|a| a.postal_code.as_deref()), defaults::POSTAL_CODE)
    )
}

fn item_row(number: usize, item: &OrderItem) -> ItemRow {
    let qty = item.qty.unwrap_or(defaults::ITEM_QTY);
    let price = item.price.unwrap_or(defaults::ITEM_PRICE);
    ItemRow {
        number,
        name: text(item.name.as_deref(), defaults::ITEM_NAME).to_string(),
        qty: qty.to_string(),
        unit_price: money(price),
        line_total: money(qty as f64 * price),
    }
}

fn totals(order: &OrderRecord) -> Totals {
    let subtotal = order.items_price.unwrap_or(defaults::ITEMS_PRICE);
    let shipping = order.shipping_price.unwrap_or(defaults::SHIPPING_PRICE);
    let tax = order.tax_price.unwrap_or(defaults::TAX_PRICE);
    let grand_total = order.total_price.unwrap_or(defaults::TOTAL_PRICE);

    let coupon = order.applied_coupon.as_ref();
    let amount = coupon
        .and_then(|c| c.discount_amount)
        .unwrap_or(defaults::DISCOUNT_AMOUNT);
    let code = coupon
        .and_then(|c| c.code.as_deref())
        .filter(|code| !code.trim().is_empty());
    let discount = match code {
        Some(code) if amount > 0.0 => Some(Discount {
            label: format!("Discount ({}):", code),
            amount: deduction(amount),
        }),
        _ => None,
    };
    let applied = if discount.is_some() { amount } else { 0.0 };

    let expected = subtotal + shipping + tax - applied;
    if order.total_price.is_some() && (expected - grand_total).abs() > TOTAL_TOLERANCE {
        warn!(
            order_id = order.id.as_deref().unwrap_or(defaults::ORDER_ID),
            supplied = grand_total,
            computed = expected,
            "grand total does not match its components; showing supplied value"
        );
    }

    Totals {
        subtotal: money(subtotal),
        discount,
        shipping: money(shipping),
        tax: money(tax),
        grand_total: money(grand_total),
    }
}

fn payment(order: &OrderRecord, now: NaiveDateTime) -> RenderResult<Payment> {
    let method = text(order.payment_method.as_deref(), defaults::PAYMENT_METHOD).to_string();
    if !order.is_paid() {
        return Ok(Payment {
            method,
            status: PaymentStatus::Unpaid,
            transaction_id: None,
            date_paid: None,
        });
    }

    let transaction_id = order
        .payment_result
        .as_ref()
        .and_then(|r| r.id.as_deref())
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string);
    let paid_on = match order.paid_at.as_deref() {
        Some(raw) => parse_date_prefix("paidAt", raw)?,
        None => now.date(),
    };
    Ok(Payment {
        method,
        status: PaymentStatus::Paid,
        transaction_id,
        date_paid: Some(display_date(paid_on)),
    })
}
