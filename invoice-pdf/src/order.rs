//! Order record as stored by the shop backend.
//!
//! Every field is optional. A missing key and an explicit `null` both read
//! as absent, and nested objects that arrive in an unexpected shape (an
//! unpopulated `user` reference, for instance) are treated as absent too.
//! Resolution to display values happens in [`crate::fields`].

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: Option<String>,
    #[serde(deserialize_with = "object_or_absent")]
    pub user: Option<Customer>,
    #[serde(deserialize_with = "object_or_absent")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(deserialize_with = "items_or_empty")]
    pub order_items: Vec<OrderItem>,
    #[serde(deserialize_with = "lenient_number")]
    pub items_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub shipping_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub tax_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub total_price: Option<f64>,
    pub is_paid: Option<bool>,
    #[serde(deserialize_with = "timestamp")]
    pub paid_at: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: Option<String>,
    pub payment_method: Option<String>,
    #[serde(deserialize_with = "object_or_absent")]
    pub payment_result: Option<PaymentResult>,
    #[serde(deserialize_with = "object_or_absent")]
    pub applied_coupon: Option<AppliedCoupon>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    /// Recipient name; billing falls back to the customer name.
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_quantity")]
    pub qty: Option<i64>,
    #[serde(deserialize_with = "lenient_number")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentResult {
    pub id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppliedCoupon {
    pub code: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub discount_amount: Option<f64>,
}

impl OrderRecord {
    /// Parse an order from its JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid.unwrap_or(crate::defaults::IS_PAID)
    }
}

/// File name the shop uses for a stored invoice: `invoice_<order id>.pdf`.
/// Path separators in the id are replaced so the name stays a single
/// path component.
pub fn invoice_file_name(order: &OrderRecord) -> String {
    let id = order
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .unwrap_or(crate::defaults::FILE_STEM);
    let stem: String = id
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("invoice_{}.pdf", stem)
}

fn object_or_absent<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(T::deserialize(value).ok())
}

fn items_or_empty<'de, D>(deserializer: D) -> Result<Vec<OrderItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| OrderItem::deserialize(entry).ok())
        .collect())
}

/// Numbers, or strings holding a number. Anything else is absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?))
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(Some(n));
    }
    Ok(number_from(&value)
        .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
        .map(|n| n as i64))
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(map) => map.get("$numberDecimal").and_then(number_from),
        _ => None,
    }
}

/// Timestamps are kept as text; only their date prefix is ever read.
/// Extended-JSON `{"$date": ...}` wrappers are unwrapped. Other non-null
/// values keep their JSON text so they surface as invalid dates.
fn timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(timestamp_from(Value::deserialize(deserializer)?))
}

fn timestamp_from(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Object(mut map) => match map.remove("$date") {
            Some(inner) => timestamp_from(inner),
            None => Some(Value::Object(map).to_string()),
        },
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_backend_field_names() {
        let order: OrderRecord = serde_json::from_value(json!({
            "_id": "60c72b2f9b1e8a001c8e4d8b",
            "user": { "name": "John Doe", "email": "john.doe@example.com" },
            "orderItems": [{ "name": "Silk Tie", "qty": 2, "price": 25.0 }],
            "shippingAddress": { "address": "123 Main St", "postalCode": "12345" },
            "itemsPrice": 50.0,
            "isPaid": true,
            "paidAt": "2025-05-13T12:30:00.000Z",
            "paymentResult": { "id": "pi_1", "status": "succeeded" },
            "appliedCoupon": { "code": "SUMMER10", "discountAmount": 5.0 }
        }))
        .unwrap();

        assert_eq!(order.id.as_deref(), Some("60c72b2f9b1e8a001c8e4d8b"));
        assert_eq!(order.user.unwrap().name.as_deref(), Some("John Doe"));
        assert_eq!(order.order_items[0].qty, Some(2));
        let address = order.shipping_address.unwrap();
        assert_eq!(address.postal_code.as_deref(), Some("12345"));
        assert_eq!(address.city, None);
        assert_eq!(order.items_price, Some(50.0));
        assert_eq!(order.is_paid, Some(true));
        assert_eq!(order.applied_coupon.unwrap().discount_amount, Some(5.0));
    }

    #[test]
    fn plain_id_key_is_accepted() {
        let order = OrderRecord::from_json(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(order.id.as_deref(), Some("abc"));
    }

    #[test]
    fn null_and_missing_are_both_absent() {
        let order = OrderRecord::from_json(
            r#"{"user":null,"orderItems":null,"paidAt":null,"taxPrice":null}"#,
        )
        .unwrap();
        assert_eq!(order, OrderRecord::default());
    }

    #[test]
    fn unpopulated_user_reference_is_absent() {
        let order = OrderRecord::from_json(r#"{"user":"60c72b2f9b1e8a001c8e4d00"}"#).unwrap();
        assert!(order.user.is_none());
    }

    #[test]
    fn numbers_may_arrive_as_strings() {
        let order = OrderRecord::from_json(
            r#"{"itemsPrice":"470.49","orderItems":[{"qty":"3","price":"19.99"},{"qty":2.0}]}"#,
        )
        .unwrap();
        assert_eq!(order.items_price, Some(470.49));
        assert_eq!(order.order_items[0].qty, Some(3));
        assert_eq!(order.order_items[0].price, Some(19.99));
        assert_eq!(order.order_items[1].qty, Some(2));
    }

    #[test]
    fn fractional_quantity_is_absent() {
        let order = OrderRecord::from_json(r#"{"orderItems":[{"qty":1.5}]}"#).unwrap();
        assert_eq!(order.order_items[0].qty, None);
    }

    #[test]
    fn extended_json_values_are_unwrapped() {
        let order = OrderRecord::from_json(
            r#"{"createdAt":{"$date":"2025-05-13T12:00:00Z"},"totalPrice":{"$numberDecimal":"524.30"}}"#,
        )
        .unwrap();
        assert_eq!(order.created_at.as_deref(), Some("2025-05-13T12:00:00Z"));
        assert_eq!(order.total_price, Some(524.30));
    }

    #[test]
    fn non_text_timestamp_is_kept_for_validation() {
        let order = OrderRecord::from_json(r#"{"paidAt":1715600000}"#).unwrap();
        assert_eq!(order.paid_at.as_deref(), Some("1715600000"));
    }

    #[test]
    fn file_name_uses_order_id() {
        let order = OrderRecord {
            id: Some("60c72b2f9b1e8a001c8e4d8b".into()),
            ..OrderRecord::default()
        };
        assert_eq!(invoice_file_name(&order), "invoice_60c72b2f9b1e8a001c8e4d8b.pdf");
        assert_eq!(invoice_file_name(&OrderRecord::default()), "invoice_unknown.pdf");
        let odd = OrderRecord {
            id: Some("a/b".into()),
            ..OrderRecord::default()
        };
        assert_eq!(invoice_file_name(&odd), "invoice_a_b.pdf");
    }
}
