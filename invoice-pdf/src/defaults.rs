//! Fallback values for order fields that are absent.
//!
//! | field                              | fallback           |
//! |------------------------------------|--------------------|
//! | `_id`                              | `N/A`              |
//! | `user.name`, `user.email`          | `N/A`              |
//! | `shippingAddress.name`             | `user.name`        |
//! | `shippingAddress.*`                | `N/A`              |
//! | `orderItems[].name`                | `N/A`              |
//! | `orderItems[].qty`                 | `0`                |
//! | `orderItems[].price`               | `0.00`             |
//! | `itemsPrice`, `shippingPrice`      | `0.00`             |
//! | `taxPrice`, `totalPrice`           | `0.00`             |
//! | `isPaid`                           | `false`            |
//! | `paymentMethod`                    | `N/A`              |
//! | `paymentResult.id`                 | omitted            |
//! | `paidAt`                           | `createdAt`, now   |
//! | `createdAt`                        | now                |
//! | `appliedCoupon`                    | no discount line   |

/// Shown wherever a text field is missing.
pub const PLACEHOLDER: &str = "N/A";

pub const ORDER_ID: &str = PLACEHOLDER;
pub const CUSTOMER_NAME: &str = PLACEHOLDER;
pub const CUSTOMER_EMAIL: &str = PLACEHOLDER;
pub const ADDRESS_LINE: &str = PLACEHOLDER;
pub const CITY: &str = PLACEHOLDER;
pub const POSTAL_CODE: &str = PLACEHOLDER;
pub const COUNTRY: &str = PLACEHOLDER;
pub const ITEM_NAME: &str = PLACEHOLDER;
pub const ITEM_QTY: i64 = 0;
pub const ITEM_PRICE: f64 = 0.0;
pub const ITEMS_PRICE: f64 = 0.0;
pub const SHIPPING_PRICE: f64 = 0.0;
pub const TAX_PRICE: f64 = 0.0;
pub const TOTAL_PRICE: f64 = 0.0;
pub const IS_PAID: bool = false;
pub const PAYMENT_METHOD: &str = PLACEHOLDER;
pub const DISCOUNT_AMOUNT: f64 = 0.0;

/// Due date shown on every invoice.
pub const DUE_DATE: &str = "Due upon receipt";

/// File stem used when an order has no id.
pub const FILE_STEM: &str = "unknown";

/// Resolve an optional text field, treating empty strings as absent.
pub fn text<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(fallback)
}
