//! Partial source views for sales orders.
//!
//! Like [`crate::catalog::ProductSource`], these are typed views with
//! optional fields; orders loaded from different code paths may be missing
//! addresses, payment data, or individual header fields. The formatter
//! substitutes defaults rather than failing.

use crate::types::{DbId, Timestamp};

/// Typed, possibly-partial view of an order header plus associations.
#[derive(Debug, Clone, Default)]
pub struct OrderSource {
    pub entity_id: DbId,
    pub increment_id: Option<String>,
    pub customer_id: Option<DbId>,
    pub customer_email: Option<String>,
    pub customer_firstname: Option<String>,
    pub customer_lastname: Option<String>,
    pub customer_group_id: Option<DbId>,
    pub store_id: Option<DbId>,
    pub website_id: Option<DbId>,
    pub grand_total: Option<f64>,
    pub subtotal: Option<f64>,
    pub shipping_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub discount_amount: Option<f64>,
    pub currency_code: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_method: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub items: Vec<OrderItemSource>,
    pub billing_address: Option<AddressSource>,
    pub shipping_address: Option<AddressSource>,
}

/// One order line item.
#[derive(Debug, Clone, Default)]
pub struct OrderItemSource {
    pub item_id: DbId,
    pub product_id: Option<DbId>,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub qty_ordered: Option<f64>,
    pub qty_shipped: Option<f64>,
    pub qty_invoiced: Option<f64>,
    pub qty_refunded: Option<f64>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub row_total: Option<f64>,
    pub row_total_incl_tax: Option<f64>,
    pub tax_amount: Option<f64>,
    pub discount_amount: Option<f64>,
    pub product_options: Option<serde_json::Value>,
}

/// Billing or shipping address attached to an order.
#[derive(Debug, Clone, Default)]
pub struct AddressSource {
    pub id: DbId,
    pub address_type: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub company: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub region_id: Option<DbId>,
    pub postcode: Option<String>,
    pub country_id: Option<String>,
    pub telephone: Option<String>,
    pub fax: Option<String>,
}
