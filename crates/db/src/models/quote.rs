//! Quote (cart) rows.

use instavid_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `quotes` table. One quote per browsing session.
#[derive(Debug, Clone, FromRow)]
pub struct Quote {
    pub entity_id: DbId,
    pub session_id: String,
    pub customer_id: Option<DbId>,
    pub items_count: i32,
    pub grand_total: f64,
    pub currency_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `quote_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteItem {
    pub item_id: DbId,
    pub quote_id: DbId,
    pub product_id: DbId,
    pub sku: String,
    pub name: String,
    pub price: f64,
    pub qty: f64,
    pub row_total: f64,
}

/// Aggregate view of a cart returned to the storefront.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct CartSummary {
    pub items_count: i32,
    pub grand_total: f64,
}
