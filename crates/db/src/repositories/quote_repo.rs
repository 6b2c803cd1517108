//! Repository for session-scoped carts (`quotes` and `quote_items`).

use instavid_core::types::DbId;
use sqlx::PgPool;

use crate::models::quote::{CartSummary, Quote, QuoteItem};

const QUOTE_COLUMNS: &str = "\
    entity_id, session_id, customer_id, items_count, grand_total, \
    currency_code, created_at, updated_at";

const ITEM_COLUMNS: &str = "item_id, quote_id, product_id, sku, name, price, qty, row_total";

/// Provides cart operations keyed by browsing session.
pub struct QuoteRepo;

impl QuoteRepo {
    /// Fetch the session's active quote, creating an empty one if none
    /// exists. A known customer id is attached on first sight and kept
    /// afterwards.
    pub async fn find_or_create(
        pool: &PgPool,
        session_id: &str,
        customer_id: Option<DbId>,
    ) -> Result<Quote, sqlx::Error> {
        let query = format!(
            "INSERT INTO quotes (session_id, customer_id) VALUES ($1, $2) \
             ON CONFLICT (session_id) DO UPDATE SET \
                 customer_id = COALESCE(quotes.customer_id, EXCLUDED.customer_id), \
                 updated_at = NOW() \
             RETURNING {QUOTE_COLUMNS}"
        );
        sqlx::query_as::<_, Quote>(&query)
            .bind(session_id)
            .bind(customer_id)
            .fetch_one(pool)
            .await
    }

    /// Fetch the session's quote without creating one.
    pub async fn find_by_session(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<Quote>, sqlx::Error> {
        let query = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE session_id = $1");
        sqlx::query_as::<_, Quote>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a product to a quote. Adding the same product again accumulates
    /// quantity on the existing line instead of creating a second one.
    pub async fn add_item(
        pool: &PgPool,
        quote_id: DbId,
        product_id: DbId,
        sku: &str,
        name: &str,
        price: f64,
        qty: f64,
    ) -> Result<QuoteItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO quote_items (quote_id, product_id, sku, name, price, qty, row_total) \
             VALUES ($1, $2, $3, $4, $5, $6, $5 * $6) \
             ON CONFLICT (quote_id, product_id) DO UPDATE SET \
                 qty = quote_items.qty + EXCLUDED.qty, \
                 price = EXCLUDED.price, \
                 row_total = EXCLUDED.price * (quote_items.qty + EXCLUDED.qty) \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, QuoteItem>(&query)
            .bind(quote_id)
            .bind(product_id)
            .bind(sku)
            .bind(name)
            .bind(price)
            .bind(qty)
            .fetch_one(pool)
            .await
    }

    /// Recompute and persist the quote's item count and grand total from its
    /// lines, returning the fresh summary.
    pub async fn refresh_totals(
        pool: &PgPool,
        quote_id: DbId,
    ) -> Result<CartSummary, sqlx::Error> {
        sqlx::query_as::<_, CartSummary>(
            "UPDATE quotes SET \
                 items_count = (SELECT COALESCE(SUM(qty), 0)::INT FROM quote_items \
                                WHERE quote_id = $1), \
                 grand_total = (SELECT COALESCE(SUM(row_total), 0) FROM quote_items \
                                WHERE quote_id = $1), \
                 updated_at = NOW() \
             WHERE entity_id = $1 \
             RETURNING items_count, grand_total",
        )
        .bind(quote_id)
        .fetch_one(pool)
        .await
    }

}
