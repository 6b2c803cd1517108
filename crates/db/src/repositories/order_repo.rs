//! Repository for the `sales_order` tables.

use instavid_core::sales::OrderSource;
use instavid_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{OrderAddressRow, OrderItemRow, OrderRow};

const ORDER_COLUMNS: &str = "\
    entity_id, increment_id, customer_id, customer_email, customer_firstname, \
    customer_lastname, customer_group_id, store_id, website_id, grand_total, \
    subtotal, shipping_amount, tax_amount, discount_amount, currency_code, \
    status, payment_method, shipping_method, created_at, updated_at";

const ITEM_COLUMNS: &str = "\
    item_id, order_id, product_id, sku, name, qty_ordered, qty_shipped, \
    qty_invoiced, qty_refunded, price, original_price, row_total, \
    row_total_incl_tax, tax_amount, discount_amount, product_options";

const ADDRESS_COLUMNS: &str = "\
    entity_id, parent_id, address_type, firstname, lastname, company, street, \
    city, region, region_id, postcode, country_id, telephone, fax";

/// Reads order headers and their associations.
pub struct OrderRepo;

impl OrderRepo {
    /// Find an order header by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OrderRow>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM sales_order WHERE entity_id = $1");
        sqlx::query_as::<_, OrderRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the full order source view: header, line items, and addresses.
    pub async fn load_source(pool: &PgPool, id: DbId) -> Result<Option<OrderSource>, sqlx::Error> {
        let Some(header) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let items_query =
            format!("SELECT {ITEM_COLUMNS} FROM sales_order_item WHERE order_id = $1 ORDER BY item_id");
        let items = sqlx::query_as::<_, OrderItemRow>(&items_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let address_query =
            format!("SELECT {ADDRESS_COLUMNS} FROM sales_order_address WHERE parent_id = $1");
        let addresses = sqlx::query_as::<_, OrderAddressRow>(&address_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        Ok(Some(header.into_source(items, addresses)))
    }
}
