//! Sales order rows and their conversions into the core source views.

use instavid_core::sales::{AddressSource, OrderItemSource, OrderSource};
use instavid_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sales_order` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub entity_id: DbId,
    pub increment_id: String,
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
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `sales_order_item` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub item_id: DbId,
    pub order_id: DbId,
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

/// A row from the `sales_order_address` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderAddressRow {
    pub entity_id: DbId,
    pub parent_id: DbId,
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

impl OrderRow {
    /// Assemble the order source view from the header row plus associations.
    pub fn into_source(
        self,
        items: Vec<OrderItemRow>,
        addresses: Vec<OrderAddressRow>,
    ) -> OrderSource {
        let mut billing = None;
        let mut shipping = None;
        for addr in addresses {
            match addr.address_type.as_deref() {
                Some("billing") => billing = Some(addr.into_source()),
                Some("shipping") => shipping = Some(addr.into_source()),
                _ => {}
            }
        }
        OrderSource {
            entity_id: self.entity_id,
            increment_id: Some(self.increment_id),
            customer_id: self.customer_id,
            customer_email: self.customer_email,
            customer_firstname: self.customer_firstname,
            customer_lastname: self.customer_lastname,
            customer_group_id: self.customer_group_id,
            store_id: self.store_id,
            website_id: self.website_id,
            grand_total: self.grand_total,
            subtotal: self.subtotal,
            shipping_amount: self.shipping_amount,
            tax_amount: self.tax_amount,
            discount_amount: self.discount_amount,
            currency_code: self.currency_code,
            status: self.status,
            payment_method: self.payment_method,
            shipping_method: self.shipping_method,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            items: items.into_iter().map(OrderItemRow::into_source).collect(),
            billing_address: billing,
            shipping_address: shipping,
        }
    }
}

impl OrderItemRow {
    pub fn into_source(self) -> OrderItemSource {
        OrderItemSource {
            item_id: self.item_id,
            product_id: self.product_id,
            sku: self.sku,
            name: self.name,
            qty_ordered: self.qty_ordered,
            qty_shipped: self.qty_shipped,
            qty_invoiced: self.qty_invoiced,
            qty_refunded: self.qty_refunded,
            price: self.price,
            original_price: self.original_price,
            row_total: self.row_total,
            row_total_incl_tax: self.row_total_incl_tax,
            tax_amount: self.tax_amount,
            discount_amount: self.discount_amount,
            product_options: self.product_options,
        }
    }
}

impl OrderAddressRow {
    pub fn into_source(self) -> AddressSource {
        AddressSource {
            id: self.entity_id,
            address_type: self.address_type,
            firstname: self.firstname,
            lastname: self.lastname,
            company: self.company,
            street: self.street,
            city: self.city,
            region: self.region,
            region_id: self.region_id,
            postcode: self.postcode,
            country_id: self.country_id,
            telephone: self.telephone,
            fax: self.fax,
        }
    }
}
