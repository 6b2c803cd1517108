//! Product entity rows and related catalog tables.

use instavid_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `catalog_product_entity` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProductEntity {
    pub entity_id: DbId,
    pub sku: String,
    pub type_id: String,
    pub attribute_set_id: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A single EAV attribute value joined with its attribute code.
#[derive(Debug, Clone, FromRow)]
pub struct AttributeValue {
    pub attribute_code: String,
    pub value: Option<String>,
}

/// A row from the `cataloginventory_stock_item` table.
#[derive(Debug, Clone, FromRow)]
pub struct StockItem {
    pub entity_id: DbId,
    pub qty: f64,
    pub is_in_stock: bool,
}

/// A row from the `catalog_product_media_gallery` table.
#[derive(Debug, Clone, FromRow)]
pub struct MediaGalleryEntry {
    pub file: String,
    pub label: Option<String>,
    pub position: Option<i32>,
}
