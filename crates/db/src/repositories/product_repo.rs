//! Hydrated product loading for webhook payloads.

use std::collections::BTreeMap;

use instavid_core::catalog::{ImageSource, ProductSource, StockSource, StoreSource};
use instavid_core::types::DbId;
use sqlx::PgPool;

use crate::models::product::{AttributeValue, MediaGalleryEntry, ProductEntity, StockItem};
use crate::repositories::StoreRepo;

const ENTITY_COLUMNS: &str = "entity_id, sku, type_id, attribute_set_id, created_at, updated_at";

/// Path under a store's base URL where gallery files are served from.
const MEDIA_PATH: &str = "media/catalog/product";

/// Loads fully hydrated product views.
pub struct ProductRepo;

impl ProductRepo {
    /// Find the entity row for an ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        let query =
            format!("SELECT {ENTITY_COLUMNS} FROM catalog_product_entity WHERE entity_id = $1");
        sqlx::query_as::<_, ProductEntity>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the full product source view for an ID.
    ///
    /// Assembles the entity row, every default-scope attribute value, stock,
    /// gallery, website and category links, and the first non-admin store.
    /// Returns `None` when no entity row exists; all other associations are
    /// optional and simply absent from the view when missing.
    pub async fn load_source(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductSource>, sqlx::Error> {
        let Some(entity) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let attributes = Self::attribute_values(pool, id).await?;
        let stock = Self::stock_item(pool, id).await?;
        let website_ids = Self::website_ids(pool, id).await?;
        let category_ids = Self::category_ids(pool, id).await?;
        let store = StoreRepo::first_real(pool).await?;
        let base_url = store.as_ref().map(|s| s.base_url.clone());
        let images = Self::gallery(pool, id, base_url.as_deref()).await?;

        let mut source = ProductSource {
            id: entity.entity_id,
            sku: Some(entity.sku),
            type_id: Some(entity.type_id),
            attribute_set_id: Some(entity.attribute_set_id),
            created_at: Some(entity.created_at),
            updated_at: Some(entity.updated_at),
            website_ids,
            category_ids,
            stock: Some(stock),
            images,
            store: store.map(|s| StoreSource {
                id: Some(s.store_id),
                code: Some(s.code),
                name: Some(s.name),
                base_url: Some(s.base_url),
                website_id: s.website_id,
                website_name: None,
            }),
            ..Default::default()
        };
        Self::apply_attributes(&mut source, attributes);

        if let (None, Some(base), Some(key)) = (
            source.product_url.as_ref(),
            base_url.as_deref(),
            source.url_key.as_deref(),
        ) {
            source.product_url = Some(format!("{}/{}.html", base.trim_end_matches('/'), key));
        }

        Ok(Some(source))
    }

    /// All default-scope attribute values across the typed value tables,
    /// normalized to text.
    async fn attribute_values(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Vec<AttributeValue>, sqlx::Error> {
        sqlx::query_as::<_, AttributeValue>(
            "SELECT a.attribute_code, v.value::TEXT AS value \
             FROM catalog_product_entity_int v \
             JOIN eav_attribute a ON a.attribute_id = v.attribute_id \
             WHERE v.entity_id = $1 AND v.store_id = 0 \
             UNION ALL \
             SELECT a.attribute_code, v.value \
             FROM catalog_product_entity_varchar v \
             JOIN eav_attribute a ON a.attribute_id = v.attribute_id \
             WHERE v.entity_id = $1 AND v.store_id = 0 \
             UNION ALL \
             SELECT a.attribute_code, v.value \
             FROM catalog_product_entity_text v \
             JOIN eav_attribute a ON a.attribute_id = v.attribute_id \
             WHERE v.entity_id = $1 AND v.store_id = 0 \
             UNION ALL \
             SELECT a.attribute_code, v.value::TEXT AS value \
             FROM catalog_product_entity_decimal v \
             JOIN eav_attribute a ON a.attribute_id = v.attribute_id \
             WHERE v.entity_id = $1 AND v.store_id = 0",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    /// Map known attribute codes onto typed fields; everything else goes
    /// into `custom_attributes` as strings.
    fn apply_attributes(source: &mut ProductSource, values: Vec<AttributeValue>) {
        let mut extras = BTreeMap::new();
        for attr in values {
            let Some(value) = attr.value else { continue };
            match attr.attribute_code.as_str() {
                "name" => source.name = Some(value),
                "description" => source.description = Some(value),
                "short_description" => source.short_description = Some(value),
                "url_key" => source.url_key = Some(value),
                "status" => source.status = value.parse().ok(),
                "visibility" => source.visibility = value.parse().ok(),
                "price" => source.price = value.parse().ok(),
                "special_price" => source.special_price = value.parse().ok(),
                _ => {
                    extras.insert(attr.attribute_code, serde_json::Value::String(value));
                }
            }
        }
        source.custom_attributes = extras;
    }

    async fn stock_item(pool: &PgPool, id: DbId) -> Result<StockSource, sqlx::Error> {
        let row = sqlx::query_as::<_, StockItem>(
            "SELECT entity_id, qty, is_in_stock FROM cataloginventory_stock_item \
             WHERE entity_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(match row {
            Some(stock) => StockSource {
                qty: Some(stock.qty),
                is_in_stock: Some(stock.is_in_stock),
            },
            None => StockSource::default(),
        })
    }

    async fn gallery(
        pool: &PgPool,
        id: DbId,
        base_url: Option<&str>,
    ) -> Result<Vec<ImageSource>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MediaGalleryEntry>(
            "SELECT file, label, position FROM catalog_product_media_gallery \
             WHERE entity_id = $1 ORDER BY position ASC NULLS LAST, value_id ASC",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|entry| {
                let media_url = base_url.map(|base| {
                    format!(
                        "{}/{MEDIA_PATH}/{}",
                        base.trim_end_matches('/'),
                        entry.file.trim_start_matches('/')
                    )
                });
                ImageSource {
                    file: entry.file,
                    label: entry.label,
                    position: entry.position,
                    media_url,
                }
            })
            .collect())
    }

    async fn website_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT website_id FROM catalog_product_website \
             WHERE entity_id = $1 ORDER BY website_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    async fn category_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT category_id FROM catalog_product_category \
             WHERE entity_id = $1 ORDER BY category_id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
