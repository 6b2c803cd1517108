//! Raw catalog reads for the cart-add validation path.
//!
//! These queries go straight to the entity and attribute-value tables rather
//! than through the hydrated product loader, so the validation path can never
//! be served a stale cached view of status or visibility.

use instavid_core::catalog::{
    RawProductSnapshot, DEFAULT_PRODUCT_NAME, MISSING_STATUS, MISSING_VISIBILITY,
};
use instavid_core::types::DbId;
use sqlx::PgPool;

/// Reads minimal product identity straight from storage.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Fetch the raw snapshot for a SKU, or `None` when no entity row exists.
    ///
    /// Missing attribute rows fall back to values that block a sale:
    /// status 0 (not a valid enabled value), visibility 1 (not visible
    /// individually), and a placeholder name.
    pub async fn snapshot(
        pool: &PgPool,
        sku: &str,
    ) -> Result<Option<RawProductSnapshot>, sqlx::Error> {
        let entity: Option<(DbId, String)> =
            sqlx::query_as("SELECT entity_id, sku FROM catalog_product_entity WHERE sku = $1")
                .bind(sku)
                .fetch_optional(pool)
                .await?;
        let Some((entity_id, sku)) = entity else {
            return Ok(None);
        };

        let status = Self::int_attribute(pool, entity_id, "status")
            .await?
            .unwrap_or(MISSING_STATUS);
        let visibility = Self::int_attribute(pool, entity_id, "visibility")
            .await?
            .unwrap_or(MISSING_VISIBILITY);
        let name = Self::varchar_attribute(pool, entity_id, "name")
            .await?
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());

        Ok(Some(RawProductSnapshot {
            entity_id,
            sku,
            status,
            visibility,
            name,
        }))
    }

    /// Default-scope value from the int attribute table.
    async fn int_attribute(
        pool: &PgPool,
        entity_id: DbId,
        code: &str,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT v.value FROM catalog_product_entity_int v \
             JOIN eav_attribute a ON a.attribute_id = v.attribute_id \
             WHERE v.entity_id = $1 AND a.attribute_code = $2 AND v.store_id = 0",
        )
        .bind(entity_id)
        .bind(code)
        .fetch_optional(pool)
        .await
        .map(Option::flatten)
    }

    /// Default-scope value from the varchar attribute table.
    async fn varchar_attribute(
        pool: &PgPool,
        entity_id: DbId,
        code: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT v.value FROM catalog_product_entity_varchar v \
             JOIN eav_attribute a ON a.attribute_id = v.attribute_id \
             WHERE v.entity_id = $1 AND a.attribute_code = $2 AND v.store_id = 0",
        )
        .bind(entity_id)
        .bind(code)
        .fetch_optional(pool)
        .await
        .map(Option::flatten)
    }
}
