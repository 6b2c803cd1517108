//! Repository for the `stores` table.

use instavid_core::stores::StoreSummary;
use sqlx::PgPool;

use crate::models::store::Store;

const STORE_COLUMNS: &str = "store_id, code, name, base_url, website_id";

/// Reads store scope rows.
pub struct StoreRepo;

impl StoreRepo {
    /// List all stores ordered by ID, admin scope first when present.
    pub async fn list(pool: &PgPool) -> Result<Vec<Store>, sqlx::Error> {
        let query = format!("SELECT {STORE_COLUMNS} FROM stores ORDER BY store_id");
        sqlx::query_as::<_, Store>(&query).fetch_all(pool).await
    }

    /// The first non-admin store, used when an operation arrives under the
    /// admin scope and needs a concrete storefront.
    pub async fn first_real(pool: &PgPool) -> Result<Option<Store>, sqlx::Error> {
        let query =
            format!("SELECT {STORE_COLUMNS} FROM stores WHERE store_id > 0 ORDER BY store_id LIMIT 1");
        sqlx::query_as::<_, Store>(&query).fetch_optional(pool).await
    }

    /// Summaries of all stores, for admin-scope remapping.
    pub async fn summaries(pool: &PgPool) -> Result<Vec<StoreSummary>, sqlx::Error> {
        Ok(Self::list(pool).await?.iter().map(Store::summary).collect())
    }
}
