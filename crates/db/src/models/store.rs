//! Store and website rows.

use instavid_core::stores::StoreSummary;
use instavid_core::types::DbId;
use sqlx::FromRow;

/// A row from the `stores` table.
#[derive(Debug, Clone, FromRow)]
pub struct Store {
    pub store_id: DbId,
    pub code: String,
    pub name: String,
    pub base_url: String,
    pub website_id: Option<DbId>,
}

impl Store {
    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            id: self.store_id,
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }
}
