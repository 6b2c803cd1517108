//! Store scope policy.
//!
//! Product lifecycle events raised from the admin scope carry store id 0,
//! which is not a real storefront. Webhooks must be attributed to an actual
//! store, so the admin placeholder is remapped to the first real store.
//! This remap is load-bearing for webhook correctness, not incidental.

use crate::types::DbId;

/// The administrative scope placeholder store id.
pub const ADMIN_STORE_ID: DbId = 0;

/// Minimal store identity used by the remap policy and payload summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub id: DbId,
    pub code: String,
    pub name: String,
}

/// Resolve the store id to attribute an event to.
///
/// A real (positive) store id passes through unchanged. The admin
/// placeholder is replaced by the first store in `stores` with a positive
/// id; when no real store exists, the placeholder is kept.
pub fn resolve_effective_store_id(raw_store_id: DbId, stores: &[StoreSummary]) -> DbId {
    if raw_store_id != ADMIN_STORE_ID {
        return raw_store_id;
    }
    stores
        .iter()
        .map(|store| store.id)
        .find(|id| *id > ADMIN_STORE_ID)
        .unwrap_or(raw_store_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: DbId) -> StoreSummary {
        StoreSummary {
            id,
            code: format!("store_{id}"),
            name: format!("Store {id}"),
        }
    }

    #[test]
    fn real_store_id_passes_through() {
        assert_eq!(resolve_effective_store_id(3, &[store(1), store(2)]), 3);
    }

    #[test]
    fn admin_id_remaps_to_first_real_store() {
        let stores = [store(0), store(2), store(5)];
        assert_eq!(resolve_effective_store_id(ADMIN_STORE_ID, &stores), 2);
    }

    #[test]
    fn admin_id_kept_when_no_real_store_exists() {
        assert_eq!(resolve_effective_store_id(ADMIN_STORE_ID, &[store(0)]), 0);
        assert_eq!(resolve_effective_store_id(ADMIN_STORE_ID, &[]), 0);
    }
}
