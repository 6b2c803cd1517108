//! Domain error taxonomy.
//!
//! Every public operation classifies its failures into one of these
//! variants at its outermost boundary; the API layer maps them onto HTTP
//! responses. Best-effort paths (webhooks, attribution) degrade to logged
//! no-ops instead of surfacing a `CoreError` at all.

use crate::types::DbId;

/// Domain-level error for the storefront bridge.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A requested entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed validation with a user-safe message.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Anything unexpected; the message is logged, not shown to users.
    #[error("Internal error: {0}")]
    Internal(String),
}
