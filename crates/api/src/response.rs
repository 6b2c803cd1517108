//! Shared response envelope types for API handlers.
//!
//! Configuration and admin endpoints use a `{ "data": ... }` envelope via
//! [`DataResponse`]. The storefront cart endpoints keep their own flat
//! `{ "success": ... }` shape, which the widget consumes as-is.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
