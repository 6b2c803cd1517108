//! Catalog value model and product source views.
//!
//! Two distinct projections of a product live here:
//!
//! - [`RawProductSnapshot`] -- the cart-add validation path's minimal view,
//!   fetched by direct SQL against the entity/attribute-value tables so it
//!   can never be served stale by a cached entity layer.
//! - [`ProductSource`] -- a typed, possibly-partial view of a fully hydrated
//!   product. Every optional field models an accessor the loading code path
//!   may not have populated; the formatter substitutes documented defaults
//!   instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Attribute value model
// ---------------------------------------------------------------------------

/// Attribute-store value for an enabled product.
pub const STATUS_ENABLED: i32 = 1;

/// Attribute-store value for a disabled product.
pub const STATUS_DISABLED: i32 = 2;

/// Visibility value that blocks individual purchase ("Not Visible Individually").
pub const VISIBILITY_NOT_VISIBLE: i32 = 1;

/// Visibility value for catalog-only listing.
pub const VISIBILITY_IN_CATALOG: i32 = 2;

/// Visibility value for search-only listing.
pub const VISIBILITY_IN_SEARCH: i32 = 3;

/// Visibility value for catalog and search.
pub const VISIBILITY_BOTH: i32 = 4;

/// Fallback product name when the name attribute row is absent.
pub const DEFAULT_PRODUCT_NAME: &str = "Unknown Product";

/// Default status when the status attribute row is absent. Zero is not a
/// valid enabled value, so a product with no stored status cannot be sold.
pub const MISSING_STATUS: i32 = 0;

/// Default visibility when the visibility attribute row is absent. One is
/// "not visible individually", so an unattributed product cannot be sold.
pub const MISSING_VISIBILITY: i32 = VISIBILITY_NOT_VISIBLE;

// ---------------------------------------------------------------------------
// RawProductSnapshot
// ---------------------------------------------------------------------------

/// Minimal product identity assembled straight from storage tables.
///
/// Status and visibility are attribute-store integers, never enum labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProductSnapshot {
    pub entity_id: DbId,
    pub sku: String,
    pub status: i32,
    pub visibility: i32,
    pub name: String,
}

impl RawProductSnapshot {
    /// Whether the stored status value is the enabled value.
    pub fn is_enabled(&self) -> bool {
        self.status == STATUS_ENABLED
    }

    /// Whether the product can be purchased on its own page.
    pub fn is_visible_individually(&self) -> bool {
        self.visibility != VISIBILITY_NOT_VISIBLE
    }
}

// ---------------------------------------------------------------------------
// ProductSource
// ---------------------------------------------------------------------------

/// Stock snapshot attached to a hydrated product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSource {
    pub qty: Option<f64>,
    pub is_in_stock: Option<bool>,
}

/// One media-gallery entry. `media_url` is the resolved public URL when the
/// loader could resolve one; the raw `file` path is the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub file: String,
    pub label: Option<String>,
    pub position: Option<i32>,
    pub media_url: Option<String>,
}

/// Store/website summary as seen from a product's store handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSource {
    pub id: Option<DbId>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub website_id: Option<DbId>,
    pub website_name: Option<String>,
}

/// Typed, possibly-partial view of a hydrated product entity.
///
/// Only `id` is guaranteed; entities loaded via different code paths may
/// carry any subset of the rest.
#[derive(Debug, Clone, Default)]
pub struct ProductSource {
    pub id: DbId,
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<f64>,
    pub special_price: Option<f64>,
    pub status: Option<i32>,
    pub visibility: Option<i32>,
    pub type_id: Option<String>,
    pub attribute_set_id: Option<i32>,
    pub website_ids: Vec<DbId>,
    pub category_ids: Vec<DbId>,
    pub stock: Option<StockSource>,
    pub images: Vec<ImageSource>,
    pub product_url: Option<String>,
    pub url_key: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub custom_attributes: BTreeMap<String, serde_json::Value>,
    pub store: Option<StoreSource>,
}

impl ProductSource {
    /// A view carrying only the identity fields.
    pub fn bare(id: DbId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}
