//! The webhook wire envelope and endpoint selection.

use instavid_core::types::DbId;
use serde::Serialize;

/// Platform identifier stamped on every envelope.
pub const PLATFORM: &str = "magento2";

/// Integration version stamped on every envelope.
pub const VERSION: &str = "1.0.0";

/// Path appended to the base endpoint for product-category events.
pub const PRODUCT_SYNC_PATH: &str = "/wh/magento/product-sync";

/// Event type header name.
pub const HEADER_EVENT: &str = "X-Instavid-Event";

/// Store scope header name.
pub const HEADER_STORE: &str = "X-Instavid-Store";

/// Immutable wire envelope; one per dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookEnvelope {
    pub event: String,
    pub timestamp: i64,
    pub store_id: DbId,
    pub data: serde_json::Value,
    pub platform: &'static str,
    pub version: &'static str,
}

impl WebhookEnvelope {
    /// Wrap event data in the envelope, stamped with the current time.
    pub fn new(event_type: &str, store_id: DbId, data: serde_json::Value) -> Self {
        Self {
            event: event_type.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            store_id,
            data,
            platform: PLATFORM,
            version: VERSION,
        }
    }
}

/// Where an event type is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Deliver to the given URL.
    Url(String),
    /// The receiving side has no endpoint for this category yet.
    Unimplemented,
}

/// Select the delivery URL for an event type.
///
/// `product*` events go to the product-sync path under the base endpoint;
/// `order*` events have no receiving endpoint yet; everything else posts to
/// the base endpoint itself.
pub fn route_for_event(base: &str, event_type: &str) -> Route {
    if event_type.starts_with("product") {
        Route::Url(format!("{base}{PRODUCT_SYNC_PATH}"))
    } else if event_type.starts_with("order") {
        Route::Unimplemented
    } else {
        Route::Url(base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_events_go_to_product_sync_path() {
        assert_eq!(
            route_for_event("https://api.instavid.com", "product.created"),
            Route::Url("https://api.instavid.com/wh/magento/product-sync".into())
        );
        assert_eq!(
            route_for_event("https://api.instavid.com", "product.deleted"),
            Route::Url("https://api.instavid.com/wh/magento/product-sync".into())
        );
    }

    #[test]
    fn order_events_have_no_route() {
        assert_eq!(
            route_for_event("https://api.instavid.com", "order.placed"),
            Route::Unimplemented
        );
    }

    #[test]
    fn other_events_go_to_base_endpoint() {
        for event in ["customer.registered", "cart.updated", "video.viewed"] {
            assert_eq!(
                route_for_event("https://api.instavid.com", event),
                Route::Url("https://api.instavid.com".into())
            );
        }
    }

    #[test]
    fn envelope_serializes_with_platform_and_version() {
        let envelope =
            WebhookEnvelope::new("product.created", 1, serde_json::json!({"id": 42}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["event"], "product.created");
        assert_eq!(value["store_id"], 1);
        assert_eq!(value["platform"], "magento2");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["data"]["id"], 42);
        assert!(value["timestamp"].is_i64());
    }
}
