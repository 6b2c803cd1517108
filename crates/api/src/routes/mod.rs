pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /cart/add                     add a SKU to the session cart (POST)
/// /cart/count                   cart badge data (GET)
///
/// /lifecycle/product-saved      product create/update ingress (POST)
/// /lifecycle/product-deleted    product delete ingress (POST)
/// /lifecycle/order-placed       order placement ingress (POST)
///
/// /widget/config                widget configuration (GET)
///
/// /admin/webhook/status         dispatcher configuration status (GET)
/// /admin/webhook/test           connectivity test (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart/add", post(handlers::cart::add_to_cart))
        .route("/cart/count", get(handlers::cart::get_cart_count))
        .route(
            "/lifecycle/product-saved",
            post(handlers::lifecycle::product_saved),
        )
        .route(
            "/lifecycle/product-deleted",
            post(handlers::lifecycle::product_deleted),
        )
        .route(
            "/lifecycle/order-placed",
            post(handlers::lifecycle::order_placed),
        )
        .route("/widget/config", get(handlers::widget::get_widget_config))
        .route(
            "/admin/webhook/status",
            get(handlers::webhook_admin::webhook_status),
        )
        .route(
            "/admin/webhook/test",
            post(handlers::webhook_admin::test_webhook),
        )
}
