//! Storefront cart endpoints.
//!
//! These endpoints answer the widget directly, so every outcome is a 200
//! with a flat `{ "success": ... }` JSON body; rejections carry a message
//! the widget can show, and a top-level boundary turns anything unexpected
//! into a generic failure with full logging.

use axum::extract::State;
use axum::Json;
use instavid_core::catalog::{ProductSource, RawProductSnapshot, STATUS_ENABLED};
use instavid_db::models::quote::CartSummary;
use instavid_db::repositories::{CatalogRepo, ProductRepo, QuoteRepo};
use serde::Deserialize;
use serde_json::json;

use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub sku: Option<String>,
    pub qty: Option<f64>,
}

fn rejection(message: impl Into<String>) -> Json<serde_json::Value> {
    Json(json!({ "success": false, "message": message.into() }))
}

/// Rejection message for a raw snapshot that cannot be sold, status checked
/// before visibility.
fn snapshot_rejection(snapshot: &RawProductSnapshot) -> Option<String> {
    if !snapshot.is_enabled() {
        return Some(format!(
            "Product is not available for purchase (status: {})",
            snapshot.status
        ));
    }
    if !snapshot.is_visible_individually() {
        return Some("Product is not available for purchase (visibility issue)".to_string());
    }
    None
}

/// Second status check on the hydrated view. The snapshot and the hydrated
/// view read different scopes; a disagreement in the blocking direction wins.
fn hydrated_rejection(source: &ProductSource) -> Option<&'static str> {
    (source.status != Some(STATUS_ENABLED))
        .then_some("Product is not available for purchase (product status check failed)")
}

/// The response body for a completed add.
fn success_body(
    session: &SessionContext,
    snapshot: &RawProductSnapshot,
    sku: &str,
    summary: &CartSummary,
) -> serde_json::Value {
    json!({
        "success": true,
        "message": "Product added to cart successfully",
        "cart_count": summary.items_count,
        "cart_total": summary.grand_total,
        "product_name": snapshot.name,
        "sku": sku,
        "attribution_set": true,
        "is_customer": session.is_customer(),
        "customer_id": session.customer_id,
    })
}

/// POST /api/v1/cart/add
///
/// Validates the SKU against raw catalog storage before touching the cart.
/// The checks run strictly in order: request shape, raw snapshot existence,
/// enabled status, individual visibility, hydrated load, a second status
/// check on the hydrated view, then the cart mutation.
pub async fn add_to_cart(
    session: SessionContext,
    State(state): State<AppState>,
    Json(input): Json<AddToCartRequest>,
) -> Json<serde_json::Value> {
    let sku = input.sku.as_deref().map(str::trim).unwrap_or_default();
    let qty = input.qty.unwrap_or(1.0);
    tracing::info!(sku, qty, session_id = %session.session_id, "Cart add request received");

    if sku.is_empty() {
        return rejection("Product SKU is required");
    }
    if qty <= 0.0 {
        return rejection("Quantity must be greater than 0");
    }

    match add_to_cart_inner(&state, &session, sku, qty).await {
        Ok(body) => Json(body),
        Err(e) => {
            tracing::error!(sku, error = %e, "Unexpected error in cart add");
            rejection("Failed to add product to cart. Please try again.")
        }
    }
}

async fn add_to_cart_inner(
    state: &AppState,
    session: &SessionContext,
    sku: &str,
    qty: f64,
) -> Result<serde_json::Value, sqlx::Error> {
    let Some(snapshot) = CatalogRepo::snapshot(&state.pool, sku).await? else {
        return Ok(rejection("Product not found").0);
    };

    if let Some(message) = snapshot_rejection(&snapshot) {
        tracing::warn!(
            sku,
            status = snapshot.status,
            visibility = snapshot.visibility,
            "Product failed purchasability checks"
        );
        return Ok(rejection(message).0);
    }

    // Snapshot checks passed; hydrate the full entity for the cart line.
    let source = match ProductRepo::load_source(&state.pool, snapshot.entity_id).await {
        Ok(Some(source)) => source,
        Ok(None) => {
            tracing::error!(sku, product_id = snapshot.entity_id, "Product vanished during load");
            return Ok(rejection("Failed to load product: product no longer exists").0);
        }
        Err(e) => {
            tracing::error!(sku, product_id = snapshot.entity_id, error = %e, "Failed to load product");
            return Ok(rejection(format!("Failed to load product: {e}")).0);
        }
    };

    if let Some(message) = hydrated_rejection(&source) {
        tracing::warn!(sku, status = ?source.status, "Product status check failed");
        return Ok(rejection(message).0);
    }

    let summary = match add_item_flow(state, session, &snapshot, &source.name, source.price, qty)
        .await
    {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(sku, product_id = snapshot.entity_id, error = %e, "Failed to add product to cart");
            return Ok(rejection(format!("Failed to add product to cart: {e}")).0);
        }
    };

    state.attribution.set(&session.session_id, sku);
    tracing::info!(sku, product_id = snapshot.entity_id, "Product added to cart successfully");

    Ok(success_body(session, &snapshot, sku, &summary))
}

/// Upsert the quote line and recompute totals.
async fn add_item_flow(
    state: &AppState,
    session: &SessionContext,
    snapshot: &RawProductSnapshot,
    name: &Option<String>,
    price: Option<f64>,
    qty: f64,
) -> Result<CartSummary, sqlx::Error> {
    let quote =
        QuoteRepo::find_or_create(&state.pool, &session.session_id, session.customer_id).await?;
    QuoteRepo::add_item(
        &state.pool,
        quote.entity_id,
        snapshot.entity_id,
        &snapshot.sku,
        name.as_deref().unwrap_or(&snapshot.name),
        price.unwrap_or(0.0),
        qty,
    )
    .await?;
    QuoteRepo::refresh_totals(&state.pool, quote.entity_id).await
}

/// GET /api/v1/cart/count
///
/// Current cart badge data for the session. Failure degrades to an empty
/// cart shape rather than an HTTP error.
pub async fn get_cart_count(
    session: SessionContext,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    match QuoteRepo::find_by_session(&state.pool, &session.session_id).await {
        Ok(quote) => {
            let (count, total, currency) = match quote {
                Some(q) => (q.items_count, q.grand_total, q.currency_code),
                None => (0, 0.0, "USD".to_string()),
            };
            Json(json!({
                "success": true,
                "cart_count": count,
                "cart_total": total,
                "is_customer_logged_in": session.is_customer(),
                "customer_id": session.customer_id,
                "currency_code": currency,
            }))
        }
        Err(e) => {
            tracing::error!(session_id = %session.session_id, error = %e, "Failed to get cart information");
            Json(json!({
                "success": false,
                "message": "Failed to get cart information",
                "cart_count": 0,
                "cart_total": 0,
            }))
        }
    }
}
