//! Lifecycle ingress: the host platform calls these after its own commit.
//!
//! Each endpoint validates its input, hands off to the matching observer,
//! and acknowledges with 202 regardless of the webhook outcome. The
//! `webhook_sent` flag in the body is informational; observer failures
//! never propagate to the caller.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use instavid_core::types::DbId;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::session::SessionContext;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ProductSavedRequest {
    #[validate(range(min = 1))]
    pub product_id: DbId,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductDeletedRequest {
    #[validate(range(min = 1))]
    pub product_id: DbId,
    #[validate(length(min = 1))]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub store_id: DbId,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderPlacedRequest {
    #[validate(range(min = 1))]
    pub order_id: DbId,
}

/// POST /api/v1/lifecycle/product-saved
pub async fn product_saved(
    State(state): State<AppState>,
    Json(input): Json<ProductSavedRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let sent = state
        .observers
        .product_saved(input.product_id, input.is_new)
        .await;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "accepted": true, "webhook_sent": sent })),
    ))
}

/// POST /api/v1/lifecycle/product-deleted
pub async fn product_deleted(
    State(state): State<AppState>,
    Json(input): Json<ProductDeletedRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let sent = state
        .observers
        .product_deleted(input.product_id, &input.sku, &input.name, input.store_id)
        .await;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "accepted": true, "webhook_sent": sent })),
    ))
}

/// POST /api/v1/lifecycle/order-placed
///
/// The session context ties the order back to the visitor's attribution
/// record; the storefront forwards the session id of the checkout.
pub async fn order_placed(
    session: SessionContext,
    State(state): State<AppState>,
    Json(input): Json<OrderPlacedRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let sent = state
        .observers
        .order_placed(input.order_id, &session.session_id)
        .await;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "accepted": true, "webhook_sent": sent })),
    ))
}
