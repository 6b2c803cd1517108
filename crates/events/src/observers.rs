//! Lifecycle observers: single-shot reactions to commerce events.
//!
//! Each observer wraps its whole body in one catch-and-log boundary so a
//! webhook problem can never interrupt the commerce operation that
//! triggered it. The boolean result mirrors the dispatcher contract and is
//! informational only.

use std::sync::Arc;

use instavid_core::attribution::AttributionStore;
use instavid_core::formatter::{format_order, format_product};
use instavid_core::stores::{resolve_effective_store_id, ADMIN_STORE_ID};
use instavid_core::types::DbId;
use instavid_db::repositories::{OrderRepo, ProductRepo, StoreRepo};
use instavid_db::DbPool;

use crate::webhook::WebhookDispatcher;

/// Reacts to product save/delete and order placement.
pub struct LifecycleObservers {
    pool: DbPool,
    dispatcher: Arc<WebhookDispatcher>,
    attribution: Arc<AttributionStore>,
}

impl LifecycleObservers {
    pub fn new(
        pool: DbPool,
        dispatcher: Arc<WebhookDispatcher>,
        attribution: Arc<AttributionStore>,
    ) -> Self {
        Self {
            pool,
            dispatcher,
            attribution,
        }
    }

    /// A product was created or updated. Loads and formats the full product
    /// view and dispatches `product.created` or `product.updated`.
    ///
    /// A save arriving under the admin store scope is remapped to the first
    /// real store so the platform receives a concrete storefront id.
    pub async fn product_saved(&self, product_id: DbId, is_new: bool) -> bool {
        match self.product_saved_inner(product_id, is_new).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::error!(product_id, error = %e, "Error in product save observer");
                false
            }
        }
    }

    async fn product_saved_inner(
        &self,
        product_id: DbId,
        is_new: bool,
    ) -> Result<bool, sqlx::Error> {
        let Some(source) = ProductRepo::load_source(&self.pool, product_id).await? else {
            tracing::warn!(product_id, "Product not found for save webhook");
            return Ok(false);
        };

        let raw_store_id = source
            .store
            .as_ref()
            .and_then(|s| s.id)
            .unwrap_or(ADMIN_STORE_ID);
        let store_id = if raw_store_id == ADMIN_STORE_ID {
            let stores = StoreRepo::summaries(&self.pool).await?;
            resolve_effective_store_id(raw_store_id, &stores)
        } else {
            raw_store_id
        };

        let payload = format_product(&source);
        let sent = if is_new {
            self.dispatcher.send_product_created(&payload, store_id).await
        } else {
            self.dispatcher.send_product_updated(&payload, store_id).await
        };
        tracing::info!(
            product_id,
            sku = %payload.sku,
            store_id,
            is_new,
            sent,
            "Product save webhook triggered"
        );
        Ok(sent)
    }

    /// A product was deleted. No entity left to load, so the event carries
    /// only the identity the platform needs to drop its copy.
    pub async fn product_deleted(
        &self,
        product_id: DbId,
        sku: &str,
        name: &str,
        store_id: DbId,
    ) -> bool {
        let product = serde_json::json!({
            "id": product_id,
            "sku": sku,
            "name": name,
            "store_id": store_id,
        });
        let sent = self
            .dispatcher
            .send_product_deleted(product, store_id)
            .await;
        tracing::info!(product_id, sku, sent, "Product delete webhook triggered");
        sent
    }

    /// An order was placed. Formats the order with the session's attribution
    /// record attached and dispatches `order.placed`, then consumes the
    /// record when it was Instavid-sourced (one-shot attribution).
    pub async fn order_placed(&self, order_id: DbId, session_id: &str) -> bool {
        match self.order_placed_inner(order_id, session_id).await {
            Ok(sent) => sent,
            Err(e) => {
                tracing::error!(order_id, error = %e, "Error in order place observer");
                false
            }
        }
    }

    async fn order_placed_inner(
        &self,
        order_id: DbId,
        session_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let Some(source) = OrderRepo::load_source(&self.pool, order_id).await? else {
            tracing::warn!(order_id, "Order not found for placement webhook");
            return Ok(false);
        };

        let store_id = source.store_id.unwrap_or(ADMIN_STORE_ID);
        let attribution = self.attribution.get(session_id);
        let payload = format_order(&source, attribution.as_ref());
        let sent = self.dispatcher.send_order_placed(&payload, store_id).await;

        if attribution.is_some_and(|record| record.is_instavid()) {
            self.attribution.clear(session_id);
        }
        tracing::info!(order_id, store_id, sent, "Order placement webhook triggered");
        Ok(sent)
    }
}
