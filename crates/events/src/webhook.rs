//! Webhook dispatch to the Instavid platform.
//!
//! The dispatcher never surfaces an error to its caller: every outcome is a
//! boolean, and anything that goes wrong on the wire is logged with event
//! and store context. Delivery is a single attempt; the platform reconciles
//! missed events through periodic product sync, so there is no retry queue.

use std::time::Duration;

use instavid_core::formatter::{OrderPayload, ProductPayload};
use instavid_core::types::DbId;
use serde::Serialize;

use crate::envelope::{route_for_event, Route, WebhookEnvelope, HEADER_EVENT, HEADER_STORE};

/// HTTP request timeout for a delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Dispatcher configuration: the admin-facing enabled flag and the base
/// endpoint URL.
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
}

/// Configuration snapshot for the admin status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationStatus {
    pub enabled: bool,
    pub endpoint_configured: bool,
    pub webhook_url: Option<String>,
    pub status: &'static str,
}

/// Outcome of an admin-triggered connectivity test.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityReport {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    pub endpoint: Option<String>,
}

// ---------------------------------------------------------------------------
// WebhookDispatcher
// ---------------------------------------------------------------------------

/// Sends event envelopes to the configured Instavid endpoint.
pub struct WebhookDispatcher {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookDispatcher {
    /// Create a dispatcher with a pre-configured HTTP client.
    pub fn new(config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Whether dispatch is possible: the flag is on and an endpoint is set.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
            && self
                .config
                .endpoint
                .as_deref()
                .is_some_and(|e| !e.is_empty())
    }

    /// Send event data to the platform.
    ///
    /// Returns `true` only when the endpoint answered with a 2xx status.
    /// Disabled configuration, unroutable event categories, transport
    /// failures, and non-2xx responses are all logged and reported `false`.
    pub async fn send(
        &self,
        data: serde_json::Value,
        event_type: &str,
        store_id: DbId,
    ) -> bool {
        if !self.is_enabled() {
            tracing::info!(event = event_type, "Webhooks are disabled or not configured");
            return false;
        }
        // is_enabled guarantees a non-empty endpoint.
        let base = self.config.endpoint.as_deref().unwrap_or_default();

        let url = match route_for_event(base, event_type) {
            Route::Url(url) => url,
            Route::Unimplemented => {
                tracing::info!(
                    event = event_type,
                    store_id,
                    "Order webhook endpoint not implemented yet"
                );
                return false;
            }
        };

        let envelope = WebhookEnvelope::new(event_type, store_id, data);
        tracing::debug!(event = event_type, store_id, url, "Sending webhook");

        let response = self
            .client
            .post(&url)
            .header(HEADER_EVENT, event_type)
            .header(HEADER_STORE, store_id.to_string())
            .json(&envelope)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    event = event_type,
                    store_id,
                    error = %e,
                    "Webhook request failed"
                );
                return false;
            }
        };

        let code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        if (200..300).contains(&code) {
            tracing::info!(
                event = event_type,
                store_id,
                response_code = code,
                "Webhook successful"
            );
            true
        } else {
            tracing::error!(
                event = event_type,
                store_id,
                response_code = code,
                response_body = %body,
                "Webhook failed"
            );
            false
        }
    }

    // -----------------------------------------------------------------------
    // Typed wrappers
    // -----------------------------------------------------------------------

    pub async fn send_product_created(&self, product: &ProductPayload, store_id: DbId) -> bool {
        let data = serde_json::json!({"action": "create", "product": product_value(product)});
        self.send(data, "product.created", store_id).await
    }

    pub async fn send_product_updated(&self, product: &ProductPayload, store_id: DbId) -> bool {
        let data = serde_json::json!({"action": "update", "product": product_value(product)});
        self.send(data, "product.updated", store_id).await
    }

    /// The deleted entity no longer exists, so the caller passes whatever
    /// identity it captured before the delete committed.
    pub async fn send_product_deleted(&self, product: serde_json::Value, store_id: DbId) -> bool {
        let data = serde_json::json!({"action": "delete", "product": product});
        self.send(data, "product.deleted", store_id).await
    }

    /// Re-send an already-formatted product under an arbitrary action.
    pub async fn send_product_sync(
        &self,
        product: serde_json::Value,
        action: &str,
        store_id: DbId,
    ) -> bool {
        let event_type = format!("product.{action}");
        let data = serde_json::json!({"action": action, "product": product});
        self.send(data, &event_type, store_id).await
    }

    pub async fn send_order_placed(&self, order: &OrderPayload, store_id: DbId) -> bool {
        let data = serde_json::to_value(order).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error serializing order payload");
            serde_json::json!({"entity_id": order.entity_id, "order_id": order.order_id})
        });
        self.send(data, "order.placed", store_id).await
    }

    pub async fn send_customer_registered(
        &self,
        customer: serde_json::Value,
        store_id: DbId,
    ) -> bool {
        self.send(customer, "customer.registered", store_id).await
    }

    pub async fn send_customer_login(&self, customer: serde_json::Value, store_id: DbId) -> bool {
        self.send(customer, "customer.login", store_id).await
    }

    pub async fn send_cart_updated(&self, cart: serde_json::Value, store_id: DbId) -> bool {
        self.send(cart, "cart.updated", store_id).await
    }

    pub async fn send_video_viewed(&self, video: serde_json::Value, store_id: DbId) -> bool {
        self.send(video, "video.viewed", store_id).await
    }

    pub async fn send_video_interaction(
        &self,
        interaction: serde_json::Value,
        store_id: DbId,
    ) -> bool {
        self.send(interaction, "video.interaction", store_id).await
    }

    // -----------------------------------------------------------------------
    // Admin surface
    // -----------------------------------------------------------------------

    /// POST a small test body straight to the base endpoint.
    pub async fn test_connectivity(&self) -> ConnectivityReport {
        let endpoint = self.config.endpoint.clone();
        if !self.is_enabled() {
            return ConnectivityReport {
                success: false,
                message: "Webhooks are disabled or not configured".into(),
                response_code: None,
                response_body: None,
                endpoint,
            };
        }
        let base = self.config.endpoint.as_deref().unwrap_or_default();

        let body = serde_json::json!({
            "test": true,
            "timestamp": chrono::Utc::now().timestamp(),
            "message": "Connectivity test",
        });
        let response = self
            .client
            .post(base)
            .header(HEADER_EVENT, "test.connectivity")
            .json(&body)
            .send()
            .await;

        match response {
            Ok(response) => {
                let code = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                let success = (200..300).contains(&code);
                ConnectivityReport {
                    success,
                    message: if success {
                        "Webhook connectivity test successful".into()
                    } else {
                        "Webhook connectivity test failed".into()
                    },
                    response_code: Some(code),
                    response_body: Some(body),
                    endpoint,
                }
            }
            Err(e) => ConnectivityReport {
                success: false,
                message: format!("Webhook connectivity test exception: {e}"),
                response_code: None,
                response_body: None,
                endpoint,
            },
        }
    }

    /// Configuration snapshot for the admin status endpoint.
    pub fn configuration_status(&self) -> ConfigurationStatus {
        ConfigurationStatus {
            enabled: self.config.enabled,
            endpoint_configured: self
                .config
                .endpoint
                .as_deref()
                .is_some_and(|e| !e.is_empty()),
            webhook_url: self.config.endpoint.clone(),
            status: if self.is_enabled() {
                "ready"
            } else {
                "not_configured"
            },
        }
    }
}

/// Serialize a product payload, degrading to the minimal shape on failure
/// so a formatting problem never suppresses the event entirely.
fn product_value(product: &ProductPayload) -> serde_json::Value {
    match serde_json::to_value(product) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Error formatting product data");
            ProductPayload::minimal(product.id, &product.sku, &product.name, &e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn dispatcher(enabled: bool, endpoint: Option<&str>) -> WebhookDispatcher {
        WebhookDispatcher::new(WebhookConfig {
            enabled,
            endpoint: endpoint.map(String::from),
        })
    }

    /// Accept one connection, consume the full request, answer with `status`.
    async fn one_shot_server(status: u16) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 65536];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
                let Some(header_end) =
                    buf[..read].windows(4).position(|w| w == b"\r\n\r\n")
                else {
                    continue;
                };
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length: usize = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0);
                if read >= header_end + 4 + content_length {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {status} X\r\nContent-Length: 0\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn disabled_dispatcher_returns_false() {
        let d = dispatcher(false, Some("http://127.0.0.1:1"));
        assert!(!d.send(serde_json::json!({}), "product.created", 1).await);
    }

    #[tokio::test]
    async fn missing_endpoint_returns_false() {
        let d = dispatcher(true, None);
        assert!(!d.send(serde_json::json!({}), "product.created", 1).await);
        let d = dispatcher(true, Some(""));
        assert!(!d.send(serde_json::json!({}), "cart.updated", 1).await);
    }

    #[tokio::test]
    async fn order_events_return_false_without_a_request() {
        // Port 1 would fail fast if a request were attempted; the order
        // route short-circuits before any connection.
        let d = dispatcher(true, Some("http://127.0.0.1:1"));
        let order = instavid_core::formatter::format_order(
            &instavid_core::sales::OrderSource::default(),
            None,
        );
        assert!(!d.send_order_placed(&order, 1).await);
    }

    #[tokio::test]
    async fn transport_error_returns_false() {
        let d = dispatcher(true, Some("http://127.0.0.1:1"));
        assert!(!d.send(serde_json::json!({"id": 1}), "product.created", 1).await);
    }

    #[tokio::test]
    async fn two_hundred_response_returns_true() {
        let base = one_shot_server(200).await;
        let d = dispatcher(true, Some(&base));
        assert!(d.send(serde_json::json!({"id": 1}), "cart.updated", 1).await);
    }

    #[tokio::test]
    async fn request_carries_event_headers_and_envelope() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 65536];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
                let Some(header_end) =
                    buf[..read].windows(4).position(|w| w == b"\r\n\r\n")
                else {
                    continue;
                };
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length: usize = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(0);
                if read >= header_end + 4 + content_length {
                    break;
                }
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
            socket.flush().await.unwrap();
            tx.send(String::from_utf8_lossy(&buf[..read]).to_string())
                .unwrap();
        });

        let d = dispatcher(true, Some(&format!("http://{addr}")));
        assert!(
            d.send_product_sync(serde_json::json!({"id": 7, "sku": "ABC123"}), "sync", 3)
                .await
        );

        let request = rx.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("POST /wh/magento/product-sync HTTP/1.1"));
        let head = head.to_lowercase();
        assert!(head.contains("x-instavid-event: product.sync"));
        assert!(head.contains("x-instavid-store: 3"));
        assert!(head.contains("content-type: application/json"));

        let envelope: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(envelope["event"], "product.sync");
        assert_eq!(envelope["store_id"], 3);
        assert_eq!(envelope["platform"], "magento2");
        assert_eq!(envelope["version"], "1.0.0");
        assert_eq!(envelope["data"]["action"], "sync");
        assert_eq!(envelope["data"]["product"]["sku"], "ABC123");
    }

    #[tokio::test]
    async fn five_hundred_response_returns_false() {
        let base = one_shot_server(500).await;
        let d = dispatcher(true, Some(&base));
        assert!(!d.send(serde_json::json!({"id": 1}), "cart.updated", 1).await);
    }

    #[tokio::test]
    async fn connectivity_test_reports_disabled_config() {
        let d = dispatcher(false, None);
        let report = d.test_connectivity().await;
        assert!(!report.success);
        assert_eq!(report.message, "Webhooks are disabled or not configured");
        assert_eq!(report.response_code, None);
    }

    #[tokio::test]
    async fn connectivity_test_reports_success() {
        let base = one_shot_server(200).await;
        let d = dispatcher(true, Some(&base));
        let report = d.test_connectivity().await;
        assert!(report.success);
        assert_eq!(report.response_code, Some(200));
    }

    #[test]
    fn configuration_status_reflects_enabled_and_endpoint() {
        let d = dispatcher(true, Some("http://x"));
        let status = d.configuration_status();
        assert!(status.enabled);
        assert!(status.endpoint_configured);
        assert_eq!(status.status, "ready");

        let d = dispatcher(true, None);
        assert_eq!(d.configuration_status().status, "not_configured");

        let d = dispatcher(false, Some("http://x"));
        assert_eq!(d.configuration_status().status, "not_configured");
    }
}
