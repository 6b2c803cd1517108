//! Admin surface for the webhook dispatcher.

use axum::extract::State;
use axum::Json;
use instavid_events::webhook::{ConfigurationStatus, ConnectivityReport};

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/webhook/status
pub async fn webhook_status(
    State(state): State<AppState>,
) -> Json<DataResponse<ConfigurationStatus>> {
    Json(DataResponse {
        data: state.dispatcher.configuration_status(),
    })
}

/// POST /api/v1/admin/webhook/test
///
/// Fires a connectivity probe at the configured endpoint and reports the
/// outcome; never an HTTP error, the report carries the failure.
pub async fn test_webhook(State(state): State<AppState>) -> Json<DataResponse<ConnectivityReport>> {
    let report = state.dispatcher.test_connectivity().await;
    tracing::info!(success = report.success, "Webhook connectivity test run");
    Json(DataResponse { data: report })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_support::test_state;

    fn app() -> Router {
        Router::new()
            .route("/admin/webhook/status", get(webhook_status))
            .route("/admin/webhook/test", post(test_webhook))
            .with_state(test_state())
    }

    #[tokio::test]
    async fn status_reports_unconfigured_dispatcher() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/admin/webhook/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["status"], "not_configured");
        assert_eq!(body["data"]["endpoint_configured"], false);
    }

    #[tokio::test]
    async fn connectivity_test_reports_failure_as_data() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/webhook/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"]["success"], false);
    }
}
