//! Page-visit attribution capture.
//!
//! Runs on every request. When the query string carries an
//! `instavid_video` parameter, the visit is recorded against the caller's
//! session; without one the capture is a no-op and any existing record is
//! left untouched. Requests without a session id are skipped entirely:
//! a record written under a generated id could never be read back.

use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use instavid_core::attribution::CaptureParams;

use crate::session::session_id_from_headers;
use crate::state::AppState;

pub async fn capture_attribution(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(session_id) = session_id_from_headers(request.headers()) {
        if let Ok(Query(params)) = Query::<CaptureParams>::try_from_uri(request.uri()) {
            let url = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| request.uri().path().to_string());
            state.attribution.capture(&session_id, &url, &params);
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_support::test_state;

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/page", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                capture_attribution,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn visit_with_video_id_writes_a_record() {
        let state = test_state();
        let app = app(state.clone());

        let request = Request::builder()
            .uri("/page?instavid_video=vid-9&instavid_carousel=spring")
            .header("X-Session-Id", "sess-1")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap();

        let record = state.attribution.get("sess-1").expect("record captured");
        assert_eq!(record.video_id.as_deref(), Some("vid-9"));
        assert_eq!(record.carousel_name.as_deref(), Some("spring"));
        assert_eq!(
            record.captured_url.as_deref(),
            Some("/page?instavid_video=vid-9&instavid_carousel=spring")
        );
    }

    #[tokio::test]
    async fn visit_without_video_id_leaves_existing_record() {
        let state = test_state();
        let app = app(state.clone());

        let first = Request::builder()
            .uri("/page?instavid_video=vid-9")
            .header("X-Session-Id", "sess-1")
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(first).await.unwrap();

        let second = Request::builder()
            .uri("/page")
            .header("X-Session-Id", "sess-1")
            .body(Body::empty())
            .unwrap();
        app.oneshot(second).await.unwrap();

        let record = state.attribution.get("sess-1").expect("record kept");
        assert_eq!(record.video_id.as_deref(), Some("vid-9"));
    }

    #[tokio::test]
    async fn visit_without_session_id_is_skipped() {
        let state = test_state();
        let app = app(state.clone());

        let request = Request::builder()
            .uri("/page?instavid_video=vid-9")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap();

        assert!(state.attribution.get("sess-1").is_none());
    }
}
