use std::sync::Arc;

use instavid_core::attribution::AttributionStore;
use instavid_events::observers::LifecycleObservers;
use instavid_events::webhook::WebhookDispatcher;

use crate::config::{InstavidConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: instavid_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Integration configuration (widget assets, webhook settings).
    pub instavid: Arc<InstavidConfig>,
    /// Per-session attribution records.
    pub attribution: Arc<AttributionStore>,
    /// Webhook dispatcher.
    pub dispatcher: Arc<WebhookDispatcher>,
    /// Lifecycle observers reacting to commerce events.
    pub observers: Arc<LifecycleObservers>,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// State over a lazy pool that never connects; every query fails,
    /// which is what the degradation tests exercise.
    pub(crate) fn test_state() -> AppState {
        let pool = instavid_db::DbPool::connect_lazy("postgres://localhost:1/unreachable")
            .expect("lazy pool");
        let attribution = Arc::new(AttributionStore::new());
        let dispatcher = Arc::new(WebhookDispatcher::new(Default::default()));
        let observers = Arc::new(LifecycleObservers::new(
            pool.clone(),
            Arc::clone(&dispatcher),
            Arc::clone(&attribution),
        ));
        AppState {
            pool,
            config: Arc::new(ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                cors_origins: vec![],
                request_timeout_secs: 30,
            }),
            instavid: Arc::new(InstavidConfig {
                widget_enabled: true,
                environment: crate::config::ENVIRONMENT_DEVELOPMENT.into(),
                js_url_override: None,
                css_url_override: None,
                carousel_height: 594,
                carousel_autoplay: false,
                carousel_loop: false,
                webhook_enabled: false,
                webhook_url: None,
            }),
            attribution,
            dispatcher,
            observers,
        }
    }
}
