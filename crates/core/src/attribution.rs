//! Session-scoped click-to-purchase attribution.
//!
//! A visitor arriving from an Instavid video carries `instavid_*` URL
//! parameters; the record built from them links a later cart action or
//! purchase back to the video click. Exactly one live record exists per
//! browsing session -- each capture overwrites, never merges -- and the
//! record dies with the session: entries older than the session lifetime
//! are invisible to reads and swept from the map on the next write.
//!
//! Attribution is best-effort by policy: nothing in this module may ever
//! break a checkout. Failures degrade to a logged no-op (`capture`/`set`),
//! `None` (`get`) or `false` (`has`).

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Attribution source label for all records written by this service.
pub const SOURCE_INSTAVID: &str = "instavid";

/// Carousel name recorded when the URL parameter is absent.
pub const DEFAULT_CAROUSEL_NAME: &str = "unknown";

/// Source label recorded when the URL parameter is absent.
pub const DEFAULT_INSTAVID_SOURCE: &str = "video_click";

/// Action recorded by the cart-add flow.
pub const ACTION_ADD_TO_CART: &str = "add_to_cart";

/// Inbound URL query parameter carrying the video id.
pub const PARAM_VIDEO_ID: &str = "instavid_video";

/// Inbound URL query parameter carrying the carousel name.
pub const PARAM_CAROUSEL: &str = "instavid_carousel";

/// Inbound URL query parameter carrying the source label.
pub const PARAM_SOURCE: &str = "instavid_source";

/// Seconds an attribution record stays live, mirroring the storefront's
/// default session lifetime. Expired records are invisible to reads and
/// swept on the next write, so abandoned sessions cannot accumulate.
pub const SESSION_TTL_SECS: i64 = 3600;

// ---------------------------------------------------------------------------
// CaptureParams
// ---------------------------------------------------------------------------

/// The three attribution URL parameters, as parsed from a page-visit query
/// string. Empty values are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureParams {
    #[serde(rename = "instavid_video")]
    pub video_id: Option<String>,
    #[serde(rename = "instavid_carousel")]
    pub carousel_name: Option<String>,
    #[serde(rename = "instavid_source")]
    pub source: Option<String>,
}

/// Normalize an optional parameter: empty strings count as absent.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// AttributionRecord
// ---------------------------------------------------------------------------

/// The single attribution record held for a browsing session.
///
/// Two shapes share this type: the page-visit capture (video id, carousel,
/// captured URL) and the cart-add record (sku, action). Absent fields are
/// omitted from the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributionRecord {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carousel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instavid_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Capture time, epoch seconds.
    pub timestamp: i64,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_url: Option<String>,
}

impl AttributionRecord {
    /// Build a record from page-visit URL parameters.
    ///
    /// Returns `None` when no video id is present -- a visit without a video
    /// id must not disturb any existing record.
    pub fn from_page_visit(
        params: &CaptureParams,
        session_id: &str,
        captured_url: &str,
        timestamp: i64,
    ) -> Option<Self> {
        let video_id = non_empty(&params.video_id)?;

        Some(Self {
            source: SOURCE_INSTAVID.to_string(),
            video_id: Some(video_id),
            carousel_name: Some(
                non_empty(&params.carousel_name)
                    .unwrap_or_else(|| DEFAULT_CAROUSEL_NAME.to_string()),
            ),
            instavid_source: Some(
                non_empty(&params.source).unwrap_or_else(|| DEFAULT_INSTAVID_SOURCE.to_string()),
            ),
            sku: None,
            action: None,
            timestamp,
            session_id: session_id.to_string(),
            captured_url: Some(captured_url.to_string()),
        })
    }

    /// Build the simpler cart-add record.
    pub fn from_cart_add(sku: &str, session_id: &str, timestamp: i64) -> Self {
        Self {
            source: SOURCE_INSTAVID.to_string(),
            video_id: None,
            carousel_name: None,
            instavid_source: None,
            sku: Some(sku.to_string()),
            action: Some(ACTION_ADD_TO_CART.to_string()),
            timestamp,
            session_id: session_id.to_string(),
            captured_url: None,
        }
    }

    /// Whether this record originated from an Instavid touchpoint.
    pub fn is_instavid(&self) -> bool {
        self.source == SOURCE_INSTAVID
    }

    /// Whether the record has outlived the session lifetime.
    pub fn is_expired(&self, now: i64) -> bool {
        now - self.timestamp > SESSION_TTL_SECS
    }
}

// ---------------------------------------------------------------------------
// AttributionStore
// ---------------------------------------------------------------------------

/// In-memory per-session attribution storage.
///
/// Keyed by session id. Each session is only mutated by the single request
/// currently serving that visitor, so the lock is held only for the map
/// operation itself. A poisoned lock degrades to the documented best-effort
/// behavior instead of panicking.
#[derive(Default)]
pub struct AttributionStore {
    records: RwLock<HashMap<String, AttributionRecord>>,
}

impl AttributionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture attribution from page-visit URL parameters.
    ///
    /// No-op when the parameters carry no video id; otherwise overwrites any
    /// existing record for the session.
    pub fn capture(&self, session_id: &str, captured_url: &str, params: &CaptureParams) {
        let timestamp = chrono::Utc::now().timestamp();
        let Some(record) = AttributionRecord::from_page_visit(
            params,
            session_id,
            captured_url,
            timestamp,
        ) else {
            return;
        };
        self.insert(session_id, record);
    }

    /// Record a cart-add attribution for the session, overwriting any
    /// existing record.
    pub fn set(&self, session_id: &str, sku: &str) {
        let timestamp = chrono::Utc::now().timestamp();
        let record = AttributionRecord::from_cart_add(sku, session_id, timestamp);
        self.insert(session_id, record);
    }

    /// The session's current record, if any. An expired record counts as
    /// absent.
    pub fn get(&self, session_id: &str) -> Option<AttributionRecord> {
        let now = chrono::Utc::now().timestamp();
        match self.records.read() {
            Ok(map) => map
                .get(session_id)
                .filter(|record| !record.is_expired(now))
                .cloned(),
            Err(_) => {
                tracing::warn!("Attribution store lock poisoned, returning no record");
                None
            }
        }
    }

    /// Remove the session's record.
    pub fn clear(&self, session_id: &str) {
        if let Ok(mut map) = self.records.write() {
            map.remove(session_id);
        } else {
            tracing::warn!("Attribution store lock poisoned, clear skipped");
        }
    }

    /// Whether the session currently has a record.
    pub fn has(&self, session_id: &str) -> bool {
        self.get(session_id).is_some()
    }

    fn insert(&self, session_id: &str, record: AttributionRecord) {
        match self.records.write() {
            Ok(mut map) => {
                map.retain(|_, existing| !existing.is_expired(record.timestamp));
                tracing::info!(
                    session_id,
                    source = %record.source,
                    "Attribution recorded"
                );
                map.insert(session_id.to_string(), record);
            }
            Err(_) => {
                tracing::warn!(session_id, "Attribution store lock poisoned, write skipped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_params(video: &str) -> CaptureParams {
        CaptureParams {
            video_id: Some(video.to_string()),
            carousel_name: None,
            source: None,
        }
    }

    #[test]
    fn capture_params_deserialize_from_documented_parameter_names() {
        let value = serde_json::json!({
            (PARAM_VIDEO_ID): "v1",
            (PARAM_CAROUSEL): "spring",
            (PARAM_SOURCE): "video_click",
        });
        let params: CaptureParams = serde_json::from_value(value).unwrap();
        assert_eq!(params.video_id.as_deref(), Some("v1"));
        assert_eq!(params.carousel_name.as_deref(), Some("spring"));
        assert_eq!(params.source.as_deref(), Some("video_click"));
    }

    #[test]
    fn capture_without_video_id_is_a_no_op() {
        let store = AttributionStore::new();
        store.set("s1", "ABC123");

        store.capture("s1", "https://shop.example/page", &CaptureParams::default());

        let record = store.get("s1").expect("existing record must survive");
        assert_eq!(record.sku.as_deref(), Some("ABC123"));
    }

    #[test]
    fn capture_with_empty_video_id_is_a_no_op() {
        let store = AttributionStore::new();
        let params = CaptureParams {
            video_id: Some("   ".into()),
            ..Default::default()
        };
        store.capture("s1", "https://shop.example/page", &params);
        assert!(!store.has("s1"));
    }

    #[test]
    fn capture_defaults_carousel_and_source() {
        let store = AttributionStore::new();
        store.capture("s1", "https://shop.example/p?instavid_video=v1", &video_params("v1"));

        let record = store.get("s1").unwrap();
        assert_eq!(record.source, SOURCE_INSTAVID);
        assert_eq!(record.video_id.as_deref(), Some("v1"));
        assert_eq!(record.carousel_name.as_deref(), Some(DEFAULT_CAROUSEL_NAME));
        assert_eq!(
            record.instavid_source.as_deref(),
            Some(DEFAULT_INSTAVID_SOURCE)
        );
        assert_eq!(record.session_id, "s1");
        assert_eq!(
            record.captured_url.as_deref(),
            Some("https://shop.example/p?instavid_video=v1")
        );
    }

    #[test]
    fn repeated_captures_overwrite_not_duplicate() {
        let store = AttributionStore::new();
        for _ in 0..5 {
            store.capture("s1", "https://shop.example/p", &video_params("v1"));
        }
        store.capture("s1", "https://shop.example/p", &video_params("v2"));

        let record = store.get("s1").unwrap();
        assert_eq!(record.video_id.as_deref(), Some("v2"));

        // Exactly one record for the session, none leaked elsewhere.
        assert!(store.has("s1"));
        assert!(!store.has("s2"));
    }

    #[test]
    fn set_writes_cart_add_shape() {
        let store = AttributionStore::new();
        store.set("s1", "ABC123");

        let record = store.get("s1").unwrap();
        assert_eq!(record.source, SOURCE_INSTAVID);
        assert_eq!(record.sku.as_deref(), Some("ABC123"));
        assert_eq!(record.action.as_deref(), Some(ACTION_ADD_TO_CART));
        assert!(record.video_id.is_none());
        assert!(record.captured_url.is_none());
    }

    #[test]
    fn set_overwrites_capture() {
        let store = AttributionStore::new();
        store.capture("s1", "https://shop.example/p", &video_params("v1"));
        store.set("s1", "ABC123");

        let record = store.get("s1").unwrap();
        assert_eq!(record.sku.as_deref(), Some("ABC123"));
        assert!(record.video_id.is_none());
    }

    #[test]
    fn clear_consumes_the_record() {
        let store = AttributionStore::new();
        store.set("s1", "ABC123");
        store.clear("s1");
        assert!(!store.has("s1"));
        assert_eq!(store.get("s1"), None);
    }

    #[test]
    fn sessions_are_isolated() {
        let store = AttributionStore::new();
        store.set("s1", "SKU-1");
        store.set("s2", "SKU-2");

        assert_eq!(store.get("s1").unwrap().sku.as_deref(), Some("SKU-1"));
        assert_eq!(store.get("s2").unwrap().sku.as_deref(), Some("SKU-2"));
        store.clear("s1");
        assert!(store.has("s2"));
    }

    #[test]
    fn serialized_record_omits_absent_fields() {
        let record = AttributionRecord::from_cart_add("ABC123", "s1", 1_700_000_000);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["source"], "instavid");
        assert_eq!(value["timestamp"], 1_700_000_000i64);
        assert!(value.get("video_id").is_none());
        assert!(value.get("carousel_name").is_none());
    }

    #[test]
    fn expired_record_is_invisible_to_reads() {
        let store = AttributionStore::new();
        let stale = AttributionRecord::from_cart_add(
            "OLD-1",
            "s-old",
            chrono::Utc::now().timestamp() - SESSION_TTL_SECS - 1,
        );
        store.records.write().unwrap().insert("s-old".into(), stale);

        assert!(!store.has("s-old"));
        assert_eq!(store.get("s-old"), None);
    }

    #[test]
    fn writes_sweep_abandoned_sessions() {
        let store = AttributionStore::new();
        let stale_ts = chrono::Utc::now().timestamp() - SESSION_TTL_SECS - 1;
        {
            let mut map = store.records.write().unwrap();
            for i in 0..1000 {
                let session = format!("abandoned-{i}");
                let record = AttributionRecord::from_cart_add("SKU", &session, stale_ts);
                map.insert(session, record);
            }
        }

        store.set("s-live", "ABC123");

        let map = store.records.read().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("s-live"));
    }

    #[test]
    fn fresh_records_survive_the_sweep() {
        let store = AttributionStore::new();
        store.set("s1", "SKU-1");
        store.set("s2", "SKU-2");

        assert_eq!(store.records.read().unwrap().len(), 2);
        assert!(store.has("s1"));
        assert!(store.has("s2"));
    }
}
