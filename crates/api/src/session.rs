//! Per-request session identity.
//!
//! The storefront forwards the visitor's browsing session id in the
//! `X-Session-Id` header (or the `instavid_session` cookie); an optional
//! customer id arrives in `X-Customer-Id`, set by the storefront's auth
//! proxy. Customer authentication itself is the host platform's concern.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use instavid_core::types::DbId;

pub const SESSION_HEADER: &str = "x-session-id";
pub const SESSION_COOKIE: &str = "instavid_session";
pub const CUSTOMER_HEADER: &str = "x-customer-id";

/// The visitor identity attached to a request.
///
/// Extraction never fails: a request with no session id gets a freshly
/// generated one, scoping any attribution it writes to itself.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub customer_id: Option<DbId>,
}

impl SessionContext {
    pub fn is_customer(&self) -> bool {
        self.customer_id.is_some()
    }
}

/// Session id from the header or cookie, if the request carries one.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);
    from_header.or_else(|| session_id_from_cookie(headers))
}

fn session_id_from_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            (name.trim() == SESSION_COOKIE).then(|| value.trim().to_string())
        })
        .find(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session_id = session_id_from_headers(&parts.headers)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let customer_id = parts
            .headers
            .get(CUSTOMER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<DbId>().ok());
        Ok(Self {
            session_id,
            customer_id,
        })
    }
}
