//! HTTP surface of the Instavid storefront bridge.
//!
//! Thin axum handlers over the repositories in `instavid-db` and the
//! dispatcher/observers in `instavid-events`. Error mapping lives in
//! [`error`], the per-request session identity in [`session`], and the
//! page-visit attribution capture in [`middleware::attribution`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod session;
pub mod state;
