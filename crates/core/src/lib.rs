//! Instavid storefront bridge -- domain core.
//!
//! Pure domain types and logic shared by the database, events, and API
//! crates:
//!
//! - [`attribution`] -- per-session click-to-purchase attribution records
//!   and the in-memory [`attribution::AttributionStore`].
//! - [`catalog`] -- product value model (status/visibility), the raw
//!   catalog snapshot used by the cart-add validation path, and the
//!   partial [`catalog::ProductSource`] view.
//! - [`sales`] -- partial order/address views.
//! - [`formatter`] -- total mappings from source views to the webhook wire
//!   payloads.
//! - [`stores`] -- store scope policy (admin store id remapping).

pub mod attribution;
pub mod catalog;
pub mod error;
pub mod formatter;
pub mod sales;
pub mod stores;
pub mod types;
