//! Webhook delivery to the Instavid platform and the lifecycle observers
//! that feed it.
//!
//! [`webhook::WebhookDispatcher`] owns the HTTP side: envelope construction,
//! endpoint selection by event category, and the boolean delivery contract
//! (every failure is caught, logged, and reported as `false`).
//! [`observers::LifecycleObservers`] reacts to commerce lifecycle moments
//! (product saved/deleted, order placed) by loading and formatting the
//! affected entity and handing it to the dispatcher.

pub mod envelope;
pub mod observers;
pub mod webhook;
