//! Business logic and port trait definitions for the Webtoys relay.
//!
//! This crate defines the "ports" (dispatcher, artifact store, token digest)
//! that the infrastructure layer implements, plus the correlation-and-poll
//! protocol built on top of them. It depends only on `webtoys-types` --
//! never on `webtoys-infra` or any HTTP crate.

pub mod classify;
pub mod dispatch;
pub mod identity;
pub mod orchestrator;
pub mod poller;
pub mod store;
