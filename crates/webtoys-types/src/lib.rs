//! Shared domain types for the Webtoys relay.
//!
//! This crate contains the types that flow between the relay's layers:
//! synthetic identifiers, the outbound build request, downstream artifact
//! records, the terminal build result, configuration, and error enums.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod artifact;
pub mod config;
pub mod error;
pub mod identity;
pub mod info;
pub mod request;
pub mod result;
