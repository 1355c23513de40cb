//! Infrastructure layer for the Webtoys relay.
//!
//! Contains implementations of the port traits defined in `webtoys-core`:
//! the reqwest webhook dispatcher, the PostgREST content-store client, and
//! the MD5 / SHA-256 token digests.

pub mod digest;
pub mod store;
pub mod webhook;

/// User-Agent sent on every downstream request.
pub(crate) const USER_AGENT: &str = concat!("webtoys-relay/", env!("CARGO_PKG_VERSION"));
