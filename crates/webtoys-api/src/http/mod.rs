//! HTTP tool server.
//!
//! Direct JSON endpoints under `/tools/`, a stateless MCP endpoint at `/mcp`,
//! and `/health`.

pub mod error;
pub mod handlers;
pub mod router;
