//! HTTP request handlers.

pub mod health;
pub mod mcp;
pub mod tools;
