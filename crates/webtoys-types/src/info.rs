//! Static server metadata returned by `get_info`.

use serde::{Deserialize, Serialize};

pub const SERVER_NAME: &str = "Webtoys Builder MCP";
pub const SERVER_DESCRIPTION: &str = "Build web apps via SMS with Webtoys.ai";
pub const SERVER_WEBSITE: &str = "https://webtoys.ai";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub server_name: String,
    pub version: String,
    pub description: String,
    pub website: String,
}

impl ServerInfo {
    /// Metadata for this build. Holds no state; every call is identical.
    pub fn current() -> Self {
        Self {
            server_name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: SERVER_DESCRIPTION.to_string(),
            website: SERVER_WEBSITE.to_string(),
        }
    }
}
