//! Startup configuration loading.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file, then
//! environment variables and CLI flags (clap resolves those two). The
//! result is validated once and injected; nothing else reads the
//! environment.

use std::path::PathBuf;

use anyhow::Context;
use secrecy::SecretString;

use webtoys_types::config::RelayConfig;

use crate::cli::ConfigArgs;

/// Effective configuration plus the secrets kept out of `RelayConfig`.
#[derive(Debug)]
pub struct LoadedConfig {
    pub relay: RelayConfig,
    /// Content-store service key; `None` when not provided.
    pub store_key: Option<SecretString>,
    /// File the configuration was read from, if any.
    pub source: Option<PathBuf>,
}

/// Server bind overrides from `serve --host/--port` (or `HOST`/`PORT`).
#[derive(Debug, Default, Clone)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub fn load_config(args: &ConfigArgs, server: &ServerOverrides) -> anyhow::Result<LoadedConfig> {
    let mut relay = match &args.config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<RelayConfig>(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => RelayConfig::default(),
    };

    apply_overrides(&mut relay, args, server);
    relay.validate()?;

    let store_key = args
        .store_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(SecretString::from);

    Ok(LoadedConfig {
        relay,
        store_key,
        source: args.config_path.clone(),
    })
}

fn apply_overrides(relay: &mut RelayConfig, args: &ConfigArgs, server: &ServerOverrides) {
    if let Some(url) = &args.webhook_url {
        relay.downstream.webhook_base_url = url.clone();
    }
    if let Some(url) = &args.store_url {
        relay.downstream.store_base_url = url.clone();
    }
    if let Some(host) = &server.host {
        relay.server.host = host.clone();
    }
    if let Some(port) = server.port {
        relay.server.port = port;
    }
}
