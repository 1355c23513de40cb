//! Relay configuration types.
//!
//! `RelayConfig` is built once at startup (TOML file, then environment and
//! CLI overrides in the binary) and handed to each component. Business logic
//! never reads the environment itself. All fields have defaults so an empty
//! file is a valid configuration.
//!
//! The content-store API key is not part of this struct: it is wrapped in a
//! secret type by the infrastructure layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level relay configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub downstream: DownstreamConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl RelayConfig {
    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("downstream.webhook_base_url", &self.downstream.webhook_base_url)?;
        check_url("downstream.store_base_url", &self.downstream.store_base_url)?;
        check_url("downstream.public_base_url", &self.downstream.public_base_url)?;
        check_url(
            "downstream.fallback_profile_url",
            &self.downstream.fallback_profile_url,
        )?;

        if !self.dispatch.webhook_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "dispatch.webhook_path",
                "must start with '/'",
            ));
        }
        if self.downstream.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "downstream.request_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::invalid(
                "poll.interval_ms",
                "must be greater than zero",
            ));
        }
        if self.poll.max_wait_ms == 0 {
            return Err(ConfigError::invalid(
                "poll.max_wait_ms",
                "must be greater than zero",
            ));
        }
        // An empty trigger would classify every description as artifact-producing.
        if self
            .classifier
            .trigger_keywords
            .iter()
            .any(|k| k.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                "classifier.trigger_keywords",
                "keywords must not be empty",
            ));
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("'{value}' is not an http(s) URL"),
        ))
    }
}

/// Where the downstream collaborators live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownstreamConfig {
    /// Base URL of the SMS/app-builder service (`WEBTOYS_API_URL`).
    #[serde(default = "default_webhook_base_url")]
    pub webhook_base_url: String,
    /// Base URL of the PostgREST content store (`SUPABASE_URL`).
    #[serde(default = "default_store_base_url")]
    pub store_base_url: String,
    /// Table holding published artifacts.
    #[serde(default = "default_store_table")]
    pub store_table: String,
    /// Public site that serves artifacts at `/<user_slug>/<app_slug>`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Profile page returned when the artifact is not ready in time.
    #[serde(default = "default_fallback_profile_url")]
    pub fallback_profile_url: String,
    /// Per-request HTTP timeout for both downstream clients.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_webhook_base_url() -> String {
    "https://smsbot-production.up.railway.app".to_string()
}

fn default_store_base_url() -> String {
    "http://127.0.0.1:54321".to_string()
}

fn default_store_table() -> String {
    "wtaf_content".to_string()
}

fn default_public_base_url() -> String {
    "https://webtoys.ai".to_string()
}

fn default_fallback_profile_url() -> String {
    "https://webtoys.ai/roastedcod".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            webhook_base_url: default_webhook_base_url(),
            store_base_url: default_store_base_url(),
            store_table: default_store_table(),
            public_base_url: default_public_base_url(),
            fallback_profile_url: default_fallback_profile_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DownstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Fixed fields of the emulated inbound-SMS webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// `To` field: the number the downstream bot listens on.
    #[serde(default = "default_recipient")]
    pub recipient: String,
    #[serde(default = "default_account_sid")]
    pub account_sid: String,
    /// `MessageSid` is `<prefix>_<UTC timestamp>`.
    #[serde(default = "default_message_sid_prefix")]
    pub message_sid_prefix: String,
    #[serde(default = "default_num_media")]
    pub num_media: String,
    /// Treat non-404 error statuses as dispatch failures instead of acks.
    #[serde(default)]
    pub strict_status: bool,
}

fn default_webhook_path() -> String {
    "/dev/webhook".to_string()
}

fn default_recipient() -> String {
    "+16502797459".to_string()
}

fn default_account_sid() -> String {
    "AC_POKE".to_string()
}

fn default_message_sid_prefix() -> String {
    "SM_POKE".to_string()
}

fn default_num_media() -> String {
    "0".to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            webhook_path: default_webhook_path(),
            recipient: default_recipient(),
            account_sid: default_account_sid(),
            message_sid_prefix: default_message_sid_prefix(),
            num_media: default_num_media(),
            strict_status: false,
        }
    }
}

/// Poll window timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

fn default_initial_delay_ms() -> u64 {
    3_000
}

fn default_interval_ms() -> u64 {
    2_000
}

fn default_max_wait_ms() -> u64 {
    45_000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            interval_ms: default_interval_ms(),
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

impl PollConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

/// Trigger substrings for the "is this artifact-producing" heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_trigger_keywords")]
    pub trigger_keywords: Vec<String>,
}

fn default_trigger_keywords() -> Vec<String> {
    ["app", "game", "build", "create", "meme", "wtaf"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            trigger_keywords: default_trigger_keywords(),
        }
    }
}

/// Digest used to derive synthetic identifiers.
///
/// Changing this changes every non-anonymous identifier, so existing
/// downstream profiles stop matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestKind {
    #[default]
    Md5,
    Sha256,
}

impl std::fmt::Display for DigestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestKind::Md5 => write!(f, "md5"),
            DigestKind::Sha256 => write!(f, "sha256"),
        }
    }
}

impl std::str::FromStr for DigestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(DigestKind::Md5),
            "sha256" => Ok(DigestKind::Sha256),
            other => Err(format!(
                "invalid digest '{other}'. Valid values: md5, sha256"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub digest: DigestKind,
}

/// Inbound tool server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on concurrent dispatch/poll pairs; 0 disables the bound.
    #[serde(default = "default_max_concurrent_builds")]
    pub max_concurrent_builds: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_concurrent_builds() -> usize {
    32
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_concurrent_builds: default_max_concurrent_builds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_config_default_values() {
        let config = RelayConfig::default();
        assert_eq!(
            config.downstream.webhook_base_url,
            "https://smsbot-production.up.railway.app"
        );
        assert_eq!(config.dispatch.recipient, "+16502797459");
        assert_eq!(config.poll.initial_delay(), Duration::from_secs(3));
        assert_eq!(config.poll.interval(), Duration::from_secs(2));
        assert_eq!(config.poll.max_wait(), Duration::from_secs(45));
        assert_eq!(config.identity.digest, DigestKind::Md5);
        assert_eq!(config.server.port, 8000);
        assert!(config.classifier.trigger_keywords.contains(&"meme".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relay_config_deserialize_empty() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config, RelayConfig::default());
    }

    #[test]
    fn test_relay_config_deserialize_with_values() {
        let toml_str = r#"
[downstream]
webhook_base_url = "http://localhost:3030"
store_base_url = "https://abc.supabase.co"

[dispatch]
strict_status = true

[poll]
max_wait_ms = 10000

[classifier]
trigger_keywords = ["toy"]

[identity]
digest = "sha256"

[server]
port = 9000
max_concurrent_builds = 0
"#;
        let config: RelayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.downstream.webhook_base_url, "http://localhost:3030");
        assert_eq!(config.downstream.store_table, "wtaf_content");
        assert!(config.dispatch.strict_status);
        assert_eq!(config.poll.max_wait_ms, 10_000);
        assert_eq!(config.poll.interval_ms, 2_000);
        assert_eq!(config.classifier.trigger_keywords, vec!["toy".to_string()]);
        assert_eq!(config.identity.digest, DigestKind::Sha256);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_concurrent_builds, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = RelayConfig::default();
        config.poll.interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll.interval_ms"));
    }

    #[test]
    fn test_validate_rejects_zero_request_timeout() {
        let mut config = RelayConfig::default();
        config.downstream.request_timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("downstream.request_timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = RelayConfig::default();
        config.downstream.store_base_url = "localhost:54321".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_keyword() {
        let mut config = RelayConfig::default();
        config.classifier.trigger_keywords.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_digest_kind_from_str() {
        assert_eq!("MD5".parse::<DigestKind>().unwrap(), DigestKind::Md5);
        assert_eq!("sha256".parse::<DigestKind>().unwrap(), DigestKind::Sha256);
        assert!("crc32".parse::<DigestKind>().is_err());
    }
}
