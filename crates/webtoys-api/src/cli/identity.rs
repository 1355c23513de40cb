//! Identity lookup command.

use anyhow::Result;
use console::style;

use webtoys_core::identity::IdentityMapper;
use webtoys_infra::digest::ConfiguredDigest;
use webtoys_types::config::RelayConfig;
use webtoys_types::identity::SyntheticIdentifier;

/// Map `token` with the configured digest. No network access.
pub fn identify(relay: &RelayConfig, token: Option<&str>) -> SyntheticIdentifier {
    IdentityMapper::new(ConfiguredDigest::from(relay.identity.digest)).map(token)
}

pub fn identity(relay: &RelayConfig, token: Option<&str>, json: bool) -> Result<()> {
    let id = identify(relay, token);

    if json {
        let out = serde_json::json!({
            "token": token,
            "identifier": id,
            "digest": relay.identity.digest.to_string(),
            "anonymous": id.is_sentinel(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", style(id.as_str()).cyan().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use webtoys_types::config::DigestKind;

    #[test]
    fn test_identify_uses_configured_digest() {
        let mut relay = RelayConfig::default();
        assert_eq!(identify(&relay, Some("default")).as_str(), "+19992196950");

        relay.identity.digest = DigestKind::Sha256;
        assert_eq!(identify(&relay, Some("alice")).as_str(), "+19992806970");
    }

    #[test]
    fn test_identify_anonymous() {
        let relay = RelayConfig::default();
        assert!(identify(&relay, None).is_sentinel());
        assert!(identify(&relay, Some("")).is_sentinel());
    }
}
