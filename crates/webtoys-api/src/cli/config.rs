//! `config show` command.

use anyhow::Result;
use console::style;

use crate::config::LoadedConfig;

/// Print the effective configuration. The store key is reported as set/unset only.
pub fn show(loaded: &LoadedConfig, json: bool) -> Result<()> {
    let key_status = if loaded.store_key.is_some() { "set" } else { "unset" };
    let source = loaded
        .source
        .as_ref()
        .map(|p| p.display().to_string());

    if json {
        let out = serde_json::json!({
            "source": source,
            "store_key": key_status,
            "config": loaded.relay,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style("Config source:").dim(),
        source.as_deref().unwrap_or("built-in defaults")
    );
    println!("  {} {}", style("Store key:").dim(), key_status);
    println!();
    print!("{}", toml::to_string_pretty(&loaded.relay)?);
    Ok(())
}
