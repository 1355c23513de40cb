//! Server information command.

use anyhow::Result;
use console::style;

use webtoys_types::info::ServerInfo;

pub fn info(json: bool) -> Result<()> {
    let info = ServerInfo::current();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} v{}",
        style("⚡").bold(),
        style(&info.server_name).bold(),
        info.version
    );
    println!("  {}", info.description);
    println!("  {}", style(&info.website).cyan());
    println!();
    Ok(())
}
