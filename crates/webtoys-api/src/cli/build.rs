//! One-shot build command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Run a single build invocation and print its result.
///
/// Exits non-zero when the build reports `success: false`.
pub async fn build(
    state: &AppState,
    description: &str,
    user_id: Option<&str>,
    json: bool,
) -> Result<()> {
    let sender = state.orchestrator.identify(user_id);
    if !json {
        println!();
        println!(
            "  {} Sending build request as {}",
            style("📨").bold(),
            style(sender.as_str()).cyan()
        );
        if state.orchestrator.classifier().is_artifact_producing(description) {
            println!(
                "  {}",
                style(format!(
                    "Waiting up to {}s for the app to be published...",
                    state.config.poll.max_wait_ms / 1000
                ))
                .dim()
            );
        }
    }

    let result = state.run_build(description, user_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        if result.success {
            println!("  {} {}", style("✓").green(), result.summary());
            if let Some(url) = &result.app_url {
                println!("  {}", style(url).cyan().underlined());
            }
        } else {
            println!("  {} {}", style("✗").red(), result.summary());
        }
        println!();
    }

    if !result.success {
        anyhow::bail!(result.error.unwrap_or_else(|| "build failed".to_string()));
    }
    Ok(())
}
