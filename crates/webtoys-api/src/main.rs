//! Webtoys relay CLI and HTTP tool server entry point.
//!
//! Binary name: `webtoys-relay`
//!
//! Parses CLI arguments, loads configuration, wires the orchestrator to its
//! downstream adapters, then runs a one-shot command or serves the tools
//! over HTTP.

mod cli;
mod config;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands, ConfigCommand};
use config::{ServerOverrides, load_config};
use state::AppState;
use webtoys_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let tracing_options = TracingOptions {
        json: cli.log_json,
        otel: cli.otel,
        ..TracingOptions::default()
    }
    .with_verbosity(cli.verbose, cli.quiet);
    init_tracing(&tracing_options).map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let server = match &cli.command {
        Commands::Serve { port, host } => ServerOverrides {
            host: host.clone(),
            port: *port,
        },
        _ => ServerOverrides::default(),
    };

    // Static info needs no configuration at all.
    if let Commands::Info = cli.command {
        return cli::info::info(cli.json);
    }

    let loaded = load_config(&cli.config, &server)?;

    match cli.command {
        Commands::Info => unreachable!("handled above"),

        Commands::Identity { token } => {
            cli::identity::identity(&loaded.relay, token.as_deref(), cli.json)?;
        }

        Commands::Config {
            action: ConfigCommand::Show,
        } => {
            cli::config::show(&loaded, cli.json)?;
        }

        Commands::Build {
            description,
            user_id,
        } => {
            let state = AppState::init(loaded)?;
            let shutdown = state.shutdown.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown.cancel();
            });
            cli::build::build(&state, &description, user_id.as_deref(), cli.json).await?;
        }

        Commands::Serve { .. } => {
            let state = AppState::init(loaded)?;
            let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                %addr,
                webhook = %state.config.downstream.webhook_base_url,
                store = %state.config.downstream.store_base_url,
                max_concurrent_builds = state.config.server.max_concurrent_builds,
                "tool server starting"
            );
            if !cli.quiet {
                println!(
                    "  {} Webtoys relay listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let shutdown = state.shutdown.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_signal().await;
                    // Ends in-flight poll loops.
                    shutdown.cancel();
                })
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
