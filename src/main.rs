// colmask - Rule-driven column anonymizer
// Copyright (c) 2025 colmask Contributors
// Licensed under the MIT License

use colmask::cli::{Cli, Commands};
use colmask::config::{load_config, ColmaskConfig, LoggingConfig};
use colmask::logging::init_logging;
use clap::Parser;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // `run` loads its config once, up front, so file logging can follow it.
    // A failed load is reported by the command after logging is up.
    let loaded = match &cli.command {
        Commands::Run(_) => Some(load_config(&cli.config)),
        _ => None,
    };
    let (config_level, logging_config) = match &loaded {
        Some(Ok(config)) => (
            Some(config.application.log_level.clone()),
            config.logging.clone(),
        ),
        _ => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "colmask - rule-driven column anonymizer"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        println!("\n⚠️  Shutdown signal received, completing current batch...");
        let _ = shutdown_tx.send(true);
    });

    let exit_code = match execute_command(&cli, loaded, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    drop(guard);
    process::exit(exit_code);
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    loaded: Option<colmask::domain::Result<ColmaskConfig>>,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => match loaded {
            Some(loaded) => {
                args.execute_loaded(&cli.config, loaded, shutdown_signal)
                    .await
            }
            None => args.execute(&cli.config, shutdown_signal).await,
        },
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
