//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the colmask configuration file.

use crate::adapters::postgresql::client::redact_uri;
use crate::config::{load_config, ColmaskConfig, SourceConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                print_summary(&config);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(e.exit_code())
            }
        }
    }
}

fn print_summary(config: &ColmaskConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);

    match &config.source {
        SourceConfig::Csv(csv) => {
            println!("  Source: CSV file {}", csv.path);
            println!("  Separator: '{}'", csv.separator);
        }
        SourceConfig::Postgres(pg) => {
            println!(
                "  Source: PostgreSQL {}",
                redact_uri(pg.uri.expose_secret().as_ref())
            );
            println!("  Table: {}", pg.table);
            println!("  Page Size: {}", pg.page_size);
            println!("  Max Connections: {}", pg.max_connections);
        }
    }
    println!("  Output: {}", config.output.kind());

    println!("  Rules: {}", config.rules.len());
    for (i, rule) in config.rules.iter().enumerate() {
        println!("    {}. {} -> {}", i + 1, rule.column, rule.transform.method());
    }
    println!();
}
