//! Run command implementation
//!
//! This module implements the `run` command, which anonymizes the
//! configured source into the configured output.

use crate::config::{load_config, ColmaskConfig};
use crate::core::Pipeline;
use crate::domain::Result;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Read and transform every batch without writing output
    #[arg(long)]
    pub dry_run: bool,

    /// Seed for the fake and shuffle methods
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        self.execute_loaded(config_path, load_config(config_path), shutdown_signal)
            .await
    }

    /// Execute the run command with the outcome of an earlier config load
    pub async fn execute_loaded(
        &self,
        config_path: &str,
        loaded: Result<ColmaskConfig>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let mut config = match loaded {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(e.exit_code());
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(seed) = self.seed {
            tracing::info!(seed, "Using seed from CLI");
            config.application.seed = Some(seed);
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No output will be written");
            println!();
        }

        let pipeline = match Pipeline::from_config(&config).await {
            Ok(p) => p.with_shutdown(shutdown_signal),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize pipeline");
                eprintln!("Failed to initialize run: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("🚀 Starting anonymization...");
        println!();

        let summary = match pipeline.run().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                eprintln!("Run failed: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("📊 {summary}");

        let exit_code = if summary.interrupted {
            println!("⚠️  Run interrupted. Output contains the batches already written.");
            tracing::info!("Run interrupted by user signal");
            130
        } else if summary.is_clean() {
            println!("✅ Run completed successfully!");
            0
        } else {
            println!("✅ Run completed with {} warning(s)", summary.warnings.len());
            0
        };

        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs::default();
        assert!(!args.dry_run);
        assert!(args.seed.is_none());
    }

    #[tokio::test]
    async fn test_missing_config_exits_with_configuration_code() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");
        let (_tx, rx) = watch::channel(false);

        let code = RunArgs::default()
            .execute(path.to_str().unwrap(), rx)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    fn write_run_config(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
        let input = temp_dir.path().join("in.csv");
        let output = temp_dir.path().join("out.csv");
        std::fs::write(&input, "id,name\n1,John\n2,Alice\n").unwrap();

        let config_path = temp_dir.path().join("colmask.toml");
        std::fs::write(
            &config_path,
            format!(
                r#"
[source]
type = "csv"
path = "{}"

[output]
type = "csv"
path = "{}"

[[rules]]
column = "name"
method = "mask_right"
n_chars = 2
mask_char = "*"
"#,
                input.display(),
                output.display()
            ),
        )
        .unwrap();
        (config_path, output)
    }

    #[tokio::test]
    async fn test_run_csv_to_csv() {
        let temp_dir = TempDir::new().unwrap();
        let (config_path, output) = write_run_config(&temp_dir);

        let (_tx, rx) = watch::channel(false);
        let code = RunArgs::default()
            .execute(config_path.to_str().unwrap(), rx)
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "id,name\n1,Jo**\n2,Ali**\n"
        );
    }
    #[tokio::test]
    async fn test_execute_loaded_uses_given_config() {
        let temp_dir = TempDir::new().unwrap();
        let (config_path, output) = write_run_config(&temp_dir);
        let loaded = load_config(&config_path);
        std::fs::remove_file(&config_path).unwrap();

        let (_tx, rx) = watch::channel(false);
        let code = RunArgs::default()
            .execute_loaded(config_path.to_str().unwrap(), loaded, rx)
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_execute_loaded_reports_load_error() {
        let (_tx, rx) = watch::channel(false);
        let loaded = crate::config::parse_config("[source]\ntype = \"csv\"\n");
        assert!(loaded.is_err());

        let code = RunArgs::default()
            .execute_loaded("colmask.toml", loaded, rx)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
