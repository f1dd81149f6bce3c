//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ColmaskConfig, OutputConfig, SourceConfig};
use super::secret::secret_string;
use crate::domain::errors::AnonymizeError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ColmaskConfig
/// 4. Applies environment variable overrides (COLMASK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Every failure is reported as [`AnonymizeError::Configuration`].
///
/// # Examples
///
/// ```no_run
/// use colmask::config::loader::load_config;
///
/// let config = load_config("colmask.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ColmaskConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymizeError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymizeError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses and validates configuration from a TOML string
///
/// Environment substitution and overrides are applied the same way as in
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<ColmaskConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ColmaskConfig = toml::from_str(&contents)
        .map_err(|e| AnonymizeError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        AnonymizeError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AnonymizeError::Configuration(e.to_string()))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymizeError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using COLMASK_* prefix
///
/// Environment variables follow the pattern: COLMASK_<SECTION>_<KEY>.
/// Source keys only apply to the source type that has them.
fn apply_env_overrides(config: &mut ColmaskConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("COLMASK_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("COLMASK_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Source overrides
    match &mut config.source {
        SourceConfig::Csv(csv) => {
            if let Ok(val) = std::env::var("COLMASK_SOURCE_PATH") {
                csv.path = val;
            }
        }
        SourceConfig::Postgres(pg) => {
            if let Ok(val) = std::env::var("COLMASK_SOURCE_URI") {
                pg.uri = secret_string(val);
            }
            if let Ok(val) = std::env::var("COLMASK_SOURCE_PAGE_SIZE") {
                if let Ok(size) = val.parse() {
                    pg.page_size = size;
                }
            }
        }
    }

    // Output overrides
    match &mut config.output {
        OutputConfig::Csv(csv) => {
            if let Ok(val) = std::env::var("COLMASK_OUTPUT_PATH") {
                csv.path = val;
            }
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("COLMASK_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COLMASK_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
