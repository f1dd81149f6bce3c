//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "colmask.toml")]
    pub output: String,

    /// Include every method and the PostgreSQL source, with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing colmask configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            generate_config_with_examples()
        } else {
            generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your source, output and rules", self.output);
                println!("  2. For PostgreSQL, put the connection URI in .env as COLMASK_PG_URI");
                println!("  3. Validate configuration: colmask validate-config");
                println!("  4. Preview the run: colmask run --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}

/// Generate minimal configuration
pub fn generate_minimal_config() -> &'static str {
    r#"# colmask configuration

[application]
log_level = "info"
dry_run = false

[source]
type = "csv"
path = "data.csv"
separator = ","

[output]
type = "csv"
path = "anonymized.csv"
separator = ","

[[rules]]
column = "email"
method = "fake"
faker_type = "email"

[[rules]]
column = "name"
method = "mask_right"
n_chars = 2
mask_char = "*"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
}

/// Generate configuration with examples and comments
pub fn generate_config_with_examples() -> &'static str {
    r##"# colmask configuration
#
# Rules run in the order they are declared. A rule whose column is missing
# from the data is skipped with a warning.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Read and transform everything, write nothing
dry_run = false

# Seed for the fake and shuffle methods (omit for a fresh seed per run)
# seed = 42

# ============================================================================
# Source
# ============================================================================
[source]
type = "csv"
path = "data.csv"
separator = ","
# Rows sampled to infer column types
infer_schema_rows = 100

# PostgreSQL table read in LIMIT/OFFSET pages
# [source]
# type = "postgres"
# uri = "${COLMASK_PG_URI}"
# table = "public.customers"
# order_by = "id"
# page_size = 10000
# max_connections = 4
# connection_timeout_seconds = 30
# statement_timeout_seconds = 60

# ============================================================================
# Output
# ============================================================================
[output]
type = "csv"
path = "anonymized.csv"
separator = ","

# ============================================================================
# Rules
# ============================================================================

# Hex digest of value + salt: md5, sha1, sha224, sha256, sha384, sha512,
# sha512_224, sha512_256, sha3_224, sha3_256, sha3_384, sha3_512, blake2b, blake2s
[[rules]]
column = "customer_id"
method = "hash"
algorithm = "sha256"
salt = "change-me"

# Synthetic value (email, firstname, lastname, fullname)
[[rules]]
column = "email"
method = "fake"
faker_type = "email"

# Keep the first characters, mask the last n_chars
[[rules]]
column = "last_name"
method = "mask_right"
n_chars = 2
mask_char = "*"

# Mask the first n_chars, keep the rest
[[rules]]
column = "phone"
method = "mask_left"
n_chars = 6
mask_char = "#"

# Replace every value with a constant
[[rules]]
column = "notes"
method = "destroy"
replace_with = "CONFIDENTIAL"

# Substitute digits and letters through a random one-to-one mapping
[[rules]]
column = "account_code"
method = "shuffle"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"
# daily, hourly or never
local_rotation = "daily"
"##
}
