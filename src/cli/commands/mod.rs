//! CLI command implementations
//!
//! Each command returns the process exit code.

pub mod init;
pub mod run;
pub mod validate;
