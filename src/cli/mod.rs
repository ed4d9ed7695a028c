//! CLI module for dboptima
//!
//! Provides command-line interface for:
//! - upload: Store a query log
//! - analyze: Analyze stored queries
//! - explain: One-shot plan and recommendations for a statement
//! - apply / applied: Record and list applied indexes
//! - clear: Remove stored queries or applied indexes
//! - dashboard: Simulated performance metrics

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    analyze, applied, apply, clear, dashboard, explain, load_config, run, run_command, upload,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
