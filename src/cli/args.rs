//! CLI argument definitions using clap
//!
//! Commands:
//! - dboptima upload <file> --config <path>
//! - dboptima analyze --config <path>
//! - dboptima explain --sql <text> --config <path>
//! - dboptima apply --query <key> --recommendation <id> --config <path>
//! - dboptima applied --config <path>
//! - dboptima clear [--applied] --config <path>
//! - dboptima dashboard --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dboptima - SQL workload analyzer and index advisor
#[derive(Parser, Debug)]
#[command(name = "dboptima")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a query log (.txt or .csv, one statement per line)
    Upload {
        /// Query log to upload
        file: PathBuf,

        /// Path to configuration file
        #[arg(long, default_value = "./dboptima.json")]
        config: PathBuf,
    },

    /// Analyze every uploaded query
    Analyze {
        /// Path to configuration file
        #[arg(long, default_value = "./dboptima.json")]
        config: PathBuf,
    },

    /// Show the plan and recommendations for a single statement
    Explain {
        /// SQL statement to explain
        #[arg(long)]
        sql: String,

        /// Path to configuration file
        #[arg(long, default_value = "./dboptima.json")]
        config: PathBuf,
    },

    /// Record a recommendation from the last analysis as applied
    Apply {
        /// Query key as reported by `analyze`
        #[arg(long)]
        query: String,

        /// Recommendation id within that query
        #[arg(long)]
        recommendation: u32,

        /// Path to configuration file
        #[arg(long, default_value = "./dboptima.json")]
        config: PathBuf,
    },

    /// List applied indexes
    Applied {
        /// Path to configuration file
        #[arg(long, default_value = "./dboptima.json")]
        config: PathBuf,
    },

    /// Remove uploaded queries, or applied indexes with --applied
    Clear {
        /// Clear applied indexes instead of queries
        #[arg(long)]
        applied: bool,

        /// Path to configuration file
        #[arg(long, default_value = "./dboptima.json")]
        config: PathBuf,
    },

    /// Show simulated performance metrics
    Dashboard {
        /// Path to configuration file
        #[arg(long, default_value = "./dboptima.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
