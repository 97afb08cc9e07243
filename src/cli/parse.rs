//! CLI parse: clap types for tinvoke. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tinvoke CLI - typed command dispatch tooling
#[derive(Parser)]
#[command(name = "tinvoke")]
#[command(about = "Inspect call-shape resolution and emit route declarations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show how positional values would be split into arguments and options
    Explain {
        /// Command name
        command: String,
        /// Positional values, each a JSON document
        values: Vec<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write the route declaration file
    Declare {
        /// Output directory (defaults to [declaration].out_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Module name to augment (defaults to [declaration].module_name)
        #[arg(long)]
        module_name: Option<String>,
    },
}
