//! Command-line argument definitions for the Memstack CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Memstack layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input memory map (comma-separated rows)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output layout file (JSON)
    #[arg(short, long, default_value = "layout.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
