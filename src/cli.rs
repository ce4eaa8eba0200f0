//! Command line options

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use crate::services::filename_parser::ParserMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "kanaplex",
    version,
    about = "Symlink downloaded episodes based on the '.kanaplex' config file."
)]
pub struct CliOptions {
    /// Directory where the torrent has been downloaded
    pub directory: PathBuf,

    /// Show what would be linked without touching the library
    #[arg(long)]
    pub dry_run: bool,

    /// Episode parser (tokens, strict or loose); overrides the config file
    #[arg(long, value_name = "MODE")]
    pub parser: Option<ParserMode>,

    /// Print the run summary as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,

    /// Diagnostic log format (written to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase diagnostic verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CliOptions {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "kanaplex=warn",
            1 => "kanaplex=info",
            2 => "kanaplex=debug",
            _ => "kanaplex=trace",
        }
    }
}

/// Check the download directory exists and return its absolute form
pub fn resolve_source_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        bail!("{} is not a valid directory.", dir.display());
    }
    dir.canonicalize()
        .with_context(|| format!("Failed to resolve {}", dir.display()))
}
