//! Kanaplex - symlink newly downloaded episodes into a media library

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kanaplex::cli::{CliOptions, LogFormat, resolve_source_dir};
use kanaplex::config::SeriesConfig;
use kanaplex::services::{ConsoleReporter, Reporter, RunOptions, SilentReporter, run};

fn main() -> anyhow::Result<()> {
    let cli = CliOptions::parse();
    init_tracing(&cli);

    let source = resolve_source_dir(&cli.directory)?;

    let mut series = SeriesConfig::load(&source)?;
    if let Some(parser) = cli.parser {
        series.parser = parser;
    }

    let mut console = ConsoleReporter;
    let mut silent = SilentReporter;
    let reporter: &mut dyn Reporter = if cli.json {
        &mut silent
    } else {
        println!("[kanaplex v{}] {}", env!("CARGO_PKG_VERSION"), series.name);
        &mut console
    };

    let options = RunOptions { dry_run: cli.dry_run };
    let summary = run(&source, &series, &options, reporter)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays readable (or parseable with --json)
fn init_tracing(cli: &CliOptions) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_directive().into());

    let registry = tracing_subscriber::registry().with(filter);
    match cli.log_format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
