//! One reconciliation run for a single series
//!
//! Library scan, download scan, diff, then link. Each run builds fresh
//! indices; nothing is shared between runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::linker::{self, LinkOutcome, LinkReport};
use super::reconciler;
use super::report::Reporter;
use super::scanner::scan_directory;
use crate::config::SeriesConfig;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
}

/// What a run found and did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub series: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Episodes already in the library
    pub existing: usize,
    /// Episodes found in the download folder
    pub available: usize,
    /// Episodes the library lacks
    pub missing: usize,
    pub items: Vec<LinkReport>,
}

impl RunSummary {
    pub fn linked(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Linked))
    }

    pub fn already_existing(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::AlreadyExists))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&LinkOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

/// Link the episodes in `source` that `series.destination` does not have yet
pub fn run(
    source: &Path,
    series: &SeriesConfig,
    options: &RunOptions,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary> {
    info!(
        series = %series.name,
        source = %source.display(),
        destination = %series.destination.display(),
        parser = %series.parser,
        dry_run = options.dry_run,
        "Starting run"
    );

    let existing = scan_directory(&series.destination, series.parser)
        .context("Failed to scan library directory")?;
    reporter.destination_scanned(existing.len());

    let available =
        scan_directory(source, series.parser).context("Failed to scan download directory")?;
    reporter.source_scanned(available.len());

    let (existing_count, available_count) = (existing.len(), available.len());
    let missing = reconciler::diff(available, &existing);

    let mut summary = RunSummary {
        series: series.name.clone(),
        source: source.to_path_buf(),
        destination: series.destination.clone(),
        existing: existing_count,
        available: available_count,
        missing: missing.len(),
        items: Vec::new(),
    };

    if missing.is_empty() {
        reporter.nothing_to_link();
        return Ok(summary);
    }

    reporter.links_planned(missing.len());
    summary.items = linker::materialize(&missing, series, options.dry_run)
        .with_context(|| format!("Cannot link episodes for '{}'", series.name))?;

    for item in &summary.items {
        reporter.item(item);
    }

    info!(
        series = %series.name,
        linked = summary.linked(),
        already_existing = summary.already_existing(),
        failed = summary.failed(),
        "Run complete"
    );

    Ok(summary)
}
