//! Link materialization
//!
//! Creates one symlink per missing episode inside the series' library folder:
//! `{destination}/{name} - S01E05.{ext}` pointing at the downloaded file.
//! A failure on one episode is recorded and the batch carries on; links
//! already created are never rolled back.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::filename_parser::EpisodeId;
use super::reconciler::Reconciliation;
use crate::config::SeriesConfig;

/// The library folder could not be created; no episode can be linked
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to create destination directory {}: {source}", .path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to one missing episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkOutcome {
    Linked,
    AlreadyExists,
    Failed { reason: String },
    /// Dry run: the link would have been created
    Planned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub episode: EpisodeId,
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(flatten)]
    pub outcome: LinkOutcome,
}

/// Library file name for an episode: `{series} - {id}` plus the source extension
pub fn link_file_name(series: &str, id: EpisodeId, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{series} - {id}.{ext}"),
        _ => format!("{series} - {id}"),
    }
}

/// Link every missing episode into `series.destination`.
///
/// The destination directory is created first; if that fails nothing else is
/// attempted. With `dry_run` the filesystem is left untouched and every item
/// is reported as [`LinkOutcome::Planned`].
pub fn materialize(
    missing: &Reconciliation,
    series: &SeriesConfig,
    dry_run: bool,
) -> Result<Vec<LinkReport>, LinkError> {
    let destination = series.destination.as_path();

    if !dry_run && !missing.is_empty() {
        std::fs::create_dir_all(destination).map_err(|source| LinkError::CreateDestination {
            path: destination.to_path_buf(),
            source,
        })?;
    }

    let reports = missing
        .iter()
        .map(|(id, file)| {
            let link = destination.join(link_file_name(&series.name, *id, file.extension.as_deref()));
            let outcome = if dry_run {
                LinkOutcome::Planned
            } else {
                create_link(&file.path, &link)
            };

            LinkReport {
                episode: *id,
                source: file.path.clone(),
                destination: link,
                outcome,
            }
        })
        .collect::<Vec<_>>();

    let linked = reports
        .iter()
        .filter(|r| r.outcome == LinkOutcome::Linked)
        .count();
    info!(
        series = %series.name,
        destination = %destination.display(),
        requested = reports.len(),
        linked,
        dry_run,
        "Materialized episode links"
    );

    Ok(reports)
}

fn create_link(source: &Path, link: &Path) -> LinkOutcome {
    match symlink_file(source, link) {
        Ok(()) => {
            debug!(source = %source.display(), link = %link.display(), "Created symlink");
            LinkOutcome::Linked
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            warn!(link = %link.display(), "Link path already exists");
            LinkOutcome::AlreadyExists
        }
        Err(e) => {
            error!(
                source = %source.display(),
                link = %link.display(),
                error = %e,
                "Failed to create symlink"
            );
            LinkOutcome::Failed { reason: e.to_string() }
        }
    }
}

#[cfg(unix)]
fn symlink_file(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink_file(source: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, link)
}
