//! Source/library reconciliation
//!
//! Decides which downloaded episodes the library is missing. Only the episode
//! identity matters: whichever file sits behind an existing identity is never
//! compared against the download.

use super::filename_parser::EpisodeId;
use super::scanner::{EpisodeIndex, FileEntry};

/// Episodes available in the source but absent from the library, in episode order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    missing: Vec<(EpisodeId, FileEntry)>,
}

impl Reconciliation {
    pub fn len(&self) -> usize {
        self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(EpisodeId, FileEntry)> {
        self.missing.iter()
    }

    pub fn ids(&self) -> Vec<EpisodeId> {
        self.missing.iter().map(|(id, _)| *id).collect()
    }
}

/// Set difference `available - existing` by episode identity
pub fn diff(available: EpisodeIndex, existing: &EpisodeIndex) -> Reconciliation {
    let missing = available
        .into_iter()
        .filter(|(id, _)| !existing.contains(id))
        .collect();

    Reconciliation { missing }
}
