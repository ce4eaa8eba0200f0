//! Directory scanner
//!
//! Walks the direct entries of a source or library directory, parses each
//! regular file's name and builds an [`EpisodeIndex`].

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::filename_parser::{EpisodeId, ParserMode};

/// Directory that exists but cannot be enumerated
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A regular file found during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: PathBuf,
    /// File name without directory and final extension
    #[serde(skip)]
    pub stem: String,
    /// Final extension without the leading dot
    #[serde(skip)]
    pub extension: Option<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        Self { path, stem, extension }
    }
}

/// One file per episode, keyed and iterated in episode order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeIndex {
    entries: BTreeMap<EpisodeId, FileEntry>,
}

impl EpisodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert with overwrite semantics; returns the entry that was replaced
    pub fn insert(&mut self, id: EpisodeId, entry: FileEntry) -> Option<FileEntry> {
        self.entries.insert(id, entry)
    }

    pub fn get(&self, id: &EpisodeId) -> Option<&FileEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &EpisodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for EpisodeIndex {
    type Item = (EpisodeId, FileEntry);
    type IntoIter = btree_map::IntoIter<EpisodeId, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(EpisodeId, FileEntry)> for EpisodeIndex {
    fn from_iter<I: IntoIterator<Item = (EpisodeId, FileEntry)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (id, entry) in iter {
            index.insert(id, entry);
        }
        index
    }
}

/// Index the regular files directly inside `dir`.
///
/// A missing directory yields an empty index. Subdirectories are not
/// descended into; symlinks count when they resolve to a regular file.
/// Entries are visited in file name order, so when two files map to the
/// same episode the later name replaces the earlier one.
pub fn scan_directory(dir: &Path, mode: ParserMode) -> Result<EpisodeIndex, ScanError> {
    let mut index = EpisodeIndex::new();

    if !dir.exists() {
        debug!(path = %dir.display(), "Directory does not exist, nothing to index");
        return Ok(index);
    }

    let walker = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // Failing to open the directory itself is fatal
            Err(source) if source.depth() == 0 => {
                return Err(ScanError::ReadDir { path: dir.to_path_buf(), source });
            }
            Err(e) => {
                // Broken symlinks and unreadable entries are skipped
                warn!(path = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }

        let file = FileEntry::new(entry.path());
        let Some(id) = mode.parse(&file.stem) else {
            debug!(path = %file.path.display(), "No episode identity in file name");
            continue;
        };

        if let Some(replaced) = index.insert(id, file) {
            debug!(
                episode = %id,
                replaced = %replaced.path.display(),
                "Duplicate episode, keeping later file"
            );
        }
    }

    info!(path = %dir.display(), count = index.len(), "Indexed episodes");

    Ok(index)
}
