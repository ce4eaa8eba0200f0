//! End-to-end tests for a reconciliation run
//!
//! These tests drive the public API against real temporary directories:
//! - First run into a library folder that does not exist yet
//! - Re-running against unchanged folders
//! - Name collisions in the library
//! - Dry runs and configuration errors

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_matches::assert_matches;
use kanaplex::config::{CONFIG_FILENAME, ConfigError, SeriesConfig};
use kanaplex::services::{
    EpisodeId, LinkOutcome, ParserMode, RunOptions, SilentReporter, diff, run, scan_directory,
};
use pretty_assertions::assert_eq;

struct Fixture {
    _tmp: tempfile::TempDir,
    source: PathBuf,
    library: PathBuf,
}

impl Fixture {
    fn new(downloads: &[&str]) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("downloads").join("Frieren S01");
        let library = tmp.path().join("library").join("Frieren");
        fs::create_dir_all(&source).unwrap();

        for name in downloads {
            fs::write(source.join(name), name.as_bytes()).unwrap();
        }
        fs::write(
            source.join(CONFIG_FILENAME),
            format!("[settings]\nname = Frieren\ndestination = {}\n", library.display()),
        )
        .unwrap();

        Self { _tmp: tmp, source, library }
    }

    fn config(&self) -> SeriesConfig {
        SeriesConfig::load(&self.source).unwrap()
    }

    fn run(&self, dry_run: bool) -> kanaplex::services::RunSummary {
        run(&self.source, &self.config(), &RunOptions { dry_run }, &mut SilentReporter).unwrap()
    }

    fn library_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.library)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn link_target(path: &Path) -> PathBuf {
    fs::read_link(path).unwrap()
}

// ============================================================================
// Full runs
// ============================================================================

#[test]
fn test_first_run_creates_library_and_links() {
    let fx = Fixture::new(&[
        "[SubsPlease] Frieren - 01 (1080p).mkv",
        "Frieren.S01E02.1080p.WEB.mkv",
        "Frieren S1E3v2.mp4",
        "readme.txt",
    ]);

    let summary = fx.run(false);

    assert_eq!(summary.existing, 0);
    assert_eq!(summary.available, 2);
    assert_eq!(summary.linked(), 2);
    assert_eq!(
        fx.library_names(),
        vec!["Frieren - S01E02.mkv".to_string(), "Frieren - S01E03.mp4".to_string()]
    );
    assert_eq!(
        link_target(&fx.library.join("Frieren - S01E03.mp4")),
        fx.source.join("Frieren S1E3v2.mp4")
    );
}

#[test]
fn test_second_run_is_idempotent() {
    let fx = Fixture::new(&["Frieren - 05.mkv", "Frieren - 06.mkv"]);

    let first = fx.run(false);
    assert_eq!(first.linked(), 2);

    let second = fx.run(false);
    assert_eq!(second.existing, 2);
    assert_eq!(second.available, 2);
    assert_eq!(second.missing, 0);
    assert!(second.items.is_empty());
}

#[test]
fn test_existing_episode_under_any_name_is_not_relinked() {
    let fx = Fixture::new(&["Frieren S01E01.mkv", "Frieren S01E02.mkv"]);
    fs::create_dir_all(&fx.library).unwrap();
    fs::write(fx.library.join("frieren.s01e01.old.rip.avi"), b"old").unwrap();

    let summary = fx.run(false);

    assert_eq!(summary.existing, 1);
    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.items[0].episode, EpisodeId::new(1, 2));
}

#[test]
fn test_collision_is_reported_and_batch_continues() {
    let fx = Fixture::new(&["Frieren S01E01.mkv", "Frieren S01E02.mkv"]);
    fs::create_dir_all(&fx.library).unwrap();
    // Unparseable under the library index, but occupies the link path
    fs::create_dir(fx.library.join("Frieren - S01E01.mkv")).unwrap();

    let summary = fx.run(false);

    let outcomes: Vec<_> = summary.items.iter().map(|i| i.outcome.clone()).collect();
    assert_eq!(outcomes, vec![LinkOutcome::AlreadyExists, LinkOutcome::Linked]);
    assert_eq!(summary.already_existing(), 1);
    assert_eq!(summary.failed(), 0);
}

#[test]
fn test_dry_run_creates_nothing() {
    let fx = Fixture::new(&["Frieren S01E01.mkv"]);

    let summary = fx.run(true);

    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.items[0].outcome, LinkOutcome::Planned);
    assert!(!fx.library.exists());
}

#[test]
fn test_strict_parser_from_config() {
    let fx = Fixture::new(&["Frieren - 01.mkv", "Frieren S01E02.mkv"]);
    fs::write(
        fx.source.join(CONFIG_FILENAME),
        format!(
            "[settings]\nname = Frieren\ndestination = {}\nparser = strict\n",
            fx.library.display()
        ),
    )
    .unwrap();

    let summary = fx.run(false);
    assert_eq!(fx.config().parser, ParserMode::Strict);
    assert_eq!(fx.library_names(), vec!["Frieren - S01E02.mkv".to_string()]);
    assert_eq!(summary.available, 1);
}

#[test]
fn test_summary_serializes() {
    let fx = Fixture::new(&["Frieren S01E04.mkv"]);

    let summary = fx.run(true);
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["series"], "Frieren");
    assert_eq!(json["missing"], 1);
    assert_eq!(json["items"][0]["episode"], "S01E04");
    assert_eq!(json["items"][0]["status"], "planned");
}

// ============================================================================
// Building blocks
// ============================================================================

#[test]
fn test_reconciliation_of_scanned_folders() {
    let fx = Fixture::new(&["Frieren S01E01.mkv", "Frieren S01E02.mkv"]);
    fs::create_dir_all(&fx.library).unwrap();
    fs::write(fx.library.join("Frieren - S01E01.mkv"), b"x").unwrap();

    let available = scan_directory(&fx.source, ParserMode::Tokens).unwrap();
    let existing = scan_directory(&fx.library, ParserMode::Tokens).unwrap();
    let missing = diff(available, &existing);

    assert_eq!(missing.ids(), vec![EpisodeId::new(1, 2)]);
    let (_, file) = missing.iter().next().unwrap();
    assert_eq!(file.path, fx.source.join("Frieren S01E02.mkv"));
}

#[test]
fn test_missing_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    assert_matches!(
        SeriesConfig::load(tmp.path()),
        Err(ConfigError::MissingFile { .. })
    );
}

#[test]
fn test_config_error_message() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join(CONFIG_FILENAME), "[settings]\nname = Show\n").unwrap();

    let err = SeriesConfig::load(tmp.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required config key 'destination' in [settings]"
    );
}
