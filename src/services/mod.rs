//! Episode reconciliation services

pub mod filename_parser;
pub mod linker;
pub mod pipeline;
pub mod reconciler;
pub mod report;
pub mod scanner;

pub use filename_parser::{EpisodeId, ParseModeError, ParserMode, parse_episode_id};
pub use linker::{LinkError, LinkOutcome, LinkReport, link_file_name, materialize};
pub use pipeline::{RunOptions, RunSummary, run};
pub use reconciler::{Reconciliation, diff};
pub use report::{ConsoleReporter, Reporter, SilentReporter};
pub use scanner::{EpisodeIndex, FileEntry, ScanError, scan_directory};
