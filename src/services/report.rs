//! Operator-facing narration of a run
//!
//! Kept apart from logging: the scanner, reconciler and linker never print,
//! the pipeline hands what happened to a [`Reporter`].

use super::linker::{LinkOutcome, LinkReport};

pub trait Reporter {
    fn destination_scanned(&mut self, count: usize);
    fn source_scanned(&mut self, count: usize);
    fn nothing_to_link(&mut self);
    fn links_planned(&mut self, count: usize);
    fn item(&mut self, report: &LinkReport);
}

/// Prints progress to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn destination_scanned(&mut self, count: usize) {
        println!("  - Found {count} episode(s) in the library.");
    }

    fn source_scanned(&mut self, count: usize) {
        println!("  - Found {count} episode(s) in the download folder.");
    }

    fn nothing_to_link(&mut self) {
        println!("No new episodes to symlink.");
    }

    fn links_planned(&mut self, count: usize) {
        println!("  - Found {count} episode(s) to symlink:");
    }

    fn item(&mut self, report: &LinkReport) {
        let source = report.source.display();
        let destination = report.destination.display();
        match &report.outcome {
            LinkOutcome::Linked => {
                println!("    * {source}");
                println!("      -> {destination}");
            }
            LinkOutcome::Planned => {
                println!("    * {source}");
                println!("      -> {destination} (dry run)");
            }
            LinkOutcome::AlreadyExists => {
                println!("    * Error: symlink already exists: {destination}");
            }
            LinkOutcome::Failed { reason } => {
                println!("    * Error creating symlink for {source}: {reason}");
            }
        }
    }
}

/// Discards narration (JSON output, tests)
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn destination_scanned(&mut self, _count: usize) {}
    fn source_scanned(&mut self, _count: usize) {}
    fn nothing_to_link(&mut self) {}
    fn links_planned(&mut self, _count: usize) {}
    fn item(&mut self, _report: &LinkReport) {}
}
