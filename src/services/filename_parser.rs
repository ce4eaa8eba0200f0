//! Episode identity parser for downloaded release names
//!
//! Recovers a season/episode pair from names like:
//! - "Show.Name.S01E05.1080p"
//! - "Show Name - 07"
//! - "[Group] Show S2E3v2"
//!
//! The default [`ParserMode::Tokens`] heuristic tolerates the widest range of
//! naming conventions. [`ParserMode::Strict`] and [`ParserMode::Loose`] are
//! regex-based alternatives selected explicitly through configuration.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::trace;

/// Canonical (season, episode) pair, rendered as `S01E05`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpisodeId {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeId {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}

impl Serialize for EpisodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which heuristic turns a base name into an [`EpisodeId`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParserMode {
    /// Token splitting heuristic (reference behavior)
    #[default]
    Tokens,
    /// Only an explicit `S<n>E<n>` marker is accepted
    Strict,
    /// `S<n>E<n>`, then an `E`/`EP`/`Episode` number, then a trailing number
    Loose,
}

impl ParserMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Strict => "strict",
            Self::Loose => "loose",
        }
    }

    /// Parse a base name (no directory, no extension)
    pub fn parse(&self, base_name: &str) -> Option<EpisodeId> {
        let parsed = match self {
            Self::Tokens => parse_episode_id(base_name),
            Self::Strict => parse_strict(base_name),
            Self::Loose => parse_loose(base_name),
        };

        trace!(
            base_name = base_name,
            mode = self.as_str(),
            episode = ?parsed,
            "Parsed base name"
        );

        parsed
    }

    /// Parse a file name or path, ignoring the directory and final extension
    pub fn parse_file_name(&self, file_name: &str) -> Option<EpisodeId> {
        let stem = Path::new(file_name).file_stem()?.to_string_lossy();
        self.parse(&stem)
    }
}

impl fmt::Display for ParserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown parser mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parser mode '{0}' (expected tokens, strict or loose)")]
pub struct ParseModeError(pub String);

impl FromStr for ParserMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tokens" => Ok(Self::Tokens),
            "strict" => Ok(Self::Strict),
            "loose" => Ok(Self::Loose),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Token splitting heuristic.
///
/// `.`, `-` and whitespace separate tokens. The first token carrying both an
/// `s` and an `e` that yields two numbers wins outright. Otherwise separate
/// `s<n>` / `e<n>` tokens are collected, a trailing numeric token stands in
/// for a missing episode, and the season defaults to 1. Without an episode
/// number the name is unparseable.
pub fn parse_episode_id(base_name: &str) -> Option<EpisodeId> {
    let normalized = base_name.replace(['.', '-'], " ");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    let mut season = None;
    let mut episode = None;

    for token in &tokens {
        let lower = token.to_lowercase();

        if lower.contains('s') && lower.contains('e') {
            // Malformed combined tokens ("Series", "es01") fall through to the next token
            if let Some(id) = parse_combined(&lower) {
                return Some(id);
            }
        } else if let Some(n) = lower.strip_prefix('s').and_then(parse_number) {
            season = Some(n);
        } else if let Some(n) = lower.strip_prefix('e').and_then(parse_number) {
            episode = Some(n);
        }
    }

    if episode.is_none() {
        episode = tokens.last().and_then(|last| parse_number(last));
    }

    episode.map(|episode| EpisodeId::new(season.unwrap_or(1), episode))
}

/// `s01e05`, `s2e3v2`: season between the first `s` and first `e`, episode after
fn parse_combined(token: &str) -> Option<EpisodeId> {
    let token = match token.find('v') {
        Some(idx) => &token[..idx],
        None => token,
    };

    let s_idx = token.find('s')?;
    let e_idx = token.find('e')?;
    if e_idx <= s_idx {
        return None;
    }

    let season = parse_number(&token[s_idx + 1..e_idx])?;
    let episode = parse_number(&token[e_idx + 1..])?;
    Some(EpisodeId::new(season, episode))
}

/// Non-empty run of ASCII digits that fits a `u32`
fn parse_number(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

static STRICT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)S(\d+)E(\d+)").expect("valid strict episode regex"));

static EPISODE_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:episode|ep|e)[\s._]*(\d{1,4})\b").expect("valid episode word regex")
});

static TRAILING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[\s._-])(\d{1,4})(?:v\d+)?\s*$").expect("valid trailing number regex")
});

/// First `S<n>E<n>` marker whose numbers fit
fn parse_strict(base_name: &str) -> Option<EpisodeId> {
    STRICT_RE.captures_iter(base_name).find_map(|caps| {
        let season = parse_number(caps.get(1)?.as_str())?;
        let episode = parse_number(caps.get(2)?.as_str())?;
        Some(EpisodeId::new(season, episode))
    })
}

fn parse_loose(base_name: &str) -> Option<EpisodeId> {
    if let Some(id) = parse_strict(base_name) {
        return Some(id);
    }

    [&*EPISODE_WORD_RE, &*TRAILING_NUMBER_RE]
        .into_iter()
        .find_map(|re| re.captures(base_name))
        .and_then(|caps| parse_number(caps.get(1)?.as_str()))
        .map(|episode| EpisodeId::new(1, episode))
}
