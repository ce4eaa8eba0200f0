//! Per-series configuration
//!
//! Every download folder carries a `.kanaplex` INI file:
//!
//! ```ini
//! [settings]
//! name = My Show
//! destination = /media/tv/My Show
//! ; optional: tokens (default), strict or loose
//! parser = tokens
//! ```
//!
//! Keys are matched case-insensitively and values are taken literally:
//! backslashes and quotes are kept as written.

use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption, Properties};
use tracing::debug;

use crate::services::filename_parser::{ParseModeError, ParserMode};

/// Name of the settings file looked up in the source directory
pub const CONFIG_FILENAME: &str = ".kanaplex";

const SECTION: &str = "settings";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No {} file found in {}", CONFIG_FILENAME, .dir.display())]
    MissingFile { dir: PathBuf },

    #[error("Missing required config key '{key}' in [{}]", SECTION)]
    MissingKey { key: &'static str },

    #[error("Invalid value for config key '{key}': {source}")]
    InvalidValue {
        key: &'static str,
        #[source]
        source: ParseModeError,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },
}

/// Validated settings for one series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesConfig {
    /// Series name used for library file names
    pub name: String,
    /// Library folder receiving the links
    pub destination: PathBuf,
    pub parser: ParserMode,
}

impl SeriesConfig {
    /// Load `.kanaplex` from `dir`
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            return Err(ConfigError::MissingFile { dir: dir.to_path_buf() });
        }

        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_file_opt(&path, options)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let settings = ini.section(Some(SECTION));

        let name = required(settings, "name")?;
        let destination = PathBuf::from(required(settings, "destination")?);

        let parser = match optional(settings, "parser") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidValue { key: "parser", source })?,
            None => ParserMode::default(),
        };

        debug!(
            path = %path.display(),
            name = %name,
            destination = %destination.display(),
            parser = %parser,
            "Loaded series config"
        );

        Ok(Self { name, destination, parser })
    }
}

/// Value of the last key matching `key` ignoring case; blank counts as unset
fn optional(settings: Option<&Properties>, key: &str) -> Option<String> {
    settings?
        .iter()
        .filter(|(k, _)| k.trim().eq_ignore_ascii_case(key))
        .map(|(_, value)| value.trim())
        .last()
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required(settings: Option<&Properties>, key: &'static str) -> Result<String, ConfigError> {
    optional(settings, key).ok_or(ConfigError::MissingKey { key })
}
