use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::properties::{self, PropertiesError};

pub const MODE_KEY: &str = "mode";
pub const SUFFIX_KEY: &str = "suffix";
pub const FILES_KEY: &str = "files";

/// Separator between entries of the `files` property.
pub const FILES_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Copy,
    Move,
    /// Kept verbatim so each file can report it.
    Unrecognized(String),
}

impl Mode {
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "copy" => Mode::Copy,
            "move" => Mode::Move,
            _ => Mode::Unrecognized(raw.to_string()),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Copy => f.write_str("copy"),
            Mode::Move => f.write_str("move"),
            Mode::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SuffixConfig {
    pub mode: Mode,
    pub suffix: String,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error reading the config file: {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error parsing the config file: {}", path.display())]
    Parse {
        path: PathBuf,
        source: PropertiesError,
    },
    #[error("No mode is specified in the config.")]
    MissingMode,
    #[error("No suffix is specified in the config.")]
    MissingSuffix,
    #[error("No files are configured to be copied/moved.")]
    NoFiles,
}

impl ConfigError {
    /// An empty file list is not a failure, just nothing to do.
    pub fn is_warning(&self) -> bool {
        matches!(self, ConfigError::NoFiles)
    }
}

impl SuffixConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_properties_str(&decode(bytes)).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_properties_str(text: &str) -> Result<Self, ConfigError> {
        let props = properties::parse(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;

        let mode = props
            .get(MODE_KEY)
            .filter(|m| !m.is_empty())
            .ok_or(ConfigError::MissingMode)?;
        let suffix = props
            .get(SUFFIX_KEY)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSuffix)?;
        let files = props
            .get(FILES_KEY)
            .filter(|f| !f.is_empty())
            .ok_or(ConfigError::NoFiles)?;

        Ok(Self {
            mode: Mode::parse(mode),
            suffix: suffix.clone(),
            files: split_files(files),
        })
    }
}

/// Splits the `files` list. Trailing empty entries are dropped; blank entries
/// in the middle are kept (as empty paths) so they get reported as missing.
pub fn split_files(files: &str) -> Vec<PathBuf> {
    let mut entries: Vec<&str> = files.split(FILES_SEPARATOR).collect();
    while entries.last().is_some_and(|entry| entry.is_empty()) {
        entries.pop();
    }
    entries
        .into_iter()
        .map(|entry| PathBuf::from(entry.trim()))
        .collect()
}

// Properties files are ISO-8859-1; UTF-8 is accepted when it decodes cleanly.
fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| err.into_bytes().into_iter().map(char::from).collect())
}
