//! Per-directory configuration overrides.
//!
//! A directory may hold a `.goshs` file with a JSON object that changes how
//! the directory and the files directly inside it are served. Overrides do
//! not apply to subdirectories: `/private/.goshs` setting `auth` leaves
//! `/private/sub/` and its files open unless `sub` has its own `.goshs`.
//! Resolution reads the disk on every call; nothing is cached.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Name of the override file.
pub const SENTINEL: &str = ".goshs";

/// Contents of a sentinel file. Missing fields take their zero value and
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// `user:password` required to access the directory.
    pub auth: Option<String>,
    /// Answer 404 for the directory and the files directly in it.
    pub block: bool,
    pub listing: Option<bool>,
    pub upload: Option<bool>,
}

/// Server-wide settings with a directory's overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub listing: bool,
    pub upload: bool,
    pub auth: Option<String>,
    pub blocked: bool,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The directory or the sentinel file could not be opened or read.
    #[error("cannot read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The sentinel file is not a valid JSON object.
    #[error("malformed override file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ResolveError {
    pub fn is_parse(&self) -> bool {
        matches!(self, ResolveError::Parse { .. })
    }
}

/// Looks for the sentinel file directly inside `dir` and parses it.
///
/// Entries are scanned in the order the filesystem lists them and the
/// first exact name match wins. Without a sentinel the default override is
/// returned.
pub fn resolve(dir: &Path) -> Result<OverrideConfig, ResolveError> {
    let entries = fs::read_dir(dir).map_err(|source| io_error(dir, source))?;

    for entry in entries {
        let entry = entry.map_err(|source| io_error(dir, source))?;
        if entry.file_name() != SENTINEL {
            continue;
        }

        let path = entry.path();
        let content = fs::read(&path).map_err(|source| io_error(&path, source))?;
        return serde_json::from_slice(&content)
            .map_err(|source| ResolveError::Parse { path, source });
    }

    Ok(OverrideConfig::default())
}

fn io_error(path: &Path, source: io::Error) -> ResolveError {
    ResolveError::Io { path: path.to_path_buf(), source }
}
