use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::files::overrides::{EffectiveConfig, OverrideConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    /// Dump headers, query values and POST bodies for every request.
    pub verbose: bool,
    /// Log at debug level.
    pub debug: bool,
    /// Unprivileged user to switch to once the listener is bound.
    pub drop_user: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen_addr: "127.0.0.1:8000".to_string() }
    }
}

/// Server-wide serving settings. Directories may override parts of it with
/// a sentinel file, see [`crate::files::overrides`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub root: PathBuf,
    pub listing: bool,
    pub upload: bool,
    /// `user:password` for HTTP Basic auth.
    pub auth: Option<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            listing: true,
            upload: false,
            auth: None,
        }
    }
}

impl FilesConfig {
    /// Settings in effect for a directory carrying `overrides`.
    pub fn merge(&self, overrides: &OverrideConfig) -> EffectiveConfig {
        EffectiveConfig {
            listing: overrides.listing.unwrap_or(self.listing),
            upload: overrides.upload.unwrap_or(self.upload),
            auth: overrides.auth.clone().or_else(|| self.auth.clone()),
            blocked: overrides.block,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `GOSHS_CONFIG`, then the
    /// environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("GOSHS_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies `LISTEN`, `ROOT`, `VERBOSE`, `DEBUG`, `UPLOAD`, `NO_LISTING`,
    /// `AUTH` and `DROP_USER` as returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Some(root) = lookup("ROOT") {
            self.files.root = PathBuf::from(root);
        }
        if let Some(v) = lookup("VERBOSE") {
            self.verbose = parse_flag(&v);
        }
        if let Some(v) = lookup("DEBUG") {
            self.debug = parse_flag(&v);
        }
        if let Some(v) = lookup("UPLOAD") {
            self.files.upload = parse_flag(&v);
        }
        if let Some(v) = lookup("NO_LISTING") {
            self.files.listing = !parse_flag(&v);
        }
        if let Some(auth) = lookup("AUTH").filter(|a| !a.is_empty()) {
            self.files.auth = Some(auth);
        }
        if let Some(user) = lookup("DROP_USER").filter(|u| !u.is_empty()) {
            self.drop_user = Some(user);
        }
    }
}

/// Reads a boolean environment value. Anything unrecognised is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
