//! Configuration loading and parsing.
//!
//! Parses `surround.toml` (or an override path supplied by the embedding
//! host). Two tables are recognised:
//!
//! ```toml
//! [surround]
//! not_found = "ignore"   # or "abort"
//!
//! [log]
//! filter = "info"        # EnvFilter directive; RUST_LOG when absent
//! file = "surround.log"
//! dir = "."
//! ```
//!
//! Unknown fields are ignored (TOML deserialization tolerance). A missing
//! file yields defaults; an unparsable file also yields defaults but logs a
//! warning under the `config` target.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// What a surround command does when the delimiter pair is not on the cursor line.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
    /// Leave the buffer untouched and report the miss as the command's outcome.
    #[default]
    Ignore,
    /// Abort the command with an error.
    Abort,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SurroundConfig {
    #[serde(default)]
    pub not_found: NotFoundPolicy,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default = "LogConfig::default_file")]
    pub file: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: None,
            file: Self::default_file(),
            dir: None,
        }
    }
}

impl LogConfig {
    fn default_file() -> String {
        "surround.log".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub surround: SurroundConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

impl Config {
    pub fn not_found_policy(&self) -> NotFoundPolicy {
        self.file.surround.not_found
    }

    /// Defaults with an explicit locator-miss policy (hosts and tests).
    pub fn with_not_found_policy(policy: NotFoundPolicy) -> Self {
        let mut cfg = Self::default();
        cfg.file.surround.not_found = policy;
        cfg
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    // Prefer local working directory `surround.toml` before the platform config dir.
    let local = PathBuf::from("surround.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("surround").join("surround.toml");
    }
    // Final fallback relative filename.
    PathBuf::from("surround.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                not_found = ?file.surround.not_found,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

/// Install the global tracing subscriber writing to the configured log file.
///
/// Returns the writer guard that must be held for the lifetime of the host;
/// `None` when a global subscriber was already installed (the writer is shut
/// down immediately in that case).
pub fn init_logging(cfg: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = match &cfg.filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let log_dir = cfg.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &cfg.file);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // Global tracing subscriber already installed; drop guard so writer shuts down.
        Err(_err) => Ok(None),
    }
}
