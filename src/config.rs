// SPDX-License-Identifier: MIT
//! Watcher configuration (`[connwatch]`-style TOML or in-code defaults).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Failure to load a configuration file.
///
/// A missing file is not an error — [`WatchConfig::load`] falls back to
/// defaults. Only unreadable or unparsable files surface here.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Interval between flag samples in polling mode, in milliseconds.
    ///
    /// Default: 250
    pub poll_interval_ms: u64,
    /// Value reported by `is_online()` when the host has no queryable flag.
    ///
    /// Default: true
    pub default_online: bool,
    /// Broadcast channel capacity. Subscribers that fall further behind than
    /// this observe a lag error instead of the missed events.
    ///
    /// Default: 1024
    pub event_capacity: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            default_online: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl WatchConfig {
    /// The polling interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file yields defaults so embedding applications can ship
    /// without one.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert!(config.default_online);
        assert_eq!(config.event_capacity, 1024);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: WatchConfig = toml::from_str("poll_interval_ms = 50").unwrap();
        assert_eq!(config.poll_interval_ms, 50);
        assert!(config.default_online);
        assert_eq!(config.event_capacity, 1024);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WatchConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connwatch.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "poll_interval_ms = 100\ndefault_online = false").unwrap();

        let config = WatchConfig::load(&path).unwrap();
        assert_eq!(config.poll_interval_ms, 100);
        assert!(!config.default_online);
    }

    #[test]
    fn load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connwatch.toml");
        std::fs::write(&path, "poll_interval_ms = \"soon\"").unwrap();

        let err = WatchConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
