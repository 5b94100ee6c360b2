use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::task::Priority;
use crate::time::Calendar;

const MIN_TICK_SECONDS: u64 = 1;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `tasks_v1.json`; `~/.tasksched` when unset.
    pub data_dir: Option<PathBuf>,
    pub calendar: Calendar,
    pub tick_seconds: u64,
    pub log_level: String,
    pub default_priority: Priority,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            calendar: Calendar::Local,
            tick_seconds: 60,
            log_level: "info".to_string(),
            default_priority: Priority::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir().join("config.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_seconds.max(MIN_TICK_SECONDS))
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasksched")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.tick_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "calendar = \"+05:30\"\ntick_seconds = 0\ndefault_priority = 3\n").unwrap();

        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg.calendar, Calendar::Fixed(FixedOffset::east_opt(5 * 3600 + 1800).unwrap()));
        assert_eq!(cfg.tick_interval(), Duration::from_secs(1));
        assert_eq!(cfg.default_priority.value(), 3);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_priority = 7\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());

        std::fs::write(&path, "calendar = \"moon\"\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
