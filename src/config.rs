use crate::error::{CalviewError, Result};
use crate::event::{Event, sample_events};
use crate::store::EventStore;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CALVIEW_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Injected event table, replaces the built-in sample events
    #[serde(default)]
    pub events: Option<Vec<Event>>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            events: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calview")
    }

    pub fn config_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_dir().join("config.json"),
        }
    }

    /// Load from `$CALVIEW_CONFIG` when set, otherwise from the default
    /// location, falling back to defaults when that file is absent
    pub fn load() -> Result<Config> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_required(Path::new(&path)),
            None => Ok(Self::load_from(&Self::config_dir().join("config.json"))?.unwrap_or_default()),
        }
    }

    /// Load a file the user named explicitly; a missing file is an error
    pub fn load_required(path: &Path) -> Result<Config> {
        Self::load_from(path)?
            .ok_or_else(|| CalviewError::Config(format!("config file {} does not exist", path.display())))
    }

    pub fn load_from(path: &Path) -> Result<Option<Config>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(content)?;
        config.log_level()?;
        Ok(config)
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        self.log_level
            .parse()
            .map_err(|_| CalviewError::Config(format!("unknown log level '{}'", self.log_level)))
    }

    /// Validated event store, from the injected table or the sample data
    pub fn event_store(&self) -> Result<EventStore> {
        match &self.events {
            Some(events) => EventStore::new(events.clone()),
            None => EventStore::new(sample_events()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
        assert!(config.events.is_none());
        assert_eq!(config.event_store().unwrap().len(), sample_events().len());
    }

    #[test]
    fn test_injected_events_replace_samples() {
        let config = Config::parse(
            r#"{"log_level": "debug", "events": [
                {"id": 1, "title": "Dentist", "date": "2025-08-04", "time": "08:15",
                 "duration": 30, "color": "teal", "location": "Main St"}
            ]}"#,
        )
        .unwrap();

        let store = config.event_store().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.events_for_date("2025-08-04")[0].title, "Dentist");
        assert!(store.events_for_date("2025-06-23").is_empty());
        assert_eq!(config.log_level().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn test_duplicate_ids_fail_at_load() {
        let config = Config::parse(
            r#"{"events": [
                {"id": 1, "title": "A", "date": "2025-08-04", "time": "08:15", "duration": 30, "color": "red"},
                {"id": 1, "title": "B", "date": "2025-08-05", "time": "08:15", "duration": 30, "color": "red"}
            ]}"#,
        )
        .unwrap();

        let err = config.event_store().unwrap_err();
        assert!(matches!(err, CalviewError::DuplicateEventId(1)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_malformed_date_fails_at_load() {
        let config = Config::parse(
            r#"{"events": [
                {"id": 2, "title": "A", "date": "04/08/2025", "time": "08:15", "duration": 30, "color": "red"}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(config.event_store(), Err(CalviewError::InvalidEvent { id: 2, .. })));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let err = Config::parse(r#"{"log_level": "chatty"}"#).unwrap_err();
        assert!(matches!(err, CalviewError::Config(_)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(Config::parse("{"), Err(CalviewError::Json(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let path = std::env::temp_dir().join("calview-test-explicit-missing.json");
        let err = Config::load_required(&path).unwrap_err();
        assert!(matches!(err, CalviewError::Config(ref msg) if msg.contains("does not exist")));
        assert!(err.is_validation());
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("calview-test-explicit-{}.json", std::process::id()));
        fs::write(&path, r#"{"log_level": "warn"}"#).unwrap();
        let config = Config::load_required(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.log_level().unwrap(), LevelFilter::Warn);
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = std::env::temp_dir().join("calview-test-does-not-exist.json");
        assert!(Config::load_from(&path).unwrap().is_none());
    }
}
