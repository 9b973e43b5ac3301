use super::errors::Result;
use super::persistence::DEFAULT_EXPORT;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read from an optional JSON file. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub export_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    /// Number of recent log lines kept for the log view.
    pub log_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from(DEFAULT_EXPORT),
            log_file: None,
            log_level: "info".to_string(),
            log_capacity: 200,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Unknown level names fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.export_path, PathBuf::from("data.xlsx"));
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_level": "debug", "export_path": "out.csv"}}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.export_path, PathBuf::from("out.csv"));
        assert_eq!(config.log_capacity, 200);
    }

    #[test]
    fn test_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_unknown_level() {
        let config = Config { log_level: "chatty".to_string(), ..Config::default() };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
