//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Project;

/// Rows between progress lines when nothing else is configured
pub const DEFAULT_ROWS_UNTIL_UPDATE: usize = 100;

/// Accession number mask used when nothing else is configured
pub const DEFAULT_ACCESSION_MASK: &str = "%Y-#iii";

/// fonds configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Print a progress line every N rows (0 disables)
    pub rows_until_update: Option<usize>,

    /// File that row errors are appended to
    pub error_log: Option<PathBuf>,

    /// Mask for generated accession numbers
    pub accession_mask: Option<String>,

    /// Source name recorded in keymap entries
    pub source_name: Option<String>,

    /// Default output format for list commands
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/fonds/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 2. Project config (.fonds/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.fonds_dir().join("config.yaml")) {
                config.merge(project_config);
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env());

        config
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    fn from_env() -> Config {
        Config {
            rows_until_update: std::env::var("FONDS_ROWS_UNTIL_UPDATE")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            error_log: std::env::var("FONDS_ERROR_LOG").ok().map(PathBuf::from),
            accession_mask: std::env::var("FONDS_ACCESSION_MASK").ok(),
            source_name: std::env::var("FONDS_SOURCE_NAME").ok(),
            default_format: None,
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "fonds")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.rows_until_update.is_some() {
            self.rows_until_update = other.rows_until_update;
        }
        if other.error_log.is_some() {
            self.error_log = other.error_log;
        }
        if other.accession_mask.is_some() {
            self.accession_mask = other.accession_mask;
        }
        if other.source_name.is_some() {
            self.source_name = other.source_name;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    pub fn rows_until_update(&self) -> usize {
        self.rows_until_update.unwrap_or(DEFAULT_ROWS_UNTIL_UPDATE)
    }

    pub fn accession_mask(&self) -> &str {
        self.accession_mask
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_ACCESSION_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rows_until_update(), DEFAULT_ROWS_UNTIL_UPDATE);
        assert_eq!(config.accession_mask(), "%Y-#iii");
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base: Config =
            serde_yml::from_str("rows_until_update: 10\naccession_mask: \"#iiii\"\n").unwrap();
        let other: Config = serde_yml::from_str("rows_until_update: 25\n").unwrap();

        base.merge(other);

        assert_eq!(base.rows_until_update(), 25);
        assert_eq!(base.accession_mask(), "#iiii");
    }

    #[test]
    fn test_blank_mask_falls_back() {
        let config: Config = serde_yml::from_str("accession_mask: \"  \"\n").unwrap();
        assert_eq!(config.accession_mask(), DEFAULT_ACCESSION_MASK);
    }
}
