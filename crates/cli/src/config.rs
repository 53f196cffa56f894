//! Configuration for the fixedgrid command-line host.
//!
//! Configuration is loaded from TOML files in the following locations (in order):
//! 1. The platform config directory (`fixedgrid/config.toml`)
//! 2. `~/.config/fixedgrid/config.toml`
//! 3. `./fixedgrid.toml` (current directory, for development)

use anyhow::{Context, Result};
use directories::ProjectDirs;
use fixedgrid_core_layout::{GridConfig, InvalidationPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid geometry and engine behavior.
    pub grid: GridConfig,
    /// Host behavior.
    pub behavior: BehaviorConfig,
}

/// Behavior-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BehaviorConfig {
    /// The configured level, falling back to `INFO` for unknown values.
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// A partial `[grid]` table layered over a full [`GridConfig`].
///
/// Only fields that are set replace the underlying value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalidation: Option<InvalidationPolicy>,
}

impl GridOverrides {
    /// Write every set field into `grid`.
    pub fn apply_to(&self, grid: &mut GridConfig) {
        if let Some(column_count) = self.column_count {
            grid.column_count = column_count;
        }
        if let Some(width) = self.width {
            grid.width = width;
        }
        if let Some(padding_left) = self.padding_left {
            grid.padding_left = padding_left;
        }
        if let Some(padding_right) = self.padding_right {
            grid.padding_right = padding_right;
        }
        if let Some(padding_top) = self.padding_top {
            grid.padding_top = padding_top;
        }
        if let Some(invalidation) = self.invalidation {
            grid.invalidation = invalidation;
        }
    }
}

impl Config {
    /// Load configuration from standard locations.
    ///
    /// Returns the default config if no file is found.
    pub fn load() -> Result<Self> {
        for path in &config_paths() {
            if path.exists() {
                return Self::load_from_path(path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

/// Get all possible config file paths in priority order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(proj_dirs) = ProjectDirs::from("org", "fixedgrid", "fixedgrid") {
        paths.push(proj_dirs.config_dir().join("config.toml"));
    }

    if let Some(home) = dirs_home() {
        paths.push(home.join(".config").join("fixedgrid").join("config.toml"));
    }

    paths.push(PathBuf::from("fixedgrid.toml"));

    paths
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.grid.column_count, 2);
        assert_eq!(config.grid.width, 1080);
        assert_eq!(config.behavior.log_level, "info");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.grid, config.grid);
        assert_eq!(parsed.behavior.log_level, config.behavior.log_level);
    }

    #[test]
    fn test_config_partial_parse() {
        let toml_str = r#"
            [grid]
            column_count = 4
            invalidation = "keep_stale"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.grid.column_count, 4);
        assert_eq!(config.grid.width, 1080); // default
        assert_eq!(config.grid.invalidation, InvalidationPolicy::KeepStale);
        assert_eq!(config.behavior.log_level, "info"); // default
    }

    #[test]
    fn test_grid_overrides_only_touch_set_fields() {
        let mut grid = GridConfig {
            width: 1440,
            padding_top: 24,
            ..Default::default()
        };
        let overrides: GridOverrides = toml::from_str("column_count = 3").unwrap();
        overrides.apply_to(&mut grid);

        assert_eq!(grid.column_count, 3);
        assert_eq!(grid.width, 1440);
        assert_eq!(grid.padding_top, 24);
        assert_eq!(grid.invalidation, InvalidationPolicy::RewindColumns);
    }

    #[test]
    fn test_empty_grid_overrides_change_nothing() {
        let mut grid = GridConfig::default();
        GridOverrides::default().apply_to(&mut grid);
        assert_eq!(grid, GridConfig::default());
    }

    #[test]
    fn test_log_level_parsing() {
        let mut behavior = BehaviorConfig::default();
        assert_eq!(behavior.level(), Level::INFO);

        behavior.log_level = "DEBUG".to_string();
        assert_eq!(behavior.level(), Level::DEBUG);

        behavior.log_level = "verbose".to_string();
        assert_eq!(behavior.level(), Level::INFO);
    }

    #[test]
    fn test_config_paths_not_empty() {
        let paths = config_paths();
        assert!(!paths.is_empty());
        assert_eq!(paths.last(), Some(&PathBuf::from("fixedgrid.toml")));
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = Config::load_from_path(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
