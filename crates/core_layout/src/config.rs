//! Serializable engine configuration.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// What `invalidate_from` does with column bottoms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// Rebuild column bottoms from the placements that survive the cut, so
    /// the re-laid-out suffix packs exactly as a fresh pass would.
    #[default]
    RewindColumns,
    /// Only drop cached placements and the frontier. The suffix packs
    /// against the column bottoms left by the previous pass.
    KeepStale,
}

/// Grid geometry and engine behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns (clamped to at least 1).
    #[serde(default = "default_column_count")]
    pub column_count: usize,

    /// Total width of the grid in pixels, padding included.
    #[serde(default = "default_width")]
    pub width: i32,

    #[serde(default)]
    pub padding_left: i32,

    #[serde(default)]
    pub padding_right: i32,

    /// Initial column bottom after a full reset.
    #[serde(default)]
    pub padding_top: i32,

    #[serde(default)]
    pub invalidation: InvalidationPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_count: default_column_count(),
            width: default_width(),
            padding_left: 0,
            padding_right: 0,
            padding_top: 0,
            invalidation: InvalidationPolicy::default(),
        }
    }
}

fn default_column_count() -> usize {
    2
}

fn default_width() -> i32 {
    1080
}

/// A value that was corrected during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl GridConfig {
    /// Clamp out-of-range values in place and report what changed.
    pub fn validate(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.column_count < 1 {
            warnings.push(ConfigWarning {
                field: "column_count",
                message: format!("{} is below 1, using 1", self.column_count),
            });
            self.column_count = 1;
        }

        for (field, value) in [
            ("width", &mut self.width),
            ("padding_left", &mut self.padding_left),
            ("padding_right", &mut self.padding_right),
            ("padding_top", &mut self.padding_top),
        ] {
            if *value < 0 {
                warnings.push(ConfigWarning {
                    field,
                    message: format!("{} is negative, using 0", value),
                });
                *value = 0;
            }
        }

        for w in &warnings {
            warn!("Grid config {}: {}", w.field, w.message);
        }
        warnings
    }
}
