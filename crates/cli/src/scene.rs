//! Scene files: a dataset of items for the engine to lay out.
//!
//! A scene is a TOML document with an optional `[grid]` table and one
//! `[[items]]` entry per adapter position:
//!
//! ```toml
//! [grid]
//! column_count = 3
//! width = 300
//!
//! [[items]]
//! height = 120
//! span = 3
//!
//! [[items]]
//! height = 80
//! pin = 0
//! ```

use anyhow::{Context, Result};
use crate::config::GridOverrides;
use fixedgrid_core_layout::{
    ColumnPinning, GridConfig, LayoutEngine, SpanSizeLookup, StrategyError,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One item of a scene, in adapter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneItem {
    /// Height the host reports when the item is measured.
    pub height: i32,

    /// Columns occupied; one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<usize>,

    /// Starting column the item is pinned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Grid settings layered over the loaded configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridOverrides>,
    pub items: Vec<SceneItem>,
}

impl Scene {
    /// Load a scene from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {}", path.display()))?;

        let scene: Scene = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scene file: {}", path.display()))?;

        Ok(scene)
    }

    /// Build an engine for `grid` and lay out every item of the scene.
    pub fn lay_out(&self, grid: &GridConfig) -> LayoutEngine {
        let mut engine = LayoutEngine::from_config(grid);
        engine.set_span_size_lookup(SceneSpans {
            spans: self.items.iter().map(|item| item.span).collect(),
        });
        if self.items.iter().any(|item| item.pin.is_some()) {
            engine.set_column_pinning(ScenePins {
                pins: self.items.iter().map(|item| item.pin).collect(),
            });
        }

        let heights: Vec<i32> = self.items.iter().map(|item| item.height).collect();
        engine.ensure_laid_out_up_to(heights.len(), &mut |position: usize, _: i32, _: i32| {
            heights[position]
        });
        engine
    }
}

/// Span lookup backed by a scene's item list.
#[derive(Debug, Clone)]
pub struct SceneSpans {
    spans: Vec<Option<usize>>,
}

impl SpanSizeLookup for SceneSpans {
    fn span_size(&self, position: usize) -> Result<usize, StrategyError> {
        self.spans
            .get(position)
            .map(|span| span.unwrap_or(1))
            .ok_or(StrategyError::MissingItem(position))
    }
}

/// Column pinning backed by a scene's item list.
#[derive(Debug, Clone)]
pub struct ScenePins {
    pins: Vec<Option<usize>>,
}

impl ColumnPinning for ScenePins {
    fn pinned_start(&self, position: usize) -> Option<usize> {
        self.pins.get(position).copied().flatten()
    }
}
