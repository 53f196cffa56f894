//! Fixedgrid Core Layout Engine
//!
//! Host-agnostic placement engine for a fixed-order staggered grid.
//!
//! This crate implements the "place once, never move" paradigm where:
//! - Items are packed in adapter order into `column_count` equal columns
//! - Each item occupies a contiguous window of 1..=column_count columns
//! - Placement is absolute (unscrolled) and never changes once computed
//! - Dataset mutations only recompute the suffix starting at the changed position
//!
//! The host owns scrolling, view recycling and measurement. It drives the
//! engine through [`LayoutEngine::ensure_laid_out_up_to`] and reads the
//! results back with [`LayoutEngine::rect`].
//!
//! The engine is single-threaded and synchronous. The measurement callback
//! handed to a layout pass must not call back into the engine.

pub mod cache;
pub mod check;
pub mod columns;
pub mod config;
pub mod engine;
pub mod packer;
pub mod pin;
pub mod span;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::PlacementCache;
pub use columns::ColumnSet;
pub use config::{ConfigWarning, GridConfig, InvalidationPolicy};
pub use engine::{
    DatasetChange, GridBounds, LayoutEngine, LayoutItem, LayoutSnapshot, LayoutState,
    SizeChangeAware, SizeChangeCallback,
};
pub use packer::{ItemMeasurer, Packer};
pub use pin::{ColumnPinning, PinResolver};
pub use span::{DefaultSpanSizeLookup, SpanResolver, SpanSizeFn, SpanSizeLookup};

/// Errors a pluggable strategy may report.
///
/// The engine never propagates these to the host: a failing span lookup is
/// logged and the item falls back to a single column.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Span lookup failed for position {position}: {reason}")]
    SpanLookup { position: usize, reason: String },

    #[error("No item data for position {0}")]
    MissingItem(usize),
}

/// A rectangle in absolute grid coordinates (pixels, unscrolled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from its edges.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Check if this rectangle intersects with another.
    ///
    /// Edges that merely touch do not count as an intersection.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Computed placement for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Adapter position of the item.
    pub position: usize,
    /// The item rectangle in absolute coordinates.
    pub rect: Rect,
    /// First column of the span window.
    pub start_column: usize,
    /// Number of columns covered.
    pub span: usize,
}

impl Placement {
    /// Columns covered by this placement.
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.start_column..self.start_column + self.span
    }
}
