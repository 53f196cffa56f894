//! Column pinning: forcing an item's starting column.

use std::fmt;

/// Pins items to a starting column (0-based). `None` leaves the item unpinned.
///
/// Returned columns are clamped so the item's whole span window stays in
/// bounds; they are never rejected.
pub trait ColumnPinning {
    fn pinned_start(&self, position: usize) -> Option<usize>;
}

impl<F> ColumnPinning for F
where
    F: Fn(usize) -> Option<usize>,
{
    fn pinned_start(&self, position: usize) -> Option<usize> {
        self(position)
    }
}

/// Resolves pin requests through an optional strategy.
#[derive(Default)]
pub struct PinResolver {
    strategy: Option<Box<dyn ColumnPinning>>,
}

impl PinResolver {
    pub fn new(strategy: Option<Box<dyn ColumnPinning>>) -> Self {
        Self { strategy }
    }

    /// Whether a pinning strategy is installed.
    pub fn is_active(&self) -> bool {
        self.strategy.is_some()
    }

    /// Starting column for the item at `position`, clamped into
    /// `[0, column_count - span]`.
    pub fn pinned_start_for(&self, position: usize, span: usize, column_count: usize) -> Option<usize> {
        let requested = self.strategy.as_ref()?.pinned_start(position)?;
        let max_start = column_count.saturating_sub(span);
        Some(requested.min(max_start))
    }
}

impl fmt::Debug for PinResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinResolver")
            .field("active", &self.is_active())
            .finish()
    }
}
