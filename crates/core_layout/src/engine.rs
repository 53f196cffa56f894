//! The layout engine: incremental, cached placement of items in order.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ColumnPinning, ColumnSet, GridConfig, InvalidationPolicy, ItemMeasurer, Packer, PinResolver,
    Placement, PlacementCache, Rect, SpanResolver, SpanSizeLookup,
};

/// Outer geometry of the grid in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    /// Total width, padding included.
    pub width: i32,
    pub padding_left: i32,
    pub padding_right: i32,
    /// Where every column starts after a full reset.
    pub padding_top: i32,
}

impl GridBounds {
    /// Bounds without padding.
    pub fn with_width(width: i32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Width left for columns once horizontal padding is removed.
    pub fn available_width(&self) -> i32 {
        (self.width - self.padding_left - self.padding_right).max(0)
    }
}

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// Nothing computed; column geometry is stale or missing.
    Empty,
    /// Column geometry is computed, no positions are placed.
    ColumnsSized,
    /// Some leading positions are placed; more are pending.
    Extending,
    /// Every requested position is placed.
    Stable,
}

/// A change to the host's dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetChange {
    Inserted { start: usize, count: usize },
    Removed { start: usize, count: usize },
    Moved { from: usize, to: usize },
    Updated { start: usize, count: usize },
    /// Everything may have changed.
    Reset,
}

impl DatasetChange {
    /// First position whose placement may no longer be valid.
    pub fn first_affected(&self) -> usize {
        match *self {
            DatasetChange::Inserted { start, .. }
            | DatasetChange::Removed { start, .. }
            | DatasetChange::Updated { start, .. } => start,
            DatasetChange::Moved { from, to } => from.min(to),
            DatasetChange::Reset => 0,
        }
    }
}

/// Handle an item uses to report that its height may have changed.
///
/// Notifying only records the request; the engine performs a full
/// invalidation at the start of its next layout pass. The handle does not
/// borrow the engine, so calling it never re-enters a running pass.
#[derive(Debug, Clone, Default)]
pub struct SizeChangeCallback {
    pending: Rc<Cell<bool>>,
}

impl SizeChangeCallback {
    pub fn notify(&self) {
        self.pending.set(true);
    }

    /// Whether a notification is waiting for the next layout pass.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }
}

/// Capability for items that want an explicit size-change callback.
pub trait SizeChangeAware {
    /// Store `callback` and invoke it whenever internal layout changes may
    /// affect the item's height.
    fn set_size_change_callback(&mut self, callback: SizeChangeCallback);
}

/// A host item the engine may inspect on attachment.
pub trait LayoutItem {
    /// Returns the item's size-change capability, if it has one.
    fn size_change_aware(&mut self) -> Option<&mut dyn SizeChangeAware> {
        None
    }
}

/// Serializable view of the engine's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub column_count: usize,
    pub content_extent: i32,
    pub frontier: usize,
    pub column_bottoms: Vec<i32>,
    pub placements: Vec<Placement>,
}

/// Fixed-order staggered grid layout.
///
/// Positions `[0, frontier)` are placed and cached. A layout pass only ever
/// extends the frontier; invalidation only ever lowers it.
///
/// ```
/// use fixedgrid_core_layout::{GridBounds, LayoutEngine, SpanSizeFn};
///
/// let mut engine = LayoutEngine::new(3, GridBounds::with_width(300));
/// engine.set_span_size_lookup(SpanSizeFn::new(|p| if p == 3 { 3 } else { 1 }));
/// engine.ensure_laid_out_up_to(4, &mut |_: usize, _: i32, _: i32| 50);
///
/// // The full-span item sits below every column.
/// let full = engine.rect(3).unwrap();
/// assert_eq!((full.left, full.top, full.right), (0, 50, 300));
/// assert_eq!(engine.content_extent(), 100);
/// ```
#[derive(Debug)]
pub struct LayoutEngine {
    column_count: usize,
    bounds: GridBounds,
    policy: InvalidationPolicy,
    columns: ColumnSet,
    packer: Packer,
    cache: PlacementCache,
    spans: SpanResolver,
    pins: PinResolver,
    frontier: usize,
    content_extent: i32,
    state: LayoutState,
    size_changed: SizeChangeCallback,
}

impl LayoutEngine {
    /// Create an engine with `column_count` columns (clamped to at least 1).
    pub fn new(column_count: usize, bounds: GridBounds) -> Self {
        let column_count = column_count.max(1);
        Self {
            column_count,
            bounds,
            policy: InvalidationPolicy::default(),
            columns: ColumnSet::default(),
            packer: Packer::new(column_count, bounds.padding_top),
            cache: PlacementCache::new(),
            spans: SpanResolver::default(),
            pins: PinResolver::default(),
            frontier: 0,
            content_extent: bounds.padding_top,
            state: LayoutState::Empty,
            size_changed: SizeChangeCallback::default(),
        }
    }

    /// Create an engine from a configuration.
    pub fn from_config(config: &GridConfig) -> Self {
        let bounds = GridBounds {
            width: config.width,
            padding_left: config.padding_left,
            padding_right: config.padding_right,
            padding_top: config.padding_top,
        };
        let mut engine = Self::new(config.column_count, bounds);
        engine.policy = config.invalidation;
        engine
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Change the column count. A different count discards all placements.
    pub fn set_column_count(&mut self, count: usize) {
        let count = count.max(1);
        if count == self.column_count {
            return;
        }
        debug!("Column count {} -> {}", self.column_count, count);
        self.column_count = count;
        self.reset();
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Change the grid bounds. Different bounds discard all placements.
    pub fn set_bounds(&mut self, bounds: GridBounds) {
        if bounds == self.bounds {
            return;
        }
        debug!("Grid bounds changed: {:?}", bounds);
        self.bounds = bounds;
        self.reset();
    }

    pub fn invalidation_policy(&self) -> InvalidationPolicy {
        self.policy
    }

    pub fn set_invalidation_policy(&mut self, policy: InvalidationPolicy) {
        self.policy = policy;
    }

    /// Install a span lookup. Invalidates every placement.
    pub fn set_span_size_lookup<L>(&mut self, lookup: L)
    where
        L: SpanSizeLookup + 'static,
    {
        self.spans = SpanResolver::new(Box::new(lookup));
        self.invalidate_all();
    }

    /// Install a column pinning strategy. Invalidates every placement.
    pub fn set_column_pinning<P>(&mut self, pinning: P)
    where
        P: ColumnPinning + 'static,
    {
        self.pins = PinResolver::new(Some(Box::new(pinning)));
        self.invalidate_all();
    }

    /// Remove the pinning strategy. Invalidates every placement.
    pub fn clear_column_pinning(&mut self) {
        self.pins = PinResolver::default();
        self.invalidate_all();
    }

    /// Discard every placement and all column state.
    pub fn invalidate_all(&mut self) {
        debug!("Invalidating all {} placements", self.frontier);
        self.reset();
    }

    /// Discard placements at `position` and after.
    ///
    /// Earlier placements are kept as they are.
    pub fn invalidate_from(&mut self, position: usize) {
        let removed = self.cache.remove_from(position);
        if position >= self.frontier {
            return;
        }
        debug!(
            "Invalidating from position {} (frontier {}, {} cached placements dropped)",
            position, self.frontier, removed
        );
        self.frontier = position;

        if self.frontier == 0 {
            self.packer.reset(self.column_count, self.bounds.padding_top);
            self.content_extent = self.bounds.padding_top;
            self.state = if self.columns.is_empty() {
                LayoutState::Empty
            } else {
                LayoutState::ColumnsSized
            };
            return;
        }

        if self.policy == InvalidationPolicy::RewindColumns {
            self.rewind_columns();
        }
        self.state = LayoutState::Extending;
    }

    /// Invalidate whatever `change` may have affected.
    pub fn apply_dataset_change(&mut self, change: DatasetChange) {
        debug!("Dataset change: {:?}", change);
        self.invalidate_from(change.first_affected());
    }

    /// A callback that schedules a full invalidation for the next pass.
    pub fn size_change_callback(&self) -> SizeChangeCallback {
        self.size_changed.clone()
    }

    /// Schedule a full invalidation for the next layout pass.
    pub fn notify_item_size_changed(&self) {
        self.size_changed.notify();
    }

    /// Install the size-change callback into `item` if it supports one.
    ///
    /// Items without the capability are skipped.
    pub fn on_item_attached<I>(&self, item: &mut I)
    where
        I: LayoutItem + ?Sized,
    {
        if let Some(aware) = item.size_change_aware() {
            aware.set_size_change_callback(self.size_change_callback());
        }
    }

    /// Place every position in `[frontier, item_count)`.
    ///
    /// `measurer` is called once per newly placed position with the item's
    /// horizontal bounds. It must not call back into this engine. A target
    /// equal to the frontier does no work, so huge datasets can be laid out
    /// in chunks by raising the target step by step. A target below the
    /// frontier means the dataset shrank: placements at `item_count` and
    /// after are dropped as if by [`invalidate_from`](Self::invalidate_from).
    pub fn ensure_laid_out_up_to<M>(&mut self, item_count: usize, measurer: &mut M)
    where
        M: ItemMeasurer + ?Sized,
    {
        if self.size_changed.take_pending() {
            debug!("Item size change reported, relaying out from scratch");
            self.reset();
        }

        if self.state == LayoutState::Empty {
            self.size_columns();
        }

        if item_count < self.frontier {
            debug!(
                "Item count {} is below frontier {}, dropping the tail",
                item_count, self.frontier
            );
            self.invalidate_from(item_count);
            self.content_extent = self.packer.content_extent(self.bounds.padding_top);
        }

        if item_count == self.frontier {
            self.state = LayoutState::Stable;
            return;
        }

        if self.frontier == 0 {
            self.packer.reset(self.column_count, self.bounds.padding_top);
        }

        debug!(
            "Extending layout from {} to {} items",
            self.frontier, item_count
        );
        self.state = LayoutState::Extending;

        for position in self.frontier..item_count {
            let span = self.spans.span_for(position, self.column_count);
            let pinned = self.pins.pinned_start_for(position, span, self.column_count);
            let placement = self
                .packer
                .place(position, span, pinned, &self.columns, measurer);
            self.cache.put(placement);
        }

        self.frontier = item_count;
        self.content_extent = self.packer.content_extent(self.bounds.padding_top);
        self.state = LayoutState::Stable;

        debug!(
            "Layout stable at {} items, content extent {}",
            self.frontier, self.content_extent
        );
    }

    /// The rectangle of `position`, if it has been placed.
    pub fn rect(&self, position: usize) -> Option<Rect> {
        self.cache.get(position)
    }

    /// The full placement of `position`, if it has been placed.
    pub fn placement(&self, position: usize) -> Option<&Placement> {
        self.cache.placement(position)
    }

    /// All cached placements in position order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.cache.iter()
    }

    /// Tallest column bottom after the last pass.
    pub fn content_extent(&self) -> i32 {
        self.content_extent
    }

    /// Number of leading positions that are placed.
    pub fn frontier(&self) -> usize {
        self.frontier
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn column_bottoms(&self) -> &[i32] {
        self.packer.bottoms()
    }

    /// Column geometry; empty until the first layout pass after a reset.
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            column_count: self.column_count,
            content_extent: self.content_extent,
            frontier: self.frontier,
            column_bottoms: self.packer.bottoms().to_vec(),
            placements: self.cache.iter().copied().collect(),
        }
    }

    fn reset(&mut self) {
        self.cache.clear();
        self.columns = ColumnSet::default();
        self.packer.reset(self.column_count, self.bounds.padding_top);
        self.frontier = 0;
        self.content_extent = self.bounds.padding_top;
        self.state = LayoutState::Empty;
    }

    fn size_columns(&mut self) {
        self.columns = ColumnSet::compute(
            self.column_count,
            self.bounds.available_width(),
            self.bounds.padding_left,
        );
        if self.packer.column_count() != self.column_count {
            self.packer.reset(self.column_count, self.bounds.padding_top);
        }
        self.state = LayoutState::ColumnsSized;
    }

    /// Rebuild column bottoms from the surviving placements.
    ///
    /// Each column's bottom is the largest bottom among placements covering
    /// it, because bottoms never decrease during a pass.
    fn rewind_columns(&mut self) {
        self.packer.reset(self.column_count, self.bounds.padding_top);
        for placement in self.cache.before(self.frontier) {
            self.packer.raise(placement.columns(), placement.rect.bottom);
        }
        self.content_extent = self.packer.content_extent(self.bounds.padding_top);
    }
}
