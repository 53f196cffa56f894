//! The packing step: choosing a span window and stacking an item onto it.

use std::ops::Range;

use tracing::{trace, warn};

use crate::{ColumnSet, Placement, Rect};

/// Reports an item's height once its horizontal bounds are known.
///
/// This is the only place the engine calls into the host. Implementations
/// must not call back into the engine that is running the layout pass.
/// Negative heights are a host contract violation; the packer clamps them
/// to zero and logs a warning. Bottoms saturate at `i32::MAX`: an item that
/// would end past it is shortened so it ends exactly there.
pub trait ItemMeasurer {
    fn measure(&mut self, position: usize, left: i32, right: i32) -> i32;
}

impl<F> ItemMeasurer for F
where
    F: FnMut(usize, i32, i32) -> i32,
{
    fn measure(&mut self, position: usize, left: i32, right: i32) -> i32 {
        self(position, left, right)
    }
}

/// Tracks the current bottom of every column and packs items onto them.
///
/// Column bottoms only ever grow while positions are processed in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packer {
    bottoms: Vec<i32>,
}

impl Packer {
    /// Create a packer with every column bottom at `floor`.
    pub fn new(column_count: usize, floor: i32) -> Self {
        Self {
            bottoms: vec![floor; column_count],
        }
    }

    /// Reset every column bottom to `floor`, resizing to `column_count`.
    pub fn reset(&mut self, column_count: usize, floor: i32) {
        self.bottoms.clear();
        self.bottoms.resize(column_count, floor);
    }

    pub fn column_count(&self) -> usize {
        self.bottoms.len()
    }

    pub fn bottoms(&self) -> &[i32] {
        &self.bottoms
    }

    /// The tallest column bottom, or `floor` when there are no columns.
    pub fn content_extent(&self, floor: i32) -> i32 {
        self.bottoms.iter().copied().max().unwrap_or(floor)
    }

    /// Earliest top for the window `[start, start + span)`.
    fn window_top(&self, start: usize, span: usize) -> i32 {
        self.bottoms[start..start + span]
            .iter()
            .copied()
            .max()
            .unwrap_or(i32::MIN)
    }

    /// Choose the window start and top for an item of `span` columns.
    ///
    /// A pinned start is taken as-is. Otherwise every feasible start is
    /// tried and the one giving the smallest top wins; ties go to the
    /// smallest start.
    pub fn choose_window(&self, span: usize, pinned_start: Option<usize>) -> (usize, i32) {
        let column_count = self.bottoms.len();
        assert!(
            span >= 1 && span <= column_count,
            "span {} does not fit {} columns",
            span,
            column_count
        );

        if let Some(start) = pinned_start {
            assert!(
                start + span <= column_count,
                "pinned window {}..{} exceeds {} columns",
                start,
                start + span,
                column_count
            );
            return (start, self.window_top(start, span));
        }

        let mut best_start = 0;
        let mut best_top = i32::MAX;
        for start in 0..=(column_count - span) {
            let top = self.window_top(start, span);
            // Strict comparison keeps the smallest start on ties.
            if top < best_top {
                best_top = top;
                best_start = start;
            }
        }
        (best_start, best_top)
    }

    /// Place the item at `position` and advance the columns it covers.
    pub fn place<M>(
        &mut self,
        position: usize,
        span: usize,
        pinned_start: Option<usize>,
        columns: &ColumnSet,
        measurer: &mut M,
    ) -> Placement
    where
        M: ItemMeasurer + ?Sized,
    {
        let (start, top) = self.choose_window(span, pinned_start);
        let (left, right) = columns.window_bounds(start, span);

        let mut height = measurer.measure(position, left, right);
        if height < 0 {
            warn!(
                "Measured negative height {} for position {}, clamping to 0",
                height, position
            );
            height = 0;
        }

        let bottom = top.saturating_add(height);
        if bottom - top < height {
            warn!(
                "Position {} at y {} with height {} overflows, clamping bottom to {}",
                position, top, height, bottom
            );
        }
        self.raise(start..start + span, bottom);

        trace!(
            "Placed position {} in columns {}..{} at y {}..{}",
            position,
            start,
            start + span,
            top,
            bottom
        );

        Placement {
            position,
            rect: Rect::new(left, top, right, bottom),
            start_column: start,
            span,
        }
    }

    /// Raise the bottoms of `columns` to at least `bottom`.
    pub fn raise(&mut self, columns: Range<usize>, bottom: i32) {
        for c in columns {
            self.bottoms[c] = self.bottoms[c].max(bottom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(height: i32) -> impl FnMut(usize, i32, i32) -> i32 {
        move |_: usize, _: i32, _: i32| height
    }

    #[test]
    fn test_tie_break_picks_smallest_start() {
        let packer = Packer::new(3, 0);
        assert_eq!(packer.choose_window(1, None), (0, 0));
        assert_eq!(packer.choose_window(2, None), (0, 0));
    }

    #[test]
    fn test_picks_window_with_lowest_resulting_top() {
        let mut packer = Packer::new(3, 0);
        packer.raise(0..1, 80);
        packer.raise(1..3, 50);
        // span 2: windows [0,1] -> 80, [1,2] -> 50
        assert_eq!(packer.choose_window(2, None), (1, 50));
        // span 1: columns 1 and 2 tie at 50, take 1
        assert_eq!(packer.choose_window(1, None), (1, 50));
    }

    #[test]
    fn test_limiting_column_decides_not_shortest_column() {
        let mut packer = Packer::new(3, 0);
        packer.raise(0..1, 10);
        packer.raise(1..2, 100);
        packer.raise(2..3, 0);
        // Shortest column is 2, but a span-2 window can't avoid column 1;
        // [0,1] -> 100 and [1,2] -> 100 tie, smallest start wins.
        assert_eq!(packer.choose_window(2, None), (0, 100));
    }

    #[test]
    fn test_pinned_window_uses_its_own_top() {
        let mut packer = Packer::new(3, 0);
        packer.raise(0..1, 90);
        assert_eq!(packer.choose_window(1, Some(0)), (0, 90));
        assert_eq!(packer.choose_window(2, Some(1)), (1, 0));
    }

    #[test]
    fn test_place_advances_window_columns() {
        let cols = ColumnSet::compute(3, 300, 0);
        let mut packer = Packer::new(3, 0);

        let p = packer.place(0, 2, None, &cols, &mut fixed(40));
        assert_eq!(p.rect, Rect::new(0, 0, 200, 40));
        assert_eq!(packer.bottoms(), &[40, 40, 0]);

        let p = packer.place(1, 1, None, &cols, &mut fixed(30));
        assert_eq!(p.rect, Rect::new(200, 0, 300, 30));
        assert_eq!(p.start_column, 2);
        assert_eq!(packer.content_extent(0), 40);
    }

    #[test]
    fn test_measurer_receives_window_bounds() {
        let cols = ColumnSet::compute(3, 300, 10);
        let mut packer = Packer::new(3, 0);
        let mut seen = Vec::new();
        packer.place(3, 2, Some(1), &cols, &mut |pos: usize, l: i32, r: i32| {
            seen.push((pos, l, r));
            25
        });
        assert_eq!(seen, vec![(3, 110, 310)]);
    }

    #[test]
    fn test_negative_height_is_clamped_to_zero() {
        let cols = ColumnSet::compute(2, 200, 0);
        let mut packer = Packer::new(2, 0);
        let p = packer.place(0, 1, None, &cols, &mut fixed(-15));
        assert_eq!(p.rect.top, 0);
        assert_eq!(p.rect.bottom, 0);
        assert_eq!(packer.bottoms(), &[0, 0]);
    }

    #[test]
    fn test_tall_column_saturates_instead_of_overflowing() {
        let cols = ColumnSet::compute(1, 100, 0);
        let mut packer = Packer::new(1, 0);
        packer.place(0, 1, None, &cols, &mut fixed(1_500_000_000));
        let p = packer.place(1, 1, None, &cols, &mut fixed(1_500_000_000));
        assert_eq!(p.rect.top, 1_500_000_000);
        assert_eq!(p.rect.bottom, i32::MAX);
        assert_eq!(packer.bottoms(), &[i32::MAX]);

        // Further items collapse to zero height at the limit
        let p = packer.place(2, 1, None, &cols, &mut fixed(5));
        assert_eq!((p.rect.top, p.rect.bottom), (i32::MAX, i32::MAX));
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_oversized_span_is_a_core_bug() {
        let packer = Packer::new(2, 0);
        packer.choose_window(3, None);
    }
}
