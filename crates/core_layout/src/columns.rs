//! Column geometry: splitting the available width into equal columns.

use serde::{Deserialize, Serialize};

/// Left and right pixel edges of every column.
///
/// Columns are laid out left to right without gaps. Remainder pixels of an
/// uneven split go to the leftmost columns, one each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    lefts: Vec<i32>,
    rights: Vec<i32>,
}

impl ColumnSet {
    /// Compute the columns for `column_count` over `available_width` pixels
    /// starting at `padding_left`.
    ///
    /// `column_count` must be at least 1; callers clamp it upstream.
    pub fn compute(column_count: usize, available_width: i32, padding_left: i32) -> Self {
        debug_assert!(column_count >= 1, "column_count must be clamped to >= 1");
        let available_width = available_width.max(0);

        if column_count == 1 {
            return Self {
                lefts: vec![padding_left],
                rights: vec![padding_left + available_width],
            };
        }

        let count = column_count as i32;
        let base = available_width / count;
        let remainder = available_width % count;

        let mut lefts = Vec::with_capacity(column_count);
        let mut rights = Vec::with_capacity(column_count);
        let mut x = padding_left;
        for i in 0..count {
            let width = base + i32::from(i < remainder);
            lefts.push(x);
            rights.push(x + width);
            x += width;
        }

        Self { lefts, rights }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.lefts.len()
    }

    /// Whether no geometry has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.lefts.is_empty()
    }

    /// Left edge of `column`.
    pub fn left(&self, column: usize) -> i32 {
        self.lefts[column]
    }

    /// Right edge of `column`.
    pub fn right(&self, column: usize) -> i32 {
        self.rights[column]
    }

    /// Horizontal bounds of the window `[start, start + span)`.
    pub fn window_bounds(&self, start: usize, span: usize) -> (i32, i32) {
        (self.lefts[start], self.rights[start + span - 1])
    }

    pub fn lefts(&self) -> &[i32] {
        &self.lefts
    }

    pub fn rights(&self) -> &[i32] {
        &self.rights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let cols = ColumnSet::compute(3, 300, 0);
        assert_eq!(cols.lefts(), &[0, 100, 200]);
        assert_eq!(cols.rights(), &[100, 200, 300]);
    }

    #[test]
    fn test_remainder_goes_to_leftmost_columns() {
        // 302 / 3 = 100 remainder 2
        let cols = ColumnSet::compute(3, 302, 0);
        assert_eq!(cols.lefts(), &[0, 101, 202]);
        assert_eq!(cols.rights(), &[101, 202, 302]);
    }

    #[test]
    fn test_padding_offsets_all_columns() {
        let cols = ColumnSet::compute(2, 200, 16);
        assert_eq!(cols.window_bounds(0, 1), (16, 116));
        assert_eq!(cols.window_bounds(1, 1), (116, 216));
        assert_eq!(cols.window_bounds(0, 2), (16, 216));
    }

    #[test]
    fn test_single_column_spans_full_width() {
        let cols = ColumnSet::compute(1, 777, 5);
        assert_eq!(cols.len(), 1);
        assert_eq!(cols.left(0), 5);
        assert_eq!(cols.right(0), 782);
    }

    #[test]
    fn test_columns_have_no_gaps() {
        let cols = ColumnSet::compute(7, 1000, 3);
        for c in 1..cols.len() {
            assert_eq!(cols.left(c), cols.right(c - 1));
        }
        assert_eq!(cols.right(6) - cols.left(0), 1000);
    }

    #[test]
    fn test_negative_width_collapses_to_zero() {
        let cols = ColumnSet::compute(2, -50, 0);
        assert_eq!(cols.lefts(), &[0, 0]);
        assert_eq!(cols.rights(), &[0, 0]);
    }
}
