//! Built-in demo dataset.

use crate::scene::{Scene, SceneItem};

/// Items in the default demo dataset.
pub const DEFAULT_ITEMS: usize = 120;

/// Height of demo item `i`, with a tall item every 13th position.
pub fn sample_height(i: usize) -> i32 {
    80 + (i % 10) as i32 * 25 + if i % 13 == 0 { 120 } else { 0 }
}

/// Span of demo item `i` for a grid of `column_count` columns.
pub fn sample_span(i: usize, column_count: usize) -> usize {
    if i % 9 == 6 {
        column_count
    } else if i % 7 == 3 {
        column_count.min(2)
    } else {
        1
    }
}

/// Build the demo scene: mixed heights, periodic full-span and double-span
/// items, and a few items pinned to the first column.
pub fn sample_scene(items: usize, column_count: usize) -> Scene {
    let items = (0..items)
        .map(|i| SceneItem {
            height: sample_height(i),
            span: Some(sample_span(i, column_count)),
            pin: (i % 11 == 4).then_some(0),
        })
        .collect();

    Scene { grid: None, items }
}
