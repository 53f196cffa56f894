//! Invariant checkers over a set of placements.
//!
//! Used by hosts that want to verify a layout, and by the test suites.

use crate::Placement;

/// Find the first pair of placements whose rectangles overlap.
///
/// Returns the two positions, smaller first.
pub fn find_overlap(placements: &[Placement]) -> Option<(usize, usize)> {
    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if a.rect.intersects(&b.rect) {
                return Some((a.position.min(b.position), a.position.max(b.position)));
            }
        }
    }
    None
}

/// Find an item placed after a full-span item that starts above its bottom.
///
/// Returns `(full_span_position, offending_position)`.
pub fn find_full_span_violation(
    placements: &[Placement],
    column_count: usize,
) -> Option<(usize, usize)> {
    let mut ordered: Vec<&Placement> = placements.iter().collect();
    ordered.sort_by_key(|p| p.position);

    let mut floor: Option<(usize, i32)> = None;
    for p in ordered {
        if let Some((full, bottom)) = floor {
            if p.rect.top < bottom {
                return Some((full, p.position));
            }
        }
        if p.span == column_count {
            floor = Some((p.position, p.rect.bottom));
        }
    }
    None
}
