//! Span sizes: how many columns each item occupies.

use std::fmt;

use tracing::warn;

use crate::StrategyError;

/// Determines how many columns the item at `position` occupies.
///
/// Implementations should return a value in `1..=column_count`; anything
/// outside that range is clamped. Returning an error makes the item fall
/// back to a single column.
pub trait SpanSizeLookup {
    fn span_size(&self, position: usize) -> Result<usize, StrategyError>;
}

/// Every item occupies one column.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSpanSizeLookup;

impl SpanSizeLookup for DefaultSpanSizeLookup {
    fn span_size(&self, _position: usize) -> Result<usize, StrategyError> {
        Ok(1)
    }
}

/// Adapts an infallible closure into a [`SpanSizeLookup`].
///
/// Only an `Err` from a lookup triggers the single-column fallback. A
/// closure that panics is not caught; lookups that can fail should
/// implement [`SpanSizeLookup`] directly and return an error instead.
///
/// ```
/// use fixedgrid_core_layout::{SpanSizeFn, SpanSizeLookup};
///
/// let lookup = SpanSizeFn::new(|position| if position % 9 == 6 { 3 } else { 1 });
/// assert_eq!(lookup.span_size(6).unwrap(), 3);
/// ```
#[derive(Clone, Copy)]
pub struct SpanSizeFn<F>(pub F);

impl<F> SpanSizeFn<F>
where
    F: Fn(usize) -> usize,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> SpanSizeLookup for SpanSizeFn<F>
where
    F: Fn(usize) -> usize,
{
    fn span_size(&self, position: usize) -> Result<usize, StrategyError> {
        Ok((self.0)(position))
    }
}

impl<F> fmt::Debug for SpanSizeFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SpanSizeFn(..)")
    }
}

/// Resolves span sizes through the installed lookup, never failing.
pub struct SpanResolver {
    lookup: Box<dyn SpanSizeLookup>,
}

impl SpanResolver {
    pub fn new(lookup: Box<dyn SpanSizeLookup>) -> Self {
        Self { lookup }
    }

    /// Span of the item at `position`, clamped into `1..=column_count`.
    pub fn span_for(&self, position: usize, column_count: usize) -> usize {
        match self.lookup.span_size(position) {
            Ok(span) => span.clamp(1, column_count.max(1)),
            Err(e) => {
                warn!("Span lookup failed, using a single column: {}", e);
                1
            }
        }
    }
}

impl Default for SpanResolver {
    fn default() -> Self {
        Self::new(Box::new(DefaultSpanSizeLookup))
    }
}

impl fmt::Debug for SpanResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingAt(usize);

    impl SpanSizeLookup for FailingAt {
        fn span_size(&self, position: usize) -> Result<usize, StrategyError> {
            if position == self.0 {
                Err(StrategyError::SpanLookup {
                    position,
                    reason: "boom".to_string(),
                })
            } else {
                Ok(2)
            }
        }
    }

    #[test]
    fn test_default_is_single_column() {
        let resolver = SpanResolver::default();
        for p in 0..10 {
            assert_eq!(resolver.span_for(p, 4), 1);
        }
    }

    #[test]
    fn test_span_is_clamped_into_column_range() {
        let resolver = SpanResolver::new(Box::new(SpanSizeFn::new(|p| p)));
        assert_eq!(resolver.span_for(0, 3), 1); // zero -> 1
        assert_eq!(resolver.span_for(2, 3), 2);
        assert_eq!(resolver.span_for(9, 3), 3); // too wide -> column_count
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_panicking_closure_is_not_recovered() {
        let spans = vec![1, 2];
        let resolver = SpanResolver::new(Box::new(SpanSizeFn::new(move |p| spans[p])));
        assert_eq!(resolver.span_for(1, 3), 2);
        resolver.span_for(5, 3);
    }

    #[test]
    fn test_lookup_error_falls_back_to_one() {
        let resolver = SpanResolver::new(Box::new(FailingAt(5)));
        assert_eq!(resolver.span_for(4, 3), 2);
        assert_eq!(resolver.span_for(5, 3), 1);
        assert_eq!(resolver.span_for(6, 3), 2);
    }
}
