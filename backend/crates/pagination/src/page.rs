//! Offset/limit windows and the page envelope.

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::error::PaginationError;

/// Largest number of items a single page may hold.
pub const MAX_LIMIT: usize = 100;

/// Limit applied when a caller asks for a page without choosing a size.
pub const DEFAULT_LIMIT: usize = 20;

/// A validated window over an ordered listing.
///
/// ## Invariants
/// - `limit` is within `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    offset: usize,
    limit: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPageRequest {
    #[serde(rename = "o")]
    offset: usize,
    #[serde(rename = "l")]
    limit: usize,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] when `limit` is zero and
    /// [`PaginationError::LimitTooLarge`] when it exceeds [`MAX_LIMIT`].
    pub const fn new(offset: usize, limit: usize) -> Result<Self, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PaginationError::LimitTooLarge {
                max: MAX_LIMIT,
                actual: limit,
            });
        }
        Ok(Self { offset, limit })
    }

    /// First page using the given limit.
    ///
    /// # Errors
    ///
    /// Propagates the limit validation performed by [`PageRequest::new`].
    pub const fn first(limit: usize) -> Result<Self, PaginationError> {
        Self::new(0, limit)
    }

    /// Number of items skipped before the window starts.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of items in the window.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// The window immediately after this one.
    #[must_use]
    pub const fn following(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }

    /// Cut this window out of an already ordered listing.
    ///
    /// Order is preserved. A window past the end yields an empty page that
    /// still reports the full total.
    #[must_use]
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let window: Vec<T> = items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();
        let next = (self.offset.saturating_add(self.limit) < total)
            .then(|| Cursor::encode(&self.following()));
        Page {
            items: window,
            total,
            offset: self.offset,
            limit: self.limit,
            next,
        }
    }
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PaginationError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.offset, value.limit)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            offset: value.offset,
            limit: value.limit,
        }
    }
}

/// A window of items plus the information needed to fetch the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total: usize,
    offset: usize,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<Cursor>,
}

impl<T> Page<T> {
    /// Items inside the window, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of items in the unwindowed listing.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Offset of the first item in the window.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Limit that produced this window.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Cursor for the following window, when more items remain.
    #[must_use]
    pub const fn next(&self) -> Option<&Cursor> {
        self.next.as_ref()
    }

    /// Transform the items while keeping the envelope.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
            next: self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, PaginationError::ZeroLimit)]
    #[case(MAX_LIMIT + 1, PaginationError::LimitTooLarge { max: MAX_LIMIT, actual: MAX_LIMIT + 1 })]
    fn rejects_out_of_range_limits(#[case] limit: usize, #[case] expected: PaginationError) {
        assert_eq!(PageRequest::new(0, limit), Err(expected));
    }

    #[rstest]
    fn apply_preserves_order_and_reports_total() {
        let request = PageRequest::new(1, 2).expect("valid request");
        let page = request.apply(vec![10, 20, 30, 40]);

        assert_eq!(page.items(), &[20, 30]);
        assert_eq!(page.total(), 4);
        assert!(page.next().is_some());
    }

    #[rstest]
    fn last_window_has_no_next_cursor() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let page = request.apply(vec![1, 2, 3, 4]);

        assert_eq!(page.items(), &[3, 4]);
        assert!(page.next().is_none());
    }

    #[rstest]
    fn window_past_the_end_is_empty() {
        let request = PageRequest::new(10, 5).expect("valid request");
        let page = request.apply(vec!['a', 'b']);

        assert!(page.items().is_empty());
        assert_eq!(page.total(), 2);
        assert!(page.next().is_none());
    }

    #[rstest]
    fn map_keeps_envelope() {
        let request = PageRequest::first(1).expect("valid request");
        let page = request.apply(vec![1, 2]).map(|value| value * 10);

        assert_eq!(page.items(), &[10]);
        assert_eq!(page.total(), 2);
        assert_eq!(page.limit(), 1);
    }
}
