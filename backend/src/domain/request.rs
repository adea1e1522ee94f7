//! Request contexts handed to pipelines.
//!
//! A [`RequestContext`] is immutable once built. It carries raw, caller
//! supplied input; the pipeline validates it before consulting any gate.

use std::fmt;
use std::str::FromStr;

use pagination::{Cursor, PageRequest, PaginationError};

use crate::domain::{PipelineError, Principal, RecordId};

/// What a request selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<F> {
    /// A single record by raw identifier.
    Id(String),
    /// Every record matching a filter.
    Filter(F),
}

/// Direction of an optional sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

/// Error returned when parsing a [`SortOrder`] from a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSortOrderError;

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("asc"),
            Self::Descending => f.write_str("desc"),
        }
    }
}

impl fmt::Display for ParseSortOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sort order must be `asc` or `desc`")
    }
}

impl std::error::Error for ParseSortOrderError {}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            _ => Err(ParseSortOrderError),
        }
    }
}

/// Raw pagination input, validated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// Explicit offset and limit.
    Window {
        /// Items to skip.
        offset: usize,
        /// Maximum items to return.
        limit: usize,
    },
    /// Opaque cursor returned with a previous page.
    Cursor(String),
}

impl Pagination {
    /// Validate the input into a [`PageRequest`].
    pub fn resolve(&self) -> Result<PageRequest, PaginationError> {
        match self {
            Self::Window { offset, limit } => PageRequest::new(*offset, *limit),
            Self::Cursor(token) => Cursor::parse(token)?.decode(),
        }
    }
}

/// The principal, a selector and optional paging and sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext<F> {
    principal: Principal,
    selector: Selector<F>,
    pagination: Option<Pagination>,
    sort: Option<SortOrder>,
}

impl<F> RequestContext<F> {
    /// Select a single record by identifier.
    pub fn by_id(principal: Principal, id: impl Into<String>) -> Self {
        Self {
            principal,
            selector: Selector::Id(id.into()),
            pagination: None,
            sort: None,
        }
    }

    /// Select every record matching `filter`.
    pub fn by_filter(principal: Principal, filter: F) -> Self {
        Self {
            principal,
            selector: Selector::Filter(filter),
            pagination: None,
            sort: None,
        }
    }

    /// Request a window of the result.
    pub fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.pagination = Some(Pagination::Window { offset, limit });
        self
    }

    /// Request the window encoded in a cursor from a previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.pagination = Some(Pagination::Cursor(cursor.into()));
        self
    }

    /// Request sorted output.
    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// The acting principal.
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// What the request selects.
    pub fn selector(&self) -> &Selector<F> {
        &self.selector
    }

    /// Raw pagination input, if any.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Requested sort order, if any.
    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }
}

/// Parse a raw identifier, reporting failures as
/// [`PipelineErrorKind::Invalid`](crate::domain::PipelineErrorKind).
pub(crate) fn parse_record_id(raw: &str) -> Result<RecordId, PipelineError> {
    RecordId::new(raw).map_err(|err| PipelineError::invalid(format!("malformed selector: {err}")))
}
