//! Raw domain records and the identifiers and filters that select them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Principal;

/// Validation errors returned by [`RecordId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIdValidationError {
    Empty,
    Padded,
}

impl fmt::Display for RecordIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "record id must not be empty"),
            Self::Padded => write!(f, "record id must not have surrounding whitespace"),
        }
    }
}

impl std::error::Error for RecordIdValidationError {}

/// Stable unique identifier of a record within its store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Validate and construct a [`RecordId`].
    ///
    /// # Examples
    /// ```
    /// use classbook::domain::RecordId;
    ///
    /// assert!(RecordId::new("reg-1").is_ok());
    /// assert!(RecordId::new("  ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, RecordIdValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RecordIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(RecordIdValidationError::Padded);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A raw entity as stored.
pub trait Record: Clone + fmt::Debug + Send + Sync + 'static {
    /// Filter type used to select records of this kind.
    type Filter: RecordFilter<Self>;

    /// Short noun used in log fields and error messages, such as `register`.
    const KIND: &'static str;

    /// Records of this kind belong to one principal, who alone may read or
    /// write them.
    const OWNER_SCOPED: bool = false;

    /// Identifier of this record.
    fn id(&self) -> &RecordId;

    /// Check the record is well formed before it is written.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    /// Stamp the time of a successful write. Records without a modification
    /// timestamp ignore this.
    fn touch(&mut self, _at: DateTime<Utc>) {}

    /// Principal id owning this record, for owner-scoped kinds.
    fn owner(&self) -> Option<&str> {
        None
    }
}

/// Selects a subset of records of one kind.
pub trait RecordFilter<R>: Clone + fmt::Debug + Send + Sync + 'static {
    /// Reject malformed filters before any gate or store is consulted.
    fn validate(&self) -> Result<(), String>;

    /// Whether `record` belongs to the selection.
    fn matches(&self, record: &R) -> bool;

    /// Owner the selection is restricted to, for owner-scoped kinds.
    fn owner(&self) -> Option<&str> {
        None
    }
}

/// Whether `principal` may see or change a record owned by `owner`.
pub(crate) fn owned_by(principal: &Principal, owner: Option<&str>) -> bool {
    owner.is_none_or(|id| id == AsRef::<str>::as_ref(principal.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", RecordIdValidationError::Empty)]
    #[case("   ", RecordIdValidationError::Empty)]
    #[case(" r-1", RecordIdValidationError::Padded)]
    #[case("r-1\n", RecordIdValidationError::Padded)]
    fn record_id_rejects_malformed_input(
        #[case] raw: &str,
        #[case] expected: RecordIdValidationError,
    ) {
        assert_eq!(RecordId::new(raw), Err(expected));
    }

    #[rstest]
    fn record_id_displays_raw_value() {
        let id = RecordId::new("NONEXISTENT").expect("valid id");
        assert_eq!(id.to_string(), "NONEXISTENT");
        assert_eq!(id.as_ref(), "NONEXISTENT");
    }
}
