//! Port for fetching and mutating raw records.
//!
//! The [`RecordStore`] trait is the repository abstraction over an
//! unreliable backing store. Every call may fail with
//! [`RecordStoreError::Unavailable`] when the store's connection check
//! fails; writes check availability before mutating and leave the prior
//! state untouched on failure.

use crate::domain::{Record, RecordId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum RecordStoreError {
        /// The backing connection is down.
        Unavailable { message: String } =>
            "record store unavailable: {message}",
        /// The store itself is unusable, for example after a writer panicked.
        Corrupted { message: String } =>
            "record store corrupted: {message}",
        /// A record offered for writing is not well formed.
        MalformedRecord { id: String, message: String } =>
            "record {id} is malformed: {message}",
        /// An insert reused an identifier that is already present.
        DuplicateId { id: String } =>
            "record {id} already exists",
        /// An insert reused an identifier that was deleted earlier.
        RetiredId { id: String } =>
            "record id {id} was retired and cannot be reused",
        /// An update or delete named a record that does not exist.
        Missing { id: String } =>
            "record {id} does not exist",
    }
}

/// Repository over records of one kind.
///
/// # Ordering
///
/// `fetch_by_filter` returns records in a deterministic order. The in-memory
/// adapter uses insertion order.
#[cfg_attr(test, mockall::automock)]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Fetch one record. `Ok(None)` means the id is unknown.
    fn fetch_by_id(&self, id: &RecordId) -> Result<Option<R>, RecordStoreError>;

    /// Fetch every record the filter selects. An empty vector is success.
    fn fetch_by_filter(&self, filter: &R::Filter) -> Result<Vec<R>, RecordStoreError>;

    /// Add a new record and return it as stored.
    fn insert(&self, record: R) -> Result<R, RecordStoreError>;

    /// Replace an existing record and return it as stored.
    fn update(&self, record: R) -> Result<R, RecordStoreError>;

    /// Remove a record and return it. Its id is retired.
    fn delete(&self, id: &RecordId) -> Result<R, RecordStoreError>;
}
