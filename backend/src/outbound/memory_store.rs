//! In-memory record store.
//!
//! Records live in a `RwLock`-guarded map with a separate insertion-order
//! index, so filtered reads come back in the order records were added.
//! Every call consults the injected [`AvailabilityGate`] before taking the
//! lock. Writes validate first and mutate last, holding the write lock only
//! for that one mutation; a failed write leaves the store as it was.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::domain::ports::{AvailabilityGate, RecordStore, RecordStoreError};
use crate::domain::{Record, RecordFilter, RecordId};

#[derive(Debug)]
struct Contents<R> {
    records: HashMap<RecordId, R>,
    order: Vec<RecordId>,
    retired: HashSet<RecordId>,
}

impl<R> Default for Contents<R> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            retired: HashSet::new(),
        }
    }
}

/// Process-local [`RecordStore`] for one record kind.
///
/// Identifiers are never reused: deleting a record retires its id and any
/// later insert with that id fails with [`RecordStoreError::RetiredId`].
pub struct InMemoryRecordStore<R> {
    contents: RwLock<Contents<R>>,
    gate: Arc<dyn AvailabilityGate>,
}

impl<R: Record> InMemoryRecordStore<R> {
    /// Create an empty store guarded by `gate`.
    pub fn new(gate: Arc<dyn AvailabilityGate>) -> Self {
        Self {
            contents: RwLock::new(Contents::default()),
            gate,
        }
    }

    /// Create a store pre-populated with `records`, bypassing the gate.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed or duplicate record; nothing is kept in
    /// that case.
    pub fn with_records(
        gate: Arc<dyn AvailabilityGate>,
        records: impl IntoIterator<Item = R>,
    ) -> Result<Self, RecordStoreError> {
        let mut contents = Contents::default();
        for record in records {
            Self::admit_new(&contents, &record)?;
            Self::append(&mut contents, record);
        }
        Ok(Self {
            contents: RwLock::new(contents),
            gate,
        })
    }

    /// Number of live records, bypassing the gate.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Corrupted`] if a writer panicked.
    pub fn len(&self) -> Result<usize, RecordStoreError> {
        Ok(self.read()?.records.len())
    }

    /// Whether the store holds no live records.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Corrupted`] if a writer panicked.
    pub fn is_empty(&self) -> Result<bool, RecordStoreError> {
        Ok(self.len()? == 0)
    }

    /// Drop every record and forget retired ids.
    ///
    /// # Errors
    ///
    /// Returns [`RecordStoreError::Corrupted`] if a writer panicked.
    pub fn clear(&self) -> Result<(), RecordStoreError> {
        *self.write()? = Contents::default();
        Ok(())
    }

    fn ensure_available(&self) -> Result<(), RecordStoreError> {
        if self.gate.check_available() {
            Ok(())
        } else {
            warn!(kind = R::KIND, "record store connection check failed");
            Err(RecordStoreError::unavailable("connection check failed"))
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Contents<R>>, RecordStoreError> {
        self.contents
            .read()
            .map_err(|_| RecordStoreError::corrupted(format!("{} store lock poisoned", R::KIND)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Contents<R>>, RecordStoreError> {
        self.contents
            .write()
            .map_err(|_| RecordStoreError::corrupted(format!("{} store lock poisoned", R::KIND)))
    }

    fn check(record: &R) -> Result<(), RecordStoreError> {
        record
            .check()
            .map_err(|message| RecordStoreError::malformed_record(record.id().to_string(), message))
    }

    fn admit_new(contents: &Contents<R>, record: &R) -> Result<(), RecordStoreError> {
        Self::check(record)?;
        let id = record.id();
        if contents.retired.contains(id) {
            return Err(RecordStoreError::retired_id(id.to_string()));
        }
        if contents.records.contains_key(id) {
            return Err(RecordStoreError::duplicate_id(id.to_string()));
        }
        Ok(())
    }

    fn append(contents: &mut Contents<R>, record: R) {
        let id = record.id().clone();
        contents.order.push(id.clone());
        contents.records.insert(id, record);
    }
}

impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    fn fetch_by_id(&self, id: &RecordId) -> Result<Option<R>, RecordStoreError> {
        self.ensure_available()?;
        Ok(self.read()?.records.get(id).cloned())
    }

    fn fetch_by_filter(&self, filter: &R::Filter) -> Result<Vec<R>, RecordStoreError> {
        self.ensure_available()?;
        let contents = self.read()?;
        Ok(contents
            .order
            .iter()
            .filter_map(|id| contents.records.get(id))
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn insert(&self, record: R) -> Result<R, RecordStoreError> {
        self.ensure_available()?;
        let mut contents = self.write()?;
        Self::admit_new(&contents, &record)?;
        Self::append(&mut contents, record.clone());
        Ok(record)
    }

    fn update(&self, record: R) -> Result<R, RecordStoreError> {
        self.ensure_available()?;
        Self::check(&record)?;
        let mut contents = self.write()?;
        let slot = contents
            .records
            .get_mut(record.id())
            .ok_or_else(|| RecordStoreError::missing(record.id().to_string()))?;
        *slot = record.clone();
        Ok(record)
    }

    fn delete(&self, id: &RecordId) -> Result<R, RecordStoreError> {
        self.ensure_available()?;
        let mut contents = self.write()?;
        let removed = contents
            .records
            .remove(id)
            .ok_or_else(|| RecordStoreError::missing(id.to_string()))?;
        contents.order.retain(|entry| entry != id);
        contents.retired.insert(id.clone());
        Ok(removed)
    }
}
