//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates, so small builders and the
//! call-counting store live here instead of being copied between files.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use classbook::domain::ports::{AvailabilityGate, RecordStore, RecordStoreError};
use classbook::domain::school::Register;
use classbook::domain::{
    Capability, Principal, PrincipalId, Record, RecordId, expand_capabilities,
};
use classbook::outbound::{FixedAvailabilityGate, InMemoryNameDirectory, InMemoryRecordStore};

pub const CURRENT_YEAR: &str = "2023-2024";
pub const PREVIOUS_YEAR: &str = "2022-2023";

/// A principal holding `capabilities`.
pub fn principal(id: &str, capabilities: impl IntoIterator<Item = Capability>) -> Principal {
    Principal::new(
        PrincipalId::new(id).expect("valid principal id"),
        expand_capabilities(capabilities),
    )
}

pub fn administrator() -> Principal {
    principal("admin-1", [Capability::Administrator])
}

pub fn register(id: &str, class_id: &str, year: &str) -> Register {
    Register {
        id: RecordId::new(id).expect("valid record id"),
        class_id: class_id.to_owned(),
        academic_year: year.to_owned(),
    }
}

/// Class names for the registers built by [`school_registers`].
pub fn class_directory() -> Arc<InMemoryNameDirectory> {
    Arc::new(InMemoryNameDirectory::new([
        ("c-3a", "3A"),
        ("c-3b", "3B"),
        ("c-4a", "4A"),
    ]))
}

/// Two registers for the current year and one for the previous year.
pub fn school_registers() -> Vec<Register> {
    vec![
        register("reg-1", "c-3b", CURRENT_YEAR),
        register("reg-2", "c-4a", PREVIOUS_YEAR),
        register("reg-3", "c-3a", CURRENT_YEAR),
    ]
}

/// Record store wrapper counting every call made through the port.
pub struct CountingStore<R: Record> {
    inner: InMemoryRecordStore<R>,
    calls: AtomicUsize,
}

impl<R: Record> CountingStore<R> {
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        let gate: Arc<dyn AvailabilityGate> = Arc::new(FixedAvailabilityGate::up());
        Self {
            inner: InMemoryRecordStore::with_records(gate, records).expect("records load"),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<R: Record> RecordStore<R> for CountingStore<R> {
    fn fetch_by_id(&self, id: &RecordId) -> Result<Option<R>, RecordStoreError> {
        self.count();
        self.inner.fetch_by_id(id)
    }

    fn fetch_by_filter(&self, filter: &R::Filter) -> Result<Vec<R>, RecordStoreError> {
        self.count();
        self.inner.fetch_by_filter(filter)
    }

    fn insert(&self, record: R) -> Result<R, RecordStoreError> {
        self.count();
        self.inner.insert(record)
    }

    fn update(&self, record: R) -> Result<R, RecordStoreError> {
        self.count();
        self.inner.update(record)
    }

    fn delete(&self, id: &RecordId) -> Result<R, RecordStoreError> {
        self.count();
        self.inner.delete(id)
    }
}
