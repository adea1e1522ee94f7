//! Outbound adapters implementing domain ports.
//!
//! - **memory_store**: `RwLock`-guarded record stores
//! - **availability**: fixed, switchable, flaky and probing availability gates
//! - **access**: capability membership gates
//! - **directory**: id to display-name lookup
//!
//! Adapters are thin translators between domain ports and process-local
//! state. They contain no use-case logic.

mod access;
mod availability;
mod directory;
mod memory_store;

pub use access::{CapabilityAccessGate, DenyingAccessGate};
pub use availability::{
    FaultProbabilityError, FixedAvailabilityGate, FlakyAvailabilityGate, ProbeAvailabilityGate,
    SwitchAvailabilityGate,
};
pub use directory::InMemoryNameDirectory;
pub use memory_store::InMemoryRecordStore;
