//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod access_gate;
mod availability_gate;
mod connectivity_probe;
mod name_directory;
mod record_store;

#[cfg(test)]
pub use access_gate::MockAccessGate;
pub use access_gate::{AccessGate, FixtureAccessGate};
#[cfg(test)]
pub use availability_gate::MockAvailabilityGate;
pub use availability_gate::{AvailabilityGate, FixtureAvailabilityGate};
#[cfg(test)]
pub use connectivity_probe::MockConnectivityProbe;
pub use connectivity_probe::{ConnectivityProbe, ProbeError};
#[cfg(test)]
pub use name_directory::MockNameDirectory;
pub use name_directory::{FixtureNameDirectory, NameDirectory};
#[cfg(test)]
pub use record_store::MockRecordStore;
pub use record_store::{RecordStore, RecordStoreError};
