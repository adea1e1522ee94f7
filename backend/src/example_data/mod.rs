//! Example school wiring.
//!
//! Generates the configured seed from the `example-data` crate and loads it
//! into in-memory stores plus a name directory.

mod dataset;
mod startup;

pub use dataset::{DatasetError, SchoolDataset, capabilities_for, principal_for};
pub use startup::{StartupError, generate_school, load_example_school, load_registry};
