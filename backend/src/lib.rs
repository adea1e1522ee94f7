//! Classbook: authorization-gated retrieval pipelines for school records.
//!
//! - [`domain`]: principals, records, the pipeline and the school use cases
//! - [`outbound`]: in-memory stores and gate adapters
//! - [`inbound`]: dispatching pipelines off the caller's thread
//! - [`example_data`]: loading a generated school into stores
//! - [`config`]: settings loaded through OrthoConfig

pub mod config;
pub mod domain;
pub mod example_data;
pub mod inbound;
pub mod outbound;

#[cfg(test)]
mod test_support;
