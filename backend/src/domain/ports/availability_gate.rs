//! Port reporting whether the backing service is usable.
//!
//! Availability is a distinct signal from "not found" and "access denied":
//! a `false` answer aborts a pipeline with
//! [`PipelineErrorKind::Unavailable`](crate::domain::PipelineErrorKind)
//! before authorization or any fetch is attempted.

/// Reports connectivity to the backing service.
#[cfg_attr(test, mockall::automock)]
pub trait AvailabilityGate: Send + Sync {
    /// Whether the backing service can currently be used.
    ///
    /// Implementations must not block indefinitely and must have no side
    /// effects beyond reading connectivity state.
    fn check_available(&self) -> bool;
}

/// Fixture gate that always reports the service as available.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAvailabilityGate;

impl AvailabilityGate for FixtureAvailabilityGate {
    fn check_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_gate_is_available() {
        assert!(FixtureAvailabilityGate.check_available());
    }
}
