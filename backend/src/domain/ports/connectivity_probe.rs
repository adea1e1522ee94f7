//! Port for probing the backing service's connection.

use super::define_port_error;

define_port_error! {
    /// Errors raised by connectivity probes.
    pub enum ProbeError {
        /// The remote end refused or dropped the connection.
        Refused { message: String } => "connectivity probe refused: {message}",
        /// The probe did not answer within its deadline.
        TimedOut { timeout_ms: u64 } => "connectivity probe timed out after {timeout_ms}ms",
        /// An earlier probe is still running past its deadline.
        Stalled => "an earlier connectivity probe has not returned",
    }
}

/// A single connectivity check against the backing service.
///
/// Probes may block; callers that need a bounded answer wrap them with a
/// timeout.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectivityProbe: Send + Sync {
    /// Run the probe once.
    fn probe(&self) -> Result<(), ProbeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn timeout_error_formats_deadline() {
        let err = ProbeError::timed_out(2000_u64);
        assert_eq!(
            err.to_string(),
            "connectivity probe timed out after 2000ms"
        );
        assert_eq!(err.variant_name(), "timed_out");
    }
}
