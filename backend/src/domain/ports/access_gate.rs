//! Port deciding whether a principal may perform an operation.

use crate::domain::{Capability, Principal};

/// Authorization policy consulted once per pipeline execution.
///
/// Gates answer yes or no. They never explain a refusal to the caller; the
/// pipeline turns `false` into a generic
/// [`PipelineErrorKind::Unauthorized`](crate::domain::PipelineErrorKind).
#[cfg_attr(test, mockall::automock)]
pub trait AccessGate: Send + Sync {
    /// Whether `principal` may perform an operation requiring `required`.
    fn authorize(&self, principal: &Principal, required: &Capability) -> bool;
}

/// Fixture gate that authorizes every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccessGate;

impl AccessGate for FixtureAccessGate {
    fn authorize(&self, _principal: &Principal, _required: &Capability) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrincipalId;

    #[test]
    fn fixture_gate_authorizes_everything() {
        let principal = Principal::new(PrincipalId::new("p-1").expect("valid id"), []);
        assert!(FixtureAccessGate.authorize(&principal, &Capability::Director));
    }
}
