//! Access gate adapters.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::ports::AccessGate;
use crate::domain::{Capability, Principal};

/// Grants a request when the principal holds the required capability.
///
/// There is no hierarchy inside the gate; apply
/// [`expand_capabilities`](crate::domain::expand_capabilities) when building
/// principals instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapabilityAccessGate;

impl AccessGate for CapabilityAccessGate {
    fn authorize(&self, principal: &Principal, required: &Capability) -> bool {
        principal.holds(required)
    }
}

/// Wraps another gate and refuses a fixed set of capabilities outright.
pub struct DenyingAccessGate {
    inner: Arc<dyn AccessGate>,
    denied: BTreeSet<Capability>,
}

impl DenyingAccessGate {
    pub fn new(inner: Arc<dyn AccessGate>, denied: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            inner,
            denied: denied.into_iter().collect(),
        }
    }
}

impl AccessGate for DenyingAccessGate {
    fn authorize(&self, principal: &Principal, required: &Capability) -> bool {
        !self.denied.contains(required) && self.inner.authorize(principal, required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAccessGate;
    use crate::domain::{PrincipalId, expand_capabilities};
    use rstest::rstest;

    fn principal(capabilities: impl IntoIterator<Item = Capability>) -> Principal {
        Principal::new(
            PrincipalId::new("p-1").expect("valid id"),
            expand_capabilities(capabilities),
        )
    }

    #[rstest]
    #[case(vec![Capability::Administrator], Capability::Administrator, true)]
    #[case(vec![Capability::Teacher], Capability::Administrator, false)]
    #[case(vec![Capability::Director], Capability::Administrator, true)]
    #[case(vec![Capability::Administrator], Capability::Director, false)]
    #[case(vec![], Capability::Student, false)]
    fn membership_decides(
        #[case] granted: Vec<Capability>,
        #[case] required: Capability,
        #[case] expected: bool,
    ) {
        assert_eq!(
            CapabilityAccessGate.authorize(&principal(granted), &required),
            expected
        );
    }

    #[rstest]
    fn denied_capabilities_skip_the_inner_gate() {
        let mut inner = MockAccessGate::new();
        inner.expect_authorize().times(0);
        let gate = DenyingAccessGate::new(Arc::new(inner), [Capability::Administrator]);

        assert!(!gate.authorize(
            &principal([Capability::Administrator]),
            &Capability::Administrator
        ));
    }

    #[rstest]
    fn other_capabilities_defer_to_inner_gate() {
        let gate = DenyingAccessGate::new(Arc::new(CapabilityAccessGate), [Capability::Administrator]);

        assert!(gate.authorize(&principal([Capability::Teacher]), &Capability::Teacher));
        assert!(!gate.authorize(&principal([Capability::Parent]), &Capability::Teacher));
    }
}
