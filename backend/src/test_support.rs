//! Shared fixtures for unit tests in `src/`.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{AccessGate, AvailabilityGate, MockAccessGate, MockAvailabilityGate};
use crate::domain::{Capability, Gates, Principal, PrincipalId, expand_capabilities};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 7, 8, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

/// A principal holding `capabilities` after implications are applied.
pub(crate) fn principal(id: &str, capabilities: impl IntoIterator<Item = Capability>) -> Principal {
    Principal::new(
        PrincipalId::new(id).expect("valid principal id"),
        expand_capabilities(capabilities),
    )
}

/// Gates answering every check with fixed values.
pub(crate) fn fixed_gates(available: bool, authorized: bool) -> Gates {
    let mut availability = MockAvailabilityGate::new();
    availability.expect_check_available().return_const(available);
    let mut access = MockAccessGate::new();
    access.expect_authorize().return_const(authorized);
    gates(availability, access)
}

pub(crate) fn gates(
    availability: impl AvailabilityGate + 'static,
    access: impl AccessGate + 'static,
) -> Gates {
    Gates::new(Arc::new(availability), Arc::new(access))
}
