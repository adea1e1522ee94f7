//! Availability gate adapters.
//!
//! - [`FixedAvailabilityGate`]: always answers the same way.
//! - [`SwitchAvailabilityGate`]: an operator-controlled switch.
//! - [`FlakyAvailabilityGate`]: seeded fault injection for demos.
//! - [`ProbeAvailabilityGate`]: a [`ConnectivityProbe`] with a deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::ports::{AvailabilityGate, ConnectivityProbe, ProbeError};

/// Gate with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAvailabilityGate {
    available: bool,
}

impl FixedAvailabilityGate {
    pub fn new(available: bool) -> Self {
        Self { available }
    }

    /// A gate that is always up.
    pub fn up() -> Self {
        Self::new(true)
    }

    /// A gate that is always down.
    pub fn down() -> Self {
        Self::new(false)
    }
}

impl AvailabilityGate for FixedAvailabilityGate {
    fn check_available(&self) -> bool {
        self.available
    }
}

/// Gate an operator can flip at runtime, for example to simulate the
/// connection to the server being interrupted.
#[derive(Debug, Default)]
pub struct SwitchAvailabilityGate {
    available: AtomicBool,
}

impl SwitchAvailabilityGate {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
        }
    }

    /// Mark the backing service unreachable.
    pub fn interrupt(&self) {
        self.available.store(false, Ordering::SeqCst);
    }

    /// Mark the backing service reachable again.
    pub fn restore(&self) {
        self.available.store(true, Ordering::SeqCst);
    }
}

impl AvailabilityGate for SwitchAvailabilityGate {
    fn check_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

/// Error returned when a fault probability lies outside `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("fault probability must lie within 0.0..=1.0, got {0}")]
pub struct FaultProbabilityError(pub f64);

/// Gate that reports an interruption with a fixed probability per check.
///
/// With a seed the sequence of answers is reproducible.
#[derive(Debug)]
pub struct FlakyAvailabilityGate {
    failure_probability: f64,
    rng: Mutex<SmallRng>,
}

impl FlakyAvailabilityGate {
    /// Create a gate failing with `failure_probability`, seeded from `seed`
    /// or from system entropy when absent.
    ///
    /// # Errors
    ///
    /// Returns [`FaultProbabilityError`] when the probability is not a
    /// number between zero and one.
    pub fn new(failure_probability: f64, seed: Option<u64>) -> Result<Self, FaultProbabilityError> {
        if !(0.0..=1.0).contains(&failure_probability) {
            return Err(FaultProbabilityError(failure_probability));
        }
        let rng = seed.map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        Ok(Self {
            failure_probability,
            rng: Mutex::new(rng),
        })
    }

    pub fn failure_probability(&self) -> f64 {
        self.failure_probability
    }
}

impl AvailabilityGate for FlakyAvailabilityGate {
    fn check_available(&self) -> bool {
        let Ok(mut rng) = self.rng.lock() else {
            warn!("fault injector lock poisoned; reporting unavailable");
            return false;
        };
        let interrupted = rng.gen_bool(self.failure_probability);
        if interrupted {
            debug!(
                probability = self.failure_probability,
                "injected connection interruption"
            );
        }
        !interrupted
    }
}

/// Gate running a [`ConnectivityProbe`] with a deadline.
///
/// The probe runs on a helper thread. If it does not answer within the
/// timeout the gate reports unavailable and the helper is left to finish on
/// its own. At most one probe is in flight: while a stalled helper is still
/// running, checks report unavailable without starting another.
pub struct ProbeAvailabilityGate {
    probe: Arc<dyn ConnectivityProbe>,
    timeout: Duration,
    in_flight: Arc<AtomicBool>,
}

impl ProbeAvailabilityGate {
    pub fn new(probe: Arc<dyn ConnectivityProbe>, timeout: Duration) -> Self {
        Self {
            probe,
            timeout,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    fn probe_within_deadline(&self) -> Result<(), ProbeError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ProbeError::stalled());
        }

        let (sender, receiver) = mpsc::sync_channel(1);
        let probe = Arc::clone(&self.probe);
        let in_flight = Arc::clone(&self.in_flight);
        let spawned = thread::Builder::new()
            .name("connectivity-probe".to_owned())
            .spawn(move || {
                let result = probe.probe();
                in_flight.store(false, Ordering::Release);
                // The receiver may have given up already.
                let _ = sender.send(result);
            });
        if let Err(err) = spawned {
            self.in_flight.store(false, Ordering::Release);
            return Err(ProbeError::refused(format!("failed to start probe: {err}")));
        }

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        match receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(ProbeError::timed_out(timeout_ms)),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(ProbeError::refused("probe thread exited without answering"))
            }
        }
    }
}

impl AvailabilityGate for ProbeAvailabilityGate {
    fn check_available(&self) -> bool {
        match self.probe_within_deadline() {
            Ok(()) => true,
            Err(err) => {
                warn!(error_kind = err.variant_name(), %err, "connectivity probe failed");
                false
            }
        }
    }
}
