//! Running synchronous pipelines off the caller's thread.
//!
//! A presentation layer must not block its interaction thread on a
//! pipeline. [`PipelineDispatcher`] runs each call on Tokio's blocking pool
//! and hands back a [`PendingOutcome`] future, or invokes a completion
//! callback.
//!
//! A caller may abandon a pending call, for example when the operator closes
//! a window. Anyone still waiting then sees [`DispatchOutcome::Abandoned`],
//! which is never confused with an unavailable backend. The job itself runs
//! to completion, so an in-flight write still lands or fails as a whole.

use std::any::Any;
use std::sync::Arc;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinError;
use tracing::{debug, error};

/// How a dispatched call ended, from the caller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome<T> {
    /// The job returned a value, which may itself be a pipeline error.
    Completed(T),
    /// The caller gave up waiting.
    Abandoned,
    /// The job panicked.
    Crashed(String),
}

impl<T> DispatchOutcome<T> {
    /// The job's value, if it completed.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Abandoned | Self::Crashed(_) => None,
        }
    }
}

/// Lets any holder abandon a pending call.
#[derive(Debug, Clone)]
pub struct Abandoner {
    signal: Arc<watch::Sender<bool>>,
}

impl Abandoner {
    /// Stop waiting. Waiters resolve to [`DispatchOutcome::Abandoned`].
    pub fn abandon(&self) {
        self.signal.send_replace(true);
    }
}

/// Future result of a dispatched call.
#[derive(Debug)]
pub struct PendingOutcome<T> {
    receiver: oneshot::Receiver<DispatchOutcome<T>>,
    abandoned: watch::Receiver<bool>,
    abandoner: Abandoner,
}

impl<T> PendingOutcome<T> {
    /// A handle that abandons this call.
    pub fn abandoner(&self) -> Abandoner {
        self.abandoner.clone()
    }

    /// Abandon the call without waiting.
    pub fn abandon(self) {
        self.abandoner.abandon();
    }

    /// Wait for the call to finish or be abandoned.
    pub async fn outcome(mut self) -> DispatchOutcome<T> {
        if *self.abandoned.borrow() {
            return DispatchOutcome::Abandoned;
        }
        tokio::select! {
            biased;
            _ = self.abandoned.wait_for(|flag| *flag) => DispatchOutcome::Abandoned,
            result = &mut self.receiver => result.unwrap_or(DispatchOutcome::Abandoned),
        }
    }
}

/// Schedules pipeline calls on a Tokio runtime's blocking pool.
#[derive(Debug, Clone)]
pub struct PipelineDispatcher {
    handle: Handle,
}

impl PipelineDispatcher {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Fails when called outside a Tokio runtime.
    pub fn try_current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }

    /// Run `job` on the blocking pool.
    pub fn dispatch<F, T>(&self, name: &'static str, job: F) -> PendingOutcome<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let (signal, abandoned) = watch::channel(false);
        let task = self.handle.spawn_blocking(job);
        self.handle.spawn(async move {
            let outcome = match task.await {
                Ok(value) => DispatchOutcome::Completed(value),
                Err(err) => crashed(name, err),
            };
            if sender.send(outcome).is_err() {
                debug!(job = name, "dispatch outcome discarded by caller");
            }
        });
        PendingOutcome {
            receiver,
            abandoned,
            abandoner: Abandoner {
                signal: Arc::new(signal),
            },
        }
    }

    /// Run `job` on the blocking pool and pass its outcome to `on_complete`.
    ///
    /// The callback runs on a runtime worker exactly once, with
    /// [`DispatchOutcome::Abandoned`] if the returned handle is used first.
    pub fn dispatch_with<F, T, C>(&self, name: &'static str, job: F, on_complete: C) -> Abandoner
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
        C: FnOnce(DispatchOutcome<T>) + Send + 'static,
    {
        let pending = self.dispatch(name, job);
        let abandoner = pending.abandoner();
        self.handle.spawn(async move {
            on_complete(pending.outcome().await);
        });
        abandoner
    }
}

fn crashed<T>(name: &'static str, err: JoinError) -> DispatchOutcome<T> {
    let message = if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        "job was cancelled by the runtime".to_owned()
    };
    error!(job = name, %message, "dispatched job crashed");
    DispatchOutcome::Crashed(message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast::<String>()
        .map(|message| *message)
        .or_else(|payload| payload.downcast::<&'static str>().map(|message| (*message).to_owned()))
        .unwrap_or_else(|_| "job panicked".to_owned())
}
