//! Inbound adapters that drive pipelines on behalf of a front end.
//!
//! [`dispatch`] keeps pipeline calls off the caller's thread and [`view`]
//! turns their outcomes into presentation-ready values.

pub mod dispatch;
pub mod view;

pub use dispatch::{Abandoner, DispatchOutcome, PendingOutcome, PipelineDispatcher};
pub use view::{ErrorView, OutcomeView};
