//! Presentation views of pipeline outcomes.
//!
//! Purpose: keep [`PipelineError`] free of display concerns while giving
//! every front end the same title, message and retry hint for a failure.

use serde::Serialize;

use super::dispatch::DispatchOutcome;
use crate::domain::{PipelineError, PipelineErrorKind, PipelineResult, Severity};

const CRASH_MESSAGE: &str = "the operation failed unexpectedly";

fn title_for(kind: PipelineErrorKind) -> &'static str {
    match kind {
        PipelineErrorKind::Unavailable => "Connection interrupted",
        PipelineErrorKind::Unauthorized => "Not authorized",
        PipelineErrorKind::NotFound => "Nothing found",
        PipelineErrorKind::Invalid => "Invalid request",
    }
}

/// What a front end shows for a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub kind: PipelineErrorKind,
    pub title: &'static str,
    pub message: String,
    pub retryable: bool,
    pub severity: Severity,
}

impl From<&PipelineError> for ErrorView {
    fn from(error: &PipelineError) -> Self {
        let kind = error.kind();
        Self {
            kind,
            title: title_for(kind),
            message: error.message().to_owned(),
            retryable: error.is_retryable(),
            severity: error.severity(),
        }
    }
}

/// Serializable view of a dispatched pipeline call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeView<T> {
    Succeeded { data: T },
    Failed { error: ErrorView },
    Abandoned,
    /// Panic details stay in the log.
    Crashed { message: &'static str },
}

impl<T> From<PipelineResult<T>> for OutcomeView<T> {
    fn from(result: PipelineResult<T>) -> Self {
        match result {
            Ok(data) => Self::Succeeded { data },
            Err(error) => Self::Failed {
                error: ErrorView::from(&error),
            },
        }
    }
}

impl<T> From<DispatchOutcome<PipelineResult<T>>> for OutcomeView<T> {
    fn from(outcome: DispatchOutcome<PipelineResult<T>>) -> Self {
        match outcome {
            DispatchOutcome::Completed(result) => result.into(),
            DispatchOutcome::Abandoned => Self::Abandoned,
            DispatchOutcome::Crashed(_) => Self::Crashed {
                message: CRASH_MESSAGE,
            },
        }
    }
}
