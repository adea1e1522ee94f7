//! Pipeline stages and the trail each execution leaves behind.

use std::fmt;

use tracing::{debug, info};

use crate::domain::{PipelineError, PipelineErrorKind, Principal};

/// A step in a pipeline execution.
///
/// Query pipelines move through `Idle → Validating → CheckingAvailability →
/// CheckingAuthorization → Fetching → Mapping → (Aggregating) →
/// Succeeded | Failed`. Command pipelines replace `Fetching` with
/// `Mutating` and never aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    Validating,
    CheckingAvailability,
    CheckingAuthorization,
    Fetching,
    Mutating,
    Mapping,
    Aggregating,
    Succeeded,
    Failed(PipelineErrorKind),
}

impl Stage {
    /// Whether the execution has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Validating => f.write_str("validating"),
            Self::CheckingAvailability => f.write_str("checking_availability"),
            Self::CheckingAuthorization => f.write_str("checking_authorization"),
            Self::Fetching => f.write_str("fetching"),
            Self::Mutating => f.write_str("mutating"),
            Self::Mapping => f.write_str("mapping"),
            Self::Aggregating => f.write_str("aggregating"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

/// Records stage transitions for one execution and logs them.
pub(crate) struct StageTrail<'a> {
    pipeline: &'a str,
    principal: &'a Principal,
    stages: Vec<Stage>,
}

impl<'a> StageTrail<'a> {
    pub(crate) fn new(pipeline: &'a str, principal: &'a Principal) -> Self {
        Self {
            pipeline,
            principal,
            stages: vec![Stage::Idle],
        }
    }

    pub(crate) fn enter(&mut self, stage: Stage) {
        debug!(pipeline = self.pipeline, %stage, "stage entered");
        self.stages.push(stage);
    }

    fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Idle)
    }

    /// Close the trail with the execution's outcome.
    pub(crate) fn finish<T>(mut self, result: &Result<T, PipelineError>) -> Vec<Stage> {
        let stage = self.current();
        let principal = self.principal.id();
        match result {
            Ok(_) => {
                info!(pipeline = self.pipeline, %principal, %stage, outcome = "succeeded", "pipeline completed");
                self.stages.push(Stage::Succeeded);
            }
            Err(err) => {
                info!(
                    pipeline = self.pipeline,
                    %principal,
                    %stage,
                    outcome = %err.kind(),
                    "pipeline failed"
                );
                self.stages.push(Stage::Failed(err.kind()));
            }
        }
        self.stages
    }
}

/// Outcome of one execution together with the stages it passed through.
#[derive(Debug, Clone)]
pub struct PipelineRun<T> {
    stages: Vec<Stage>,
    result: Result<T, PipelineError>,
}

impl<T> PipelineRun<T> {
    pub(crate) fn new(stages: Vec<Stage>, result: Result<T, PipelineError>) -> Self {
        Self { stages, result }
    }

    /// Every stage entered, starting with [`Stage::Idle`] and ending with a
    /// terminal stage.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The terminal stage.
    pub fn final_stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Idle)
    }

    /// Borrow the outcome.
    pub fn result(&self) -> &Result<T, PipelineError> {
        &self.result
    }

    /// Consume the run and return the outcome.
    pub fn into_result(self) -> Result<T, PipelineError> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capability, PrincipalId};

    fn principal() -> Principal {
        Principal::new(
            PrincipalId::new("admin-1").expect("valid id"),
            [Capability::Administrator],
        )
    }

    #[test]
    fn successful_trail_ends_in_succeeded() {
        let principal = principal();
        let mut trail = StageTrail::new("registers", &principal);
        trail.enter(Stage::Validating);
        let stages = trail.finish::<()>(&Ok(()));

        assert_eq!(
            stages,
            [Stage::Idle, Stage::Validating, Stage::Succeeded]
        );
    }

    #[test]
    fn failed_trail_records_kind() {
        let principal = principal();
        let mut trail = StageTrail::new("registers", &principal);
        trail.enter(Stage::CheckingAvailability);
        let stages = trail.finish::<()>(&Err(PipelineError::unavailable("down")));

        assert_eq!(
            stages.last(),
            Some(&Stage::Failed(PipelineErrorKind::Unavailable))
        );
        assert!(stages.last().is_some_and(|stage| stage.is_terminal()));
    }

    #[test]
    fn stages_display_snake_case() {
        assert_eq!(Stage::CheckingAuthorization.to_string(), "checking_authorization");
        assert_eq!(
            Stage::Failed(PipelineErrorKind::NotFound).to_string(),
            "failed(not_found)"
        );
    }
}
