//! Unit tests for the architecture lint.

use rstest::fixture;
use rstest::rstest;

use super::*;

#[derive(Clone, Copy)]
struct LintSingle;

impl LintSingle {
    fn lint(self, file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
        lint_sources(&[LintSource {
            file: Utf8PathBuf::from(file),
            contents: contents.to_owned(),
        }])
    }
}

#[fixture]
fn lint_single() -> LintSingle {
    LintSingle
}

#[rstest]
#[case(
    "inbound/dispatch.rs",
    "use crate::domain::PipelineError; fn job() { let _ = PipelineError::invalid(\"x\"); }",
    true
)]
#[case(
    "inbound/dispatch.rs",
    "use tokio::task::JoinError; fn job(_err: JoinError) {}",
    true
)]
#[case(
    "inbound/dispatch.rs",
    "use crate::outbound::InMemoryRecordStore; fn job() { let _ = InMemoryRecordStore::<()>::new; }",
    false
)]
#[case(
    "inbound/dispatch.rs",
    "use outbound::FlakyAvailabilityGate; fn job() {}",
    false
)]
#[case(
    "inbound/view.rs",
    "use classbook::outbound::FixedAvailabilityGate; fn job() {}",
    false
)]
#[case(
    "inbound/view.rs",
    "use rand::Rng; fn roll() {}",
    false
)]
#[case(
    "domain/pipeline/mod.rs",
    "use crate::inbound::dispatch; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "domain/pipeline/mod.rs",
    "use crate::config::PipelineSettings; fn thing() {}",
    false
)]
#[case(
    "domain/school/register.rs",
    "fn thing() { let _ = example_data::SeedRegistry::bundled(); }",
    false
)]
#[case(
    "domain/school/register.rs",
    "use tokio::sync::oneshot; fn thing() {}",
    false
)]
#[case(
    "domain/school/register.rs",
    "use mockable::Clock; use tracing::debug; fn thing() {}",
    true
)]
#[case(
    "outbound/availability.rs",
    "use rand::rngs::SmallRng; use crate::domain::ports::AvailabilityGate; fn gate() {}",
    true
)]
#[case(
    "outbound/memory_store.rs",
    "use crate::inbound::view; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "outbound/memory_store.rs",
    "use inbound::view; fn thing() { let _ = 1; }",
    false
)]
#[case(
    "outbound/memory_store.rs",
    "use clap::Parser; fn thing() {}",
    false
)]
#[case(
    "domain/school/register.rs",
    "use super::super::super::outbound::*; fn thing() {}",
    false
)]
#[case(
    "domain/school/register.rs",
    "use self::helpers::*; mod helpers {} fn thing() {}",
    true
)]
#[case(
    "inbound/view.rs",
    "use crate::{domain::PipelineError, outbound::{self, memory_store}}; fn thing() {}",
    false
)]
fn detects_boundary_violations(
    lint_single: LintSingle,
    #[case] file: &str,
    #[case] contents: &str,
    #[case] ok: bool,
) {
    let result = lint_single.lint(file, contents);
    assert_eq!(result.is_ok(), ok, "result: {result:?}");
}

#[rstest]
fn files_outside_the_layers_are_rejected(lint_single: LintSingle) {
    let result = lint_single.lint("config.rs", "fn settings() {}");
    assert!(
        matches!(result, Err(ArchitectureLintError::Parse { .. })),
        "result: {result:?}"
    );
}

#[rstest]
fn each_forbidden_root_is_reported_once(lint_single: LintSingle) {
    let result = lint_single.lint(
        "domain/pipeline/mod.rs",
        "use tokio::sync::watch; use tokio::task::spawn_blocking; fn thing() { tokio::spawn(async {}); }",
    );
    let Err(ArchitectureLintError::Violations(violations)) = result else {
        panic!("expected violations, got {result:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations.first().map(|violation| violation.message.as_str()),
        Some("domain module must not depend on external crate `tokio`")
    );
}
