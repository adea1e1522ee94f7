//! Domain primitives, ports and the retrieval pipeline.
//!
//! Purpose: define the principal and record types, the narrow ports every
//! adapter implements, and the pipeline that wires them together. Nothing in
//! this module performs I/O or draws random numbers; adapters live under
//! [`crate::outbound`] and [`crate::inbound`].
//!
//! Public surface:
//! - `Principal`, `Capability`: who is asking and what they may do.
//! - `Record`, `RecordFilter`, `RecordId`: what is stored and how it is selected.
//! - `RequestContext`: one immutable request.
//! - `Pipeline`, `CommandPipeline`: gated reads and writes.
//! - `PipelineError`: the closed failure taxonomy.
//! - `school`: the concrete school management use cases.

pub mod aggregate;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod ports;
pub mod principal;
pub mod record;
pub mod request;
pub mod school;

pub use self::aggregate::{Group, GroupOrder, GroupedResult, Summary, group_by, summarize};
pub use self::error::{PipelineError, PipelineErrorKind, PipelineErrorValidationError, Severity};
pub use self::mapper::{Mapper, UNKNOWN_NAME, resolve_name};
pub use self::pipeline::{
    Aggregation, CommandPipeline, Gates, KeyFn, Mutation, Payload, Pipeline, PipelineBuilder,
    PipelineRun, Stage, UNAUTHORIZED_MESSAGE, UNAVAILABLE_MESSAGE, ValueFn,
};
pub use self::principal::{
    Capability, Principal, PrincipalId, PrincipalValidationError, expand_capabilities,
};
pub use self::record::{Record, RecordFilter, RecordId, RecordIdValidationError};
pub use self::request::{Pagination, ParseSortOrderError, RequestContext, Selector, SortOrder};

/// Result alias for pipeline executions.
///
/// # Examples
/// ```
/// use classbook::domain::{PipelineError, PipelineResult};
///
/// fn lookup() -> PipelineResult<u32> {
///     Err(PipelineError::not_found("no such register"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type PipelineResult<T> = Result<T, PipelineError>;
