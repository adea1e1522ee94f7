//! Authorization-gated retrieval pipelines.
//!
//! A [`Pipeline`] turns a [`RequestContext`] into a [`Payload`] by running a
//! fixed sequence: validate the request, check availability, check
//! authorization, fetch from the [`RecordStore`], map each record through a
//! [`Mapper`], then optionally sort, paginate and aggregate. Any stage may
//! fail with a [`PipelineError`]; later stages are then skipped. In
//! particular the store is never touched unless both gates passed.
//!
//! Pipelines hold no per-request state, so one instance may serve many
//! concurrent executions.

use std::marker::PhantomData;
use std::sync::Arc;

use pagination::{Page, PageRequest};
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::ports::{AccessGate, AvailabilityGate, RecordStore, RecordStoreError};
use crate::domain::record::owned_by;
use crate::domain::request::parse_record_id;
use crate::domain::{
    Capability, GroupOrder, GroupedResult, Mapper, PipelineError, Principal, Record, RecordFilter,
    RecordId, RequestContext, Selector, SortOrder, Summary, group_by, summarize,
};

mod command;
mod stage;

pub use command::{CommandPipeline, Mutation};
pub use stage::{PipelineRun, Stage};

use stage::StageTrail;

/// Message returned whenever an availability check fails.
pub const UNAVAILABLE_MESSAGE: &str = "connection to the server interrupted";

/// Message returned whenever an authorization check fails. It never names
/// the missing capability.
pub const UNAUTHORIZED_MESSAGE: &str = "you are not authorized to perform this operation";

/// Projects a grouping or sort key out of a transfer object.
pub type KeyFn<D> = fn(&D) -> String;

/// Projects a numeric value out of a transfer object.
pub type ValueFn<D> = fn(&D) -> f64;

/// The two gates every pipeline consults before touching its store.
#[derive(Clone)]
pub struct Gates {
    availability: Arc<dyn AvailabilityGate>,
    access: Arc<dyn AccessGate>,
}

impl Gates {
    /// Bundle an availability gate with an access gate.
    pub fn new(availability: Arc<dyn AvailabilityGate>, access: Arc<dyn AccessGate>) -> Self {
        Self {
            availability,
            access,
        }
    }

    /// Run the availability then authorization checks, recording each stage.
    pub(crate) fn admit(
        &self,
        pipeline: &str,
        principal: &Principal,
        required: &Capability,
        trail: &mut StageTrail<'_>,
    ) -> Result<(), PipelineError> {
        trail.enter(Stage::CheckingAvailability);
        if !self.availability.check_available() {
            warn!(pipeline, "backing service unavailable");
            return Err(PipelineError::unavailable(UNAVAILABLE_MESSAGE));
        }

        trail.enter(Stage::CheckingAuthorization);
        if !self.access.authorize(principal, required) {
            debug!(
                pipeline,
                principal = %principal.id(),
                capability = %required,
                "authorization refused"
            );
            return Err(PipelineError::unauthorized(UNAUTHORIZED_MESSAGE));
        }
        Ok(())
    }
}

/// Refuse access to records owned by someone other than `principal`.
pub(crate) fn require_owner(
    pipeline: &str,
    principal: &Principal,
    owner: Option<&str>,
) -> Result<(), PipelineError> {
    if owned_by(principal, owner) {
        return Ok(());
    }
    debug!(
        pipeline,
        principal = %principal.id(),
        "record belongs to another principal"
    );
    Err(PipelineError::unauthorized(UNAUTHORIZED_MESSAGE))
}

/// Optional post-processing of a filter selection.
pub enum Aggregation<D> {
    /// Return the mapped items as they are.
    None,
    /// Partition the items by a key.
    GroupBy {
        /// Grouping key projection.
        key: KeyFn<D>,
        /// Order in which groups are emitted.
        order: GroupOrder,
    },
    /// Reduce the items to count and spread.
    Summarize {
        /// Numeric projection.
        value: ValueFn<D>,
    },
}

impl<D> Clone for Aggregation<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Aggregation<D> {}

impl<D> std::fmt::Debug for Aggregation<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::GroupBy { order, .. } => f.debug_struct("GroupBy").field("order", order).finish(),
            Self::Summarize { .. } => f.write_str("Summarize"),
        }
    }
}

/// Successful result of a query pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "data", rename_all = "snake_case")]
pub enum Payload<D> {
    /// A record selected by id.
    One(D),
    /// Every record a filter selected.
    Many(Vec<D>),
    /// One window of a paginated filter selection.
    Page(Page<D>),
    /// Items partitioned by key.
    Grouped(GroupedResult<D>),
    /// Count and spread of the selected items.
    Summary(Summary),
}

impl<D> Payload<D> {
    /// The single item of a by-id selection.
    pub fn into_one(self) -> Option<D> {
        match self {
            Self::One(item) => Some(item),
            _ => None,
        }
    }

    /// The items of a plain or paginated selection.
    pub fn into_items(self) -> Option<Vec<D>> {
        match self {
            Self::Many(items) => Some(items),
            Self::Page(page) => Some(page.into_items()),
            _ => None,
        }
    }

    /// The page of a paginated selection.
    pub fn into_page(self) -> Option<Page<D>> {
        match self {
            Self::Page(page) => Some(page),
            _ => None,
        }
    }

    /// The groups of a grouped selection.
    pub fn into_grouped(self) -> Option<GroupedResult<D>> {
        match self {
            Self::Grouped(grouped) => Some(grouped),
            _ => None,
        }
    }

    /// The summary of a summarised selection.
    pub fn into_summary(self) -> Option<Summary> {
        match self {
            Self::Summary(summary) => Some(summary),
            _ => None,
        }
    }
}

/// Validated form of a request.
enum Target<'a, F> {
    One(RecordId),
    Many {
        filter: &'a F,
        page: Option<PageRequest>,
        sort: Option<SortOrder>,
    },
}

/// Map a store failure onto the pipeline's error kinds.
pub(crate) fn map_store_error(pipeline: &str, error: RecordStoreError) -> PipelineError {
    debug!(pipeline, error_kind = error.variant_name(), %error, "record store failed");
    match error {
        RecordStoreError::Unavailable { .. } | RecordStoreError::Corrupted { .. } => {
            PipelineError::unavailable(UNAVAILABLE_MESSAGE)
        }
        RecordStoreError::MalformedRecord { .. }
        | RecordStoreError::DuplicateId { .. }
        | RecordStoreError::RetiredId { .. } => PipelineError::invalid(error.to_string()),
        RecordStoreError::Missing { .. } => PipelineError::not_found(error.to_string()),
    }
}

/// A read-only retrieval pipeline over records of kind `R`.
pub struct Pipeline<R, S, M>
where
    M: Mapper<R>,
{
    name: &'static str,
    capability: Capability,
    gates: Gates,
    store: Arc<S>,
    mapper: M,
    sort_key: Option<KeyFn<M::Dto>>,
    aggregation: Aggregation<M::Dto>,
    _record: PhantomData<fn() -> R>,
}

/// Builder returned by [`Pipeline::builder`].
pub struct PipelineBuilder<R, S, M>
where
    M: Mapper<R>,
{
    pipeline: Pipeline<R, S, M>,
}

impl<R, S, M> PipelineBuilder<R, S, M>
where
    M: Mapper<R>,
{
    /// Partition filter selections by `key`.
    pub fn group_by(mut self, key: KeyFn<M::Dto>, order: GroupOrder) -> Self {
        self.pipeline.aggregation = Aggregation::GroupBy { key, order };
        self
    }

    /// Reduce filter selections to a [`Summary`] of `value`.
    pub fn summarize(mut self, value: ValueFn<M::Dto>) -> Self {
        self.pipeline.aggregation = Aggregation::Summarize { value };
        self
    }

    /// Order filter selections by `key`, ascending unless the request asks
    /// otherwise. Without a sort key, requests that ask for a sort order
    /// are rejected.
    pub fn sort_by(mut self, key: KeyFn<M::Dto>) -> Self {
        self.pipeline.sort_key = Some(key);
        self
    }

    /// Finish the pipeline.
    pub fn build(self) -> Pipeline<R, S, M> {
        self.pipeline
    }
}

impl<R, S, M> Pipeline<R, S, M>
where
    R: Record,
    S: RecordStore<R>,
    M: Mapper<R>,
{
    /// Start building a pipeline.
    ///
    /// `capability` is the one principals must hold to run it.
    pub fn builder(
        name: &'static str,
        capability: Capability,
        gates: Gates,
        store: Arc<S>,
        mapper: M,
    ) -> PipelineBuilder<R, S, M> {
        PipelineBuilder {
            pipeline: Self {
                name,
                capability,
                gates,
                store,
                mapper,
                sort_key: None,
                aggregation: Aggregation::None,
                _record: PhantomData,
            },
        }
    }

    /// Name used in log fields.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Capability required to run this pipeline.
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Configured aggregation.
    pub fn aggregation(&self) -> Aggregation<M::Dto> {
        self.aggregation
    }

    /// Execute the pipeline and return its outcome.
    pub fn execute(
        &self,
        request: &RequestContext<R::Filter>,
    ) -> Result<Payload<M::Dto>, PipelineError> {
        self.run(request).into_result()
    }

    /// Execute the pipeline, keeping the stages it passed through.
    pub fn run(&self, request: &RequestContext<R::Filter>) -> PipelineRun<Payload<M::Dto>> {
        let mut trail = StageTrail::new(self.name, request.principal());
        let result = self.drive(request, &mut trail);
        let stages = trail.finish(&result);
        PipelineRun::new(stages, result)
    }

    fn drive(
        &self,
        request: &RequestContext<R::Filter>,
        trail: &mut StageTrail<'_>,
    ) -> Result<Payload<M::Dto>, PipelineError> {
        trail.enter(Stage::Validating);
        let target = self.validate(request)?;

        self.gates
            .admit(self.name, request.principal(), &self.capability, trail)?;
        if let Target::Many { filter, .. } = &target {
            require_owner(self.name, request.principal(), filter.owner())?;
        }

        trail.enter(Stage::Fetching);
        match target {
            Target::One(id) => {
                let record = self
                    .store
                    .fetch_by_id(&id)
                    .map_err(|err| map_store_error(self.name, err))?
                    .ok_or_else(|| {
                        PipelineError::not_found(format!("{} {id} does not exist", R::KIND))
                    })?;
                require_owner(self.name, request.principal(), record.owner())?;
                trail.enter(Stage::Mapping);
                Ok(Payload::One(self.mapper.to_dto(&record)))
            }
            Target::Many { filter, page, sort } => {
                let records = self
                    .store
                    .fetch_by_filter(filter)
                    .map_err(|err| map_store_error(self.name, err))?;
                trail.enter(Stage::Mapping);
                let mut items: Vec<M::Dto> =
                    records.iter().map(|record| self.mapper.to_dto(record)).collect();
                self.sort(&mut items, sort);
                Ok(self.shape(items, page, trail))
            }
        }
    }

    fn validate<'a>(
        &self,
        request: &'a RequestContext<R::Filter>,
    ) -> Result<Target<'a, R::Filter>, PipelineError> {
        match request.selector() {
            Selector::Id(raw) => {
                let id = parse_record_id(raw)?;
                if request.pagination().is_some() || request.sort().is_some() {
                    return Err(PipelineError::invalid(
                        "paging and sorting apply only to filter selections",
                    ));
                }
                Ok(Target::One(id))
            }
            Selector::Filter(filter) => {
                filter
                    .validate()
                    .map_err(|msg| PipelineError::invalid(format!("malformed selector: {msg}")))?;
                let page = request
                    .pagination()
                    .map(|pagination| pagination.resolve())
                    .transpose()
                    .map_err(|err| PipelineError::invalid(err.to_string()))?;
                if page.is_some() && !matches!(self.aggregation, Aggregation::None) {
                    return Err(PipelineError::invalid(format!(
                        "{} results are aggregated and cannot be paged",
                        self.name
                    )));
                }
                let sort = request.sort();
                if sort.is_some() && self.sort_key.is_none() {
                    return Err(PipelineError::invalid(format!(
                        "{} listings cannot be sorted",
                        self.name
                    )));
                }
                Ok(Target::Many { filter, page, sort })
            }
        }
    }

    fn sort(&self, items: &mut [M::Dto], order: Option<SortOrder>) {
        let Some(key) = self.sort_key else {
            return;
        };
        let direction = order.unwrap_or_default();
        items.sort_by(|left, right| {
            let ordering = key(left).cmp(&key(right));
            match direction {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
    }

    fn shape(
        &self,
        items: Vec<M::Dto>,
        page: Option<PageRequest>,
        trail: &mut StageTrail<'_>,
    ) -> Payload<M::Dto> {
        match (self.aggregation, page) {
            (Aggregation::None, Some(request)) => Payload::Page(request.apply(items)),
            (Aggregation::None, None) => Payload::Many(items),
            (Aggregation::GroupBy { key, order }, _) => {
                trail.enter(Stage::Aggregating);
                Payload::Grouped(group_by(items, key, order))
            }
            (Aggregation::Summarize { value }, _) => {
                trail.enter(Stage::Aggregating);
                Payload::Summary(summarize(&items, value))
            }
        }
    }
}
