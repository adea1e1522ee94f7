//! Gated write pipelines.
//!
//! A [`CommandPipeline`] applies one [`Mutation`] to its store behind the
//! same availability and authorization gates as a query pipeline. Writes
//! are stamped with the injected clock before they reach the store, and the
//! stored record comes back mapped to its transfer object.

use std::marker::PhantomData;
use std::sync::Arc;

use mockable::Clock;

use super::stage::StageTrail;
use super::{Gates, PipelineRun, Stage, map_store_error, require_owner};
use crate::domain::ports::RecordStore;
use crate::domain::request::parse_record_id;
use crate::domain::{Capability, Mapper, PipelineError, Principal, Record, RecordId};

/// A write applied by a [`CommandPipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<R> {
    /// Add a new record.
    Insert(R),
    /// Replace an existing record with the same id.
    Update(R),
    /// Remove the record with the given raw id.
    Delete(String),
}

impl<R> Mutation<R> {
    /// Verb used in log fields.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }
}

/// A gated write pipeline over records of kind `R`.
pub struct CommandPipeline<R, S, M> {
    name: &'static str,
    capability: Capability,
    gates: Gates,
    store: Arc<S>,
    mapper: M,
    clock: Arc<dyn Clock>,
    _record: PhantomData<fn() -> R>,
}

impl<R, S, M> CommandPipeline<R, S, M>
where
    R: Record,
    S: RecordStore<R>,
    M: Mapper<R>,
{
    /// Create a command pipeline requiring `capability`.
    pub fn new(
        name: &'static str,
        capability: Capability,
        gates: Gates,
        store: Arc<S>,
        mapper: M,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            capability,
            gates,
            store,
            mapper,
            clock,
            _record: PhantomData,
        }
    }

    /// Name used in log fields.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply `mutation` on behalf of `principal`.
    pub fn execute(
        &self,
        principal: &Principal,
        mutation: Mutation<R>,
    ) -> Result<M::Dto, PipelineError> {
        self.run(principal, mutation).into_result()
    }

    /// Apply `mutation`, keeping the stages passed through.
    pub fn run(&self, principal: &Principal, mutation: Mutation<R>) -> PipelineRun<M::Dto> {
        let mut trail = StageTrail::new(self.name, principal);
        let result = self.drive(principal, mutation, &mut trail);
        let stages = trail.finish(&result);
        PipelineRun::new(stages, result)
    }

    fn drive(
        &self,
        principal: &Principal,
        mutation: Mutation<R>,
        trail: &mut StageTrail<'_>,
    ) -> Result<M::Dto, PipelineError> {
        trail.enter(Stage::Validating);
        Self::validate(&mutation)?;

        self.gates
            .admit(self.name, principal, &self.capability, trail)?;
        self.check_ownership(principal, &mutation)?;

        trail.enter(Stage::Mutating);
        let verb = mutation.verb();
        let stored = match mutation {
            Mutation::Insert(mut record) => {
                record.touch(self.clock.utc());
                self.store.insert(record)
            }
            Mutation::Update(mut record) => {
                record.touch(self.clock.utc());
                self.store.update(record)
            }
            Mutation::Delete(raw) => {
                let id = parse_record_id(&raw)?;
                self.store.delete(&id)
            }
        }
        .map_err(|err| map_store_error(self.name, err))?;
        tracing::debug!(pipeline = self.name, verb, id = %stored.id(), "record written");

        trail.enter(Stage::Mapping);
        Ok(self.mapper.to_dto(&stored))
    }

    /// Owner-scoped writes must name the caller as owner and may only touch
    /// records the caller already owns.
    fn check_ownership(
        &self,
        principal: &Principal,
        mutation: &Mutation<R>,
    ) -> Result<(), PipelineError> {
        if !R::OWNER_SCOPED {
            return Ok(());
        }
        let existing = match mutation {
            Mutation::Insert(record) => {
                return require_owner(self.name, principal, record.owner());
            }
            Mutation::Update(record) => {
                require_owner(self.name, principal, record.owner())?;
                record.id().clone()
            }
            Mutation::Delete(raw) => parse_record_id(raw)?,
        };
        self.require_stored_owner(principal, &existing)
    }

    fn require_stored_owner(&self, principal: &Principal, id: &RecordId) -> Result<(), PipelineError> {
        let stored = self
            .store
            .fetch_by_id(id)
            .map_err(|err| map_store_error(self.name, err))?;
        // Unknown ids fall through so the store reports them as missing.
        match stored {
            Some(record) => require_owner(self.name, principal, record.owner()),
            None => Ok(()),
        }
    }

    fn validate(mutation: &Mutation<R>) -> Result<(), PipelineError> {
        match mutation {
            Mutation::Insert(record) | Mutation::Update(record) => {
                record.check().map_err(|msg| {
                    PipelineError::invalid(format!("{} {} is malformed: {msg}", R::KIND, record.id()))
                })
            }
            Mutation::Delete(raw) => parse_record_id(raw).map(|_| ()),
        }
    }
}
