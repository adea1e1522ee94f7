//! Example school loaded into in-memory stores.

use std::collections::HashMap;
use std::sync::Arc;

use example_data::{ExampleSchool, JustificationStatusSeed, PersonSeed, RoleSeed};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::ports::{AvailabilityGate, RecordStoreError};
use crate::domain::school::{
    AttendanceTally, Justification, JustificationStatus, Note, PreferredSite, Register,
    ReportCard, Teaching, tourist,
};
use crate::domain::{
    Capability, Principal, PrincipalId, PrincipalValidationError, RecordId,
    RecordIdValidationError, expand_capabilities,
};
use crate::outbound::{InMemoryNameDirectory, InMemoryRecordStore};

/// Errors raised while loading an example school.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("seed id {id} is not a valid record id: {source}")]
    InvalidRecordId {
        id: Uuid,
        #[source]
        source: RecordIdValidationError,
    },
    #[error("seed id {id} is not a valid principal id: {source}")]
    InvalidPrincipalId {
        id: Uuid,
        #[source]
        source: PrincipalValidationError,
    },
    #[error("teaching {teaching} refers to unknown class {class}")]
    UnknownClass { teaching: Uuid, class: Uuid },
    #[error("failed to load {kind} records: {source}")]
    Store {
        kind: &'static str,
        #[source]
        source: RecordStoreError,
    },
}

fn record_id(id: Uuid) -> Result<RecordId, DatasetError> {
    RecordId::new(id.to_string()).map_err(|source| DatasetError::InvalidRecordId { id, source })
}

fn store<R: crate::domain::Record>(
    gate: &Arc<dyn AvailabilityGate>,
    records: Vec<R>,
) -> Result<Arc<InMemoryRecordStore<R>>, DatasetError> {
    InMemoryRecordStore::with_records(Arc::clone(gate), records)
        .map(Arc::new)
        .map_err(|source| DatasetError::Store {
            kind: R::KIND,
            source,
        })
}

fn status(seed: JustificationStatusSeed) -> JustificationStatus {
    match seed {
        JustificationStatusSeed::Pending => JustificationStatus::Pending,
        JustificationStatusSeed::Accepted => JustificationStatus::Accepted,
        JustificationStatusSeed::Rejected => JustificationStatus::Rejected,
    }
}

/// Capabilities a seeded person logs in with.
///
/// Parents also hold the tourist capability so they can manage preferred
/// sites.
pub fn capabilities_for(role: RoleSeed) -> Vec<Capability> {
    match role {
        RoleSeed::Administrator => vec![Capability::Administrator],
        RoleSeed::Teacher => vec![Capability::Teacher],
        RoleSeed::Student => vec![Capability::Student],
        RoleSeed::Parent => vec![Capability::Parent, tourist()],
    }
}

/// The principal a seeded person authenticates as.
///
/// # Errors
///
/// Returns [`DatasetError::InvalidPrincipalId`] if the id is unusable.
pub fn principal_for(person: &PersonSeed) -> Result<Principal, DatasetError> {
    let id = PrincipalId::new(person.id.to_string()).map_err(|source| {
        DatasetError::InvalidPrincipalId {
            id: person.id,
            source,
        }
    })?;
    Ok(Principal::new(
        id,
        expand_capabilities(capabilities_for(person.role)),
    ))
}

/// Name directory and one store per record kind.
pub struct SchoolDataset {
    pub directory: Arc<InMemoryNameDirectory>,
    pub registers: Arc<InMemoryRecordStore<Register>>,
    pub notes: Arc<InMemoryRecordStore<Note>>,
    pub teachings: Arc<InMemoryRecordStore<Teaching>>,
    pub justifications: Arc<InMemoryRecordStore<Justification>>,
    pub report_cards: Arc<InMemoryRecordStore<ReportCard>>,
    pub attendance: Arc<InMemoryRecordStore<AttendanceTally>>,
    pub preferred_sites: Arc<InMemoryRecordStore<PreferredSite>>,
}

impl SchoolDataset {
    /// Load `school` into fresh stores guarded by `gate`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if a seed cannot become a valid record.
    pub fn from_school(
        school: &ExampleSchool,
        gate: Arc<dyn AvailabilityGate>,
    ) -> Result<Self, DatasetError> {
        let directory = InMemoryNameDirectory::new(
            school
                .people
                .iter()
                .map(|person| (person.id.to_string(), person.display_name.clone()))
                .chain(
                    school
                        .classes
                        .iter()
                        .map(|class| (class.id.to_string(), class.name.clone())),
                ),
        );
        let class_years: HashMap<Uuid, &str> = school
            .classes
            .iter()
            .map(|class| (class.id, class.academic_year.as_str()))
            .collect();

        let registers = school
            .registers
            .iter()
            .map(|seed| {
                Ok(Register {
                    id: record_id(seed.id)?,
                    class_id: seed.class_id.to_string(),
                    academic_year: seed.academic_year.clone(),
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let notes = school
            .notes
            .iter()
            .map(|seed| {
                Ok(Note {
                    id: record_id(seed.id)?,
                    student_id: seed.student_id.to_string(),
                    teacher_id: seed.teacher_id.to_string(),
                    description: seed.description.clone(),
                    date: seed.date,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let teachings = school
            .teachings
            .iter()
            .map(|seed| {
                let year = class_years.get(&seed.class_id).ok_or(DatasetError::UnknownClass {
                    teaching: seed.id,
                    class: seed.class_id,
                })?;
                Ok(Teaching {
                    id: record_id(seed.id)?,
                    class_id: seed.class_id.to_string(),
                    teacher_id: seed.teacher_id.to_string(),
                    subject: seed.subject.clone(),
                    academic_year: (*year).to_owned(),
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let justifications = school
            .justifications
            .iter()
            .map(|seed| {
                let reviewed = seed.status != JustificationStatusSeed::Pending;
                Ok(Justification {
                    id: record_id(seed.id)?,
                    student_id: seed.student_id.to_string(),
                    absence_date: seed.absence_date,
                    reason: seed.reason.clone(),
                    status: status(seed.status),
                    internal_reviewer: reviewed.then(|| seed.reviewer_id.to_string()),
                    updated_at: None,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let report_cards = school
            .report_cards
            .iter()
            .map(|seed| {
                Ok(ReportCard {
                    id: record_id(seed.id)?,
                    student_id: seed.student_id.to_string(),
                    semester: seed.semester,
                    overall_grade: seed.overall_grade,
                    comments: seed.comments.clone(),
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let attendance = school
            .attendance
            .iter()
            .map(|seed| {
                Ok(AttendanceTally {
                    id: record_id(seed.student_id)?,
                    absences: seed.absences,
                    notes: seed.notes,
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        let preferred_sites = school
            .preferred_sites
            .iter()
            .map(|seed| {
                Ok(PreferredSite {
                    id: record_id(seed.id)?,
                    owner_id: seed.owner_id.to_string(),
                    site_name: seed.site_name.clone(),
                    city: seed.city.clone(),
                })
            })
            .collect::<Result<Vec<_>, DatasetError>>()?;

        Ok(Self {
            directory: Arc::new(directory),
            registers: store(&gate, registers)?,
            notes: store(&gate, notes)?,
            teachings: store(&gate, teachings)?,
            justifications: store(&gate, justifications)?,
            report_cards: store(&gate, report_cards)?,
            attendance: store(&gate, attendance)?,
            preferred_sites: store(&gate, preferred_sites)?,
        })
    }
}
