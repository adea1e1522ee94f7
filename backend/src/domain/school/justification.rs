//! Absence justifications.
//!
//! Administrators list a student's justifications and review them through a
//! [`CommandPipeline`]. The reviewer is kept on the record for auditing but
//! never shown.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::Serialize;

use super::require_text;
use crate::domain::ports::{NameDirectory, RecordStore};
use crate::domain::{
    Capability, CommandPipeline, Gates, Mapper, Pipeline, Record, RecordFilter, RecordId,
    resolve_name,
};

/// Review state of a justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JustificationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for JustificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

/// A justification submitted for one absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Justification {
    pub id: RecordId,
    pub student_id: String,
    pub absence_date: NaiveDate,
    pub reason: String,
    pub status: JustificationStatus,
    /// Staff member who reviewed the justification. Internal only.
    pub internal_reviewer: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Justification {
    /// A copy of this justification reviewed by `reviewer`.
    pub fn reviewed(&self, status: JustificationStatus, reviewer: impl Into<String>) -> Self {
        Self {
            status,
            internal_reviewer: Some(reviewer.into()),
            ..self.clone()
        }
    }
}

impl Record for Justification {
    type Filter = JustificationFilter;
    const KIND: &'static str = "justification";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        require_text("student id", &self.student_id)?;
        require_text("reason", &self.reason)?;
        match (&self.status, &self.internal_reviewer) {
            (JustificationStatus::Pending, _) => Ok(()),
            (_, Some(reviewer)) => require_text("reviewer", reviewer),
            (status, None) => Err(format!("a {status} justification needs a reviewer")),
        }
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

/// Selects every justification of one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JustificationFilter {
    student_id: String,
}

impl JustificationFilter {
    pub fn student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
        }
    }
}

impl RecordFilter<Justification> for JustificationFilter {
    fn validate(&self) -> Result<(), String> {
        require_text("student id", &self.student_id)
    }

    fn matches(&self, record: &Justification) -> bool {
        record.student_id == self.student_id
    }
}

/// Justification as shown on screen. Carries no reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JustificationDto {
    pub id: String,
    pub student_name: String,
    pub absence_date: NaiveDate,
    pub reason: String,
    pub status: JustificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct JustificationMapper {
    directory: Arc<dyn NameDirectory>,
}

impl JustificationMapper {
    pub fn new(directory: Arc<dyn NameDirectory>) -> Self {
        Self { directory }
    }
}

impl Mapper<Justification> for JustificationMapper {
    type Dto = JustificationDto;

    fn to_dto(&self, record: &Justification) -> JustificationDto {
        JustificationDto {
            id: record.id.to_string(),
            student_name: resolve_name(self.directory.as_ref(), &record.student_id),
            absence_date: record.absence_date,
            reason: record.reason.clone(),
            status: record.status,
            updated_at: record.updated_at,
        }
    }
}

/// A student's justifications, sortable by absence date.
pub fn justifications_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<Justification, S, JustificationMapper>
where
    S: RecordStore<Justification>,
{
    Pipeline::builder(
        "justifications",
        Capability::Administrator,
        gates,
        store,
        JustificationMapper::new(directory),
    )
    .sort_by(|dto: &JustificationDto| dto.absence_date.to_string())
    .build()
}

/// Insert, review or withdraw justifications.
pub fn justification_commands<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
    clock: Arc<dyn Clock>,
) -> CommandPipeline<Justification, S, JustificationMapper>
where
    S: RecordStore<Justification>,
{
    CommandPipeline::new(
        "justification_writes",
        Capability::Administrator,
        gates,
        store,
        JustificationMapper::new(directory),
        clock,
    )
}
