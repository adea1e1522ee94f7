//! Monitoring of students with many absences or notes.

use std::sync::Arc;

use serde::Serialize;

use super::require_text;
use crate::domain::ports::{NameDirectory, RecordStore};
use crate::domain::{Capability, Gates, Mapper, Pipeline, Record, RecordFilter, RecordId, resolve_name};

/// Absence and note counts for one student. The record id is the student
/// id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceTally {
    pub id: RecordId,
    pub absences: u32,
    pub notes: u32,
}

impl AttendanceTally {
    /// The student this tally belongs to.
    pub fn student_id(&self) -> &str {
        self.id.as_ref()
    }
}

impl Record for AttendanceTally {
    type Filter = MonitoringFilter;
    const KIND: &'static str = "attendance tally";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        require_text("student id", self.student_id())
    }
}

/// Selects students whose absences or notes exceed a threshold.
///
/// A student is selected when either count is strictly above its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitoringFilter {
    pub absence_threshold: u32,
    pub note_threshold: u32,
}

impl MonitoringFilter {
    pub fn new(absence_threshold: u32, note_threshold: u32) -> Self {
        Self {
            absence_threshold,
            note_threshold,
        }
    }
}

impl RecordFilter<AttendanceTally> for MonitoringFilter {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn matches(&self, record: &AttendanceTally) -> bool {
        record.absences > self.absence_threshold || record.notes > self.note_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringDto {
    pub student_name: String,
    pub absences: u32,
    pub notes: u32,
}

#[derive(Clone)]
pub struct MonitoringMapper {
    directory: Arc<dyn NameDirectory>,
}

impl MonitoringMapper {
    pub fn new(directory: Arc<dyn NameDirectory>) -> Self {
        Self { directory }
    }
}

impl Mapper<AttendanceTally> for MonitoringMapper {
    type Dto = MonitoringDto;

    fn to_dto(&self, record: &AttendanceTally) -> MonitoringDto {
        MonitoringDto {
            student_name: resolve_name(self.directory.as_ref(), record.student_id()),
            absences: record.absences,
            notes: record.notes,
        }
    }
}

/// Students over the thresholds, ordered by name.
pub fn monitoring_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<AttendanceTally, S, MonitoringMapper>
where
    S: RecordStore<AttendanceTally>,
{
    Pipeline::builder(
        "student_monitoring",
        Capability::Administrator,
        gates,
        store,
        MonitoringMapper::new(directory),
    )
    .sort_by(|dto: &MonitoringDto| dto.student_name.clone())
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tally(absences: u32, notes: u32) -> AttendanceTally {
        AttendanceTally {
            id: RecordId::new("s-1").expect("valid id"),
            absences,
            notes,
        }
    }

    #[rstest]
    #[case(tally(0, 0), false)]
    #[case(tally(5, 2), false)]
    #[case(tally(6, 0), true)]
    #[case(tally(0, 3), true)]
    #[case(tally(9, 9), true)]
    fn either_threshold_selects(#[case] record: AttendanceTally, #[case] expected: bool) {
        assert_eq!(MonitoringFilter::new(5, 2).matches(&record), expected);
    }
}
