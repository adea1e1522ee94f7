//! Disciplinary notes.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::require_text;
use crate::domain::ports::{NameDirectory, RecordStore};
use crate::domain::{Capability, Gates, Mapper, Pipeline, Record, RecordFilter, RecordId, resolve_name};

/// A note a teacher recorded against a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: RecordId,
    pub student_id: String,
    pub teacher_id: String,
    pub description: String,
    pub date: NaiveDate,
}

impl Record for Note {
    type Filter = NoteFilter;
    const KIND: &'static str = "note";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        require_text("student id", &self.student_id)?;
        require_text("teacher id", &self.teacher_id)?;
        require_text("description", &self.description)
    }
}

/// Selects every note recorded against one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFilter {
    student_id: String,
}

impl NoteFilter {
    pub fn student(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
        }
    }
}

impl RecordFilter<Note> for NoteFilter {
    fn validate(&self) -> Result<(), String> {
        require_text("student id", &self.student_id)
    }

    fn matches(&self, record: &Note) -> bool {
        record.student_id == self.student_id
    }
}

/// Note details with student and teacher resolved to names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub id: String,
    pub student_name: String,
    pub teacher_name: String,
    pub description: String,
    pub date: NaiveDate,
}

#[derive(Clone)]
pub struct NoteMapper {
    directory: Arc<dyn NameDirectory>,
}

impl NoteMapper {
    pub fn new(directory: Arc<dyn NameDirectory>) -> Self {
        Self { directory }
    }
}

impl Mapper<Note> for NoteMapper {
    type Dto = NoteDto;

    fn to_dto(&self, record: &Note) -> NoteDto {
        NoteDto {
            id: record.id.to_string(),
            student_name: resolve_name(self.directory.as_ref(), &record.student_id),
            teacher_name: resolve_name(self.directory.as_ref(), &record.teacher_id),
            description: record.description.clone(),
            date: record.date,
        }
    }
}

/// Notes for a student; sortable by date.
pub fn notes_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<Note, S, NoteMapper>
where
    S: RecordStore<Note>,
{
    Pipeline::builder(
        "notes",
        Capability::Administrator,
        gates,
        store,
        NoteMapper::new(directory),
    )
    .sort_by(|dto: &NoteDto| dto.date.format("%Y-%m-%d").to_string())
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNKNOWN_NAME;
    use crate::domain::ports::MockNameDirectory;

    fn note() -> Note {
        Note {
            id: RecordId::new("n-1").expect("valid id"),
            student_id: "s-1".to_owned(),
            teacher_id: "t-404".to_owned(),
            description: "Late to class".to_owned(),
            date: NaiveDate::from_ymd_opt(2023, 11, 2).expect("valid date"),
        }
    }

    #[test]
    fn unresolved_teacher_becomes_placeholder() {
        let mut directory = MockNameDirectory::new();
        directory
            .expect_display_name()
            .returning(|id| (id == "s-1").then(|| "Ada Byron".to_owned()));
        let mapper = NoteMapper::new(Arc::new(directory));

        let dto = mapper.to_dto(&note());

        assert_eq!(dto.student_name, "Ada Byron");
        assert_eq!(dto.teacher_name, UNKNOWN_NAME);
    }

    #[test]
    fn date_serialises_as_iso_day() {
        let mut directory = MockNameDirectory::new();
        directory.expect_display_name().return_const(None);
        let dto = NoteMapper::new(Arc::new(directory)).to_dto(&note());

        let value = serde_json::to_value(&dto).expect("serialises");

        assert_eq!(value["date"], "2023-11-02");
        assert_eq!(value["teacherName"], UNKNOWN_NAME);
    }

    #[test]
    fn blank_student_filter_is_malformed() {
        assert!(NoteFilter::student("").validate().is_err());
        assert!(NoteFilter::student("s-1").matches(&note()));
    }
}
