//! Teaching assignments.

use std::sync::Arc;

use serde::Serialize;

use super::{require_text, validate_academic_year};
use crate::domain::ports::{NameDirectory, RecordStore};
use crate::domain::{
    Capability, Gates, GroupOrder, Mapper, Pipeline, Record, RecordFilter, RecordId, resolve_name,
};

/// A teacher assigned to teach a subject to a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teaching {
    pub id: RecordId,
    pub class_id: String,
    pub teacher_id: String,
    pub subject: String,
    /// Year of the class, copied from the class record.
    pub academic_year: String,
}

impl Record for Teaching {
    type Filter = TeachingFilter;
    const KIND: &'static str = "teaching";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        require_text("class id", &self.class_id)?;
        require_text("teacher id", &self.teacher_id)?;
        require_text("subject", &self.subject)?;
        validate_academic_year(&self.academic_year)
    }
}

/// Selects teachings by academic year or by teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeachingFilter {
    AcademicYear(String),
    Teacher(String),
}

impl RecordFilter<Teaching> for TeachingFilter {
    fn validate(&self) -> Result<(), String> {
        match self {
            Self::AcademicYear(year) => validate_academic_year(year),
            Self::Teacher(teacher_id) => require_text("teacher id", teacher_id),
        }
    }

    fn matches(&self, record: &Teaching) -> bool {
        match self {
            Self::AcademicYear(year) => record.academic_year == *year,
            Self::Teacher(teacher_id) => record.teacher_id == *teacher_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingDto {
    pub id: String,
    pub subject: String,
    pub class_name: String,
    pub teacher_name: String,
}

#[derive(Clone)]
pub struct TeachingMapper {
    directory: Arc<dyn NameDirectory>,
}

impl TeachingMapper {
    pub fn new(directory: Arc<dyn NameDirectory>) -> Self {
        Self { directory }
    }
}

impl Mapper<Teaching> for TeachingMapper {
    type Dto = TeachingDto;

    fn to_dto(&self, record: &Teaching) -> TeachingDto {
        TeachingDto {
            id: record.id.to_string(),
            subject: record.subject.clone(),
            class_name: resolve_name(self.directory.as_ref(), &record.class_id),
            teacher_name: resolve_name(self.directory.as_ref(), &record.teacher_id),
        }
    }
}

/// Teachings grouped by class name.
pub fn teachings_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<Teaching, S, TeachingMapper>
where
    S: RecordStore<Teaching>,
{
    Pipeline::builder(
        "teachings_by_class",
        Capability::Administrator,
        gates,
        store,
        TeachingMapper::new(directory),
    )
    .group_by(
        |dto: &TeachingDto| dto.class_name.clone(),
        GroupOrder::Lexicographic,
    )
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn teaching(teacher_id: &str, year: &str) -> Teaching {
        Teaching {
            id: RecordId::new("tg-1").expect("valid id"),
            class_id: "c-1".to_owned(),
            teacher_id: teacher_id.to_owned(),
            subject: "Physics".to_owned(),
            academic_year: year.to_owned(),
        }
    }

    #[rstest]
    #[case(TeachingFilter::AcademicYear("2023-2024".to_owned()), true)]
    #[case(TeachingFilter::AcademicYear("2024-2025".to_owned()), false)]
    #[case(TeachingFilter::Teacher("t-1".to_owned()), true)]
    #[case(TeachingFilter::Teacher("t-2".to_owned()), false)]
    fn filters_select_by_year_or_teacher(#[case] filter: TeachingFilter, #[case] expected: bool) {
        assert_eq!(filter.matches(&teaching("t-1", "2023-2024")), expected);
    }

    #[rstest]
    #[case(TeachingFilter::AcademicYear("last year".to_owned()))]
    #[case(TeachingFilter::Teacher("  ".to_owned()))]
    fn malformed_filters_fail_validation(#[case] filter: TeachingFilter) {
        assert!(filter.validate().is_err());
    }
}
