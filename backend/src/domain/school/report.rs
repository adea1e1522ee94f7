//! Report cards and grade statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

use super::require_text;
use crate::domain::ports::{NameDirectory, RecordStore};
use crate::domain::{
    Capability, Gates, Mapper, Pipeline, PipelineError, Record, RecordFilter, RecordId,
    RequestContext, Summary, resolve_name,
};

/// Semesters in a school year.
pub const SEMESTERS: std::ops::RangeInclusive<u8> = 1..=2;

/// Highest overall grade.
pub const MAX_GRADE: u8 = 100;

/// A student's report card for one semester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCard {
    pub id: RecordId,
    pub student_id: String,
    pub semester: u8,
    pub overall_grade: u8,
    pub comments: String,
}

impl Record for ReportCard {
    type Filter = ReportCardFilter;
    const KIND: &'static str = "report card";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        require_text("student id", &self.student_id)?;
        check_semester(self.semester)?;
        if self.overall_grade > MAX_GRADE {
            return Err(format!("overall grade must be at most {MAX_GRADE}"));
        }
        Ok(())
    }
}

fn check_semester(semester: u8) -> Result<(), String> {
    if SEMESTERS.contains(&semester) {
        Ok(())
    } else {
        Err(format!("semester must be 1 or 2, got {semester}"))
    }
}

/// Selects report cards by semester, by student, or both. An empty filter
/// selects every report card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportCardFilter {
    semester: Option<u8>,
    student_id: Option<String>,
}

impl ReportCardFilter {
    /// Every report card.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one semester.
    pub fn semester(mut self, semester: u8) -> Self {
        self.semester = Some(semester);
        self
    }

    /// Restrict to one student.
    pub fn student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }
}

impl RecordFilter<ReportCard> for ReportCardFilter {
    fn validate(&self) -> Result<(), String> {
        if let Some(semester) = self.semester {
            check_semester(semester)?;
        }
        if let Some(student_id) = &self.student_id {
            require_text("student id", student_id)?;
        }
        Ok(())
    }

    fn matches(&self, record: &ReportCard) -> bool {
        self.semester.is_none_or(|semester| record.semester == semester)
            && self
                .student_id
                .as_ref()
                .is_none_or(|student_id| record.student_id == *student_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardDto {
    pub id: String,
    pub student_name: String,
    pub semester: u8,
    pub overall_grade: u8,
    pub comments: String,
}

#[derive(Clone)]
pub struct ReportCardMapper {
    directory: Arc<dyn NameDirectory>,
}

impl ReportCardMapper {
    pub fn new(directory: Arc<dyn NameDirectory>) -> Self {
        Self { directory }
    }
}

impl Mapper<ReportCard> for ReportCardMapper {
    type Dto = ReportCardDto;

    fn to_dto(&self, record: &ReportCard) -> ReportCardDto {
        ReportCardDto {
            id: record.id.to_string(),
            student_name: resolve_name(self.directory.as_ref(), &record.student_id),
            semester: record.semester,
            overall_grade: record.overall_grade,
            comments: record.comments.clone(),
        }
    }
}

/// Report cards, sortable by student name.
pub fn report_cards_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<ReportCard, S, ReportCardMapper>
where
    S: RecordStore<ReportCard>,
{
    Pipeline::builder(
        "report_cards",
        Capability::Teacher,
        gates,
        store,
        ReportCardMapper::new(directory),
    )
    .sort_by(|dto: &ReportCardDto| dto.student_name.clone())
    .build()
}

/// Count and spread of overall grades.
pub fn report_statistics_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<ReportCard, S, ReportCardMapper>
where
    S: RecordStore<ReportCard>,
{
    Pipeline::builder(
        "report_statistics",
        Capability::Teacher,
        gates,
        store,
        ReportCardMapper::new(directory),
    )
    .summarize(|dto: &ReportCardDto| f64::from(dto.overall_grade))
    .build()
}

/// Grade statistics stamped with the time they were produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub summary: Summary,
    pub generated_at: DateTime<Utc>,
}

/// Produces [`ReportStatistics`] from a summarising pipeline.
pub struct ReportStatisticsService<S> {
    pipeline: Pipeline<ReportCard, S, ReportCardMapper>,
    clock: Arc<dyn Clock>,
}

impl<S> ReportStatisticsService<S>
where
    S: RecordStore<ReportCard>,
{
    pub fn new(pipeline: Pipeline<ReportCard, S, ReportCardMapper>, clock: Arc<dyn Clock>) -> Self {
        Self { pipeline, clock }
    }

    /// Summarise the report cards `request` selects.
    ///
    /// # Errors
    ///
    /// Returns the pipeline's error unchanged, or
    /// [`PipelineErrorKind::Invalid`](crate::domain::PipelineErrorKind) when
    /// the request selects a single report card by id.
    pub fn generate(
        &self,
        request: &RequestContext<ReportCardFilter>,
    ) -> Result<ReportStatistics, PipelineError> {
        let summary = self
            .pipeline
            .execute(request)?
            .into_summary()
            .ok_or_else(|| PipelineError::invalid("statistics need a filter selection"))?;
        Ok(ReportStatistics {
            summary,
            generated_at: self.clock.utc(),
        })
    }
}
