//! Generated school seed types.
//!
//! These types are independent of backend domain types to avoid circular
//! dependencies. Consumers convert them into their own records at the point
//! of use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a generated person holds in the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSeed {
    /// School administrator.
    Administrator,
    /// Teaching staff.
    Teacher,
    /// Enrolled student.
    Student,
    /// Parent or guardian of a student.
    Parent,
}

/// A generated person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSeed {
    /// Unique identifier for the person.
    pub id: Uuid,
    /// Human-readable name.
    pub display_name: String,
    /// Role in the school.
    pub role: RoleSeed,
    /// Class a student is enrolled in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<Uuid>,
    /// Student a parent is responsible for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_of: Option<Uuid>,
}

/// A generated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSeed {
    /// Unique identifier for the class.
    pub id: Uuid,
    /// Display name such as `Grade 10A`.
    pub name: String,
    /// Academic year label such as `2023-2024`.
    pub academic_year: String,
}

/// The attendance register kept for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSeed {
    /// Unique identifier for the register.
    pub id: Uuid,
    /// Class the register belongs to.
    pub class_id: Uuid,
    /// Academic year label.
    pub academic_year: String,
}

/// A disciplinary note written by a teacher about a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSeed {
    /// Unique identifier for the note.
    pub id: Uuid,
    /// Student the note concerns.
    pub student_id: Uuid,
    /// Teacher who wrote the note.
    pub teacher_id: Uuid,
    /// Free-text description.
    pub description: String,
    /// Day the note was written.
    pub date: NaiveDate,
}

/// A subject taught to a class by a teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingSeed {
    /// Unique identifier for the teaching assignment.
    pub id: Uuid,
    /// Class being taught.
    pub class_id: Uuid,
    /// Teacher assigned.
    pub teacher_id: Uuid,
    /// Subject name.
    pub subject: String,
}

/// Review state of an absence justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JustificationStatusSeed {
    /// Awaiting review.
    Pending,
    /// Accepted by the school.
    Accepted,
    /// Rejected by the school.
    Rejected,
}

/// A justification submitted for an absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JustificationSeed {
    /// Unique identifier for the justification.
    pub id: Uuid,
    /// Student who was absent.
    pub student_id: Uuid,
    /// Day of the absence.
    pub absence_date: NaiveDate,
    /// Reason given.
    pub reason: String,
    /// Review state.
    pub status: JustificationStatusSeed,
    /// Administrator who reviewed the justification.
    pub reviewer_id: Uuid,
}

/// A semester report card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCardSeed {
    /// Unique identifier for the report card.
    pub id: Uuid,
    /// Student the report card belongs to.
    pub student_id: Uuid,
    /// Semester number, `1` or `2`.
    pub semester: u8,
    /// Overall grade on a 0 to 100 scale.
    pub overall_grade: u8,
    /// Teacher comments.
    pub comments: String,
}

/// Absence and note totals for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSeed {
    /// Student the totals belong to.
    pub student_id: Uuid,
    /// Number of absences recorded.
    pub absences: u32,
    /// Number of disciplinary notes recorded.
    pub notes: u32,
}

/// A site a parent keeps in their preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredSiteSeed {
    /// Unique identifier for the preference.
    pub id: Uuid,
    /// Parent who saved the site.
    pub owner_id: Uuid,
    /// Site name.
    pub site_name: String,
    /// City the site is in.
    pub city: String,
}

/// Everything generated for one seed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSchool {
    /// Administrators, teachers, students and parents.
    pub people: Vec<PersonSeed>,
    /// Classes, spread across the registry's academic years.
    pub classes: Vec<ClassSeed>,
    /// One register per class.
    pub registers: Vec<RegisterSeed>,
    /// Disciplinary notes.
    pub notes: Vec<NoteSeed>,
    /// Teaching assignments.
    pub teachings: Vec<TeachingSeed>,
    /// Absence justifications.
    pub justifications: Vec<JustificationSeed>,
    /// Report cards, two per student.
    pub report_cards: Vec<ReportCardSeed>,
    /// Attendance totals, one per student.
    pub attendance: Vec<AttendanceSeed>,
    /// Parents' preferred sites.
    pub preferred_sites: Vec<PreferredSiteSeed>,
}

impl ExampleSchool {
    /// Iterates over people holding the given role, in generation order.
    pub fn people_with_role(&self, role: RoleSeed) -> impl Iterator<Item = &PersonSeed> {
        self.people.iter().filter(move |person| person.role == role)
    }
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use super::*;

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&RoleSeed::Administrator).expect("serialize");
        assert_eq!(json, "\"administrator\"");
    }

    #[test]
    fn person_omits_absent_links() {
        let person = PersonSeed {
            id: Uuid::nil(),
            display_name: "Ada Lovelace".to_owned(),
            role: RoleSeed::Teacher,
            class_id: None,
            guardian_of: None,
        };
        let json = serde_json::to_string(&person).expect("serialize");

        assert!(json.contains("displayName"));
        assert!(!json.contains("classId"));
        assert!(!json.contains("guardianOf"));
    }

    #[test]
    fn people_with_role_filters() {
        let school = ExampleSchool {
            people: vec![
                PersonSeed {
                    id: Uuid::from_u128(1),
                    display_name: "Grace Hopper".to_owned(),
                    role: RoleSeed::Teacher,
                    class_id: None,
                    guardian_of: None,
                },
                PersonSeed {
                    id: Uuid::from_u128(2),
                    display_name: "Alan Turing".to_owned(),
                    role: RoleSeed::Student,
                    class_id: Some(Uuid::from_u128(9)),
                    guardian_of: None,
                },
            ],
            ..ExampleSchool::default()
        };

        let teachers: Vec<_> = school.people_with_role(RoleSeed::Teacher).collect();
        assert_eq!(teachers.len(), 1);
    }
}
