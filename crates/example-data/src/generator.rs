//! Deterministic school generation from seed definitions.
//!
//! The same seed definition always produces an identical school: every random
//! draw comes from a single `ChaCha8Rng` seeded from the definition, and
//! draws happen in a fixed order.

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::registry::{AcademicYear, SeedDefinition, SeedRegistry};
use crate::seed::{
    AttendanceSeed, ClassSeed, ExampleSchool, JustificationSeed, JustificationStatusSeed,
    NoteSeed, PersonSeed, PreferredSiteSeed, RegisterSeed, ReportCardSeed, RoleSeed, TeachingSeed,
};
use crate::validation::{PERSON_NAME_MAX, is_valid_person_name, sanitize_person_name};

/// Maximum number of attempts to generate a valid person name.
const MAX_NAME_ATTEMPTS: usize = 100;

const GRADE_LEVELS: [u8; 4] = [9, 10, 11, 12];

const MIN_SUBJECTS_PER_CLASS: usize = 2;
const MAX_SUBJECTS_PER_CLASS: usize = 4;

const MAX_NOTES_PER_STUDENT: u32 = 5;
const MAX_ABSENCES: u32 = 12;
const MAX_JUSTIFICATIONS_PER_STUDENT: u32 = 2;
const MAX_SITES_PER_PARENT: usize = 3;

const LOWEST_GRADE: u8 = 40;
const HIGHEST_GRADE: u8 = 100;

/// School days are drawn from this many days after 1 September.
const SCHOOL_DAYS: u64 = 270;

const NOTE_DESCRIPTIONS: [&str; 5] = [
    "Disrupted the lesson repeatedly",
    "Arrived late without a permit",
    "Homework not handed in",
    "Used a phone during a test",
    "Left the classroom without permission",
];

const ABSENCE_REASONS: [&str; 5] = [
    "Medical appointment",
    "Illness",
    "Family emergency",
    "Sports competition",
    "Transport strike",
];

const REPORT_COMMENTS: [&str; 4] = [
    "Consistent effort across subjects",
    "Needs to participate more in class",
    "Excellent progress this semester",
    "Should review fundamentals before exams",
];

/// Generates an example school from a seed definition.
///
/// The school contains:
///
/// - One administrator, who reviews every justification
/// - One teacher per registry subject
/// - `class_count` classes named `Grade 9A`, `Grade 10A`, and so on, spread
///   round-robin across the registry's academic years, each with a register
///   and two to four teaching assignments
/// - `students_per_class` students per class, each with one parent, up to
///   five notes, attendance totals, up to two justifications and a report card
///   per semester
/// - Up to three preferred sites per parent, when the registry lists sites
///
/// # Errors
///
/// Returns [`GenerationError`] if a valid person name cannot be produced
/// within the retry budget or an academic year yields a date outside the
/// calendar.
///
/// # Example
///
/// ```
/// use example_data::{RoleSeed, SeedRegistry, generate_example_school};
///
/// let json = r#"{
///     "version": 1,
///     "academicYears": ["2023-2024"],
///     "subjects": ["Mathematics", "History", "Art"],
///     "seeds": [{"name": "small", "seed": 42, "classCount": 2, "studentsPerClass": 3}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid");
/// let seed_def = registry.find_seed("small").expect("found");
/// let school = generate_example_school(&registry, seed_def).expect("generated");
///
/// assert_eq!(school.classes.len(), 2);
/// assert_eq!(school.people_with_role(RoleSeed::Student).count(), 6);
/// // Same seed produces an identical school
/// let again = generate_example_school(&registry, seed_def).expect("generated");
/// assert_eq!(school, again);
/// ```
pub fn generate_example_school(
    registry: &SeedRegistry,
    seed_def: &SeedDefinition,
) -> Result<ExampleSchool, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());
    let mut school = ExampleSchool::default();

    let administrator = generate_person(&mut rng, RoleSeed::Administrator)?;
    let administrator_id = administrator.id;
    school.people.push(administrator);

    let mut subject_teachers = Vec::with_capacity(registry.subjects().len());
    for subject in registry.subjects() {
        let teacher = generate_person(&mut rng, RoleSeed::Teacher)?;
        subject_teachers.push((subject.clone(), teacher.id));
        school.people.push(teacher);
    }

    let mut builder = SchoolBuilder {
        rng,
        registry,
        school,
        administrator_id,
        subject_teachers,
    };
    let years = registry.academic_years().iter().cycle();
    for (name, year) in class_names().take(seed_def.class_count()).zip(years) {
        builder.add_class(name, year, seed_def.students_per_class())?;
    }

    Ok(builder.school)
}

struct SchoolBuilder<'a> {
    rng: ChaCha8Rng,
    registry: &'a SeedRegistry,
    school: ExampleSchool,
    administrator_id: Uuid,
    subject_teachers: Vec<(String, Uuid)>,
}

impl SchoolBuilder<'_> {
    fn add_class(
        &mut self,
        name: String,
        year: &AcademicYear,
        students: usize,
    ) -> Result<(), GenerationError> {
        let class = ClassSeed {
            id: random_id(&mut self.rng),
            name,
            academic_year: year.label().to_owned(),
        };

        self.school.registers.push(RegisterSeed {
            id: random_id(&mut self.rng),
            class_id: class.id,
            academic_year: class.academic_year.clone(),
        });

        let taught = select_subset(
            &mut self.rng,
            &self.subject_teachers,
            MIN_SUBJECTS_PER_CLASS,
            MAX_SUBJECTS_PER_CLASS,
        );
        for (subject, teacher_id) in taught {
            self.school.teachings.push(TeachingSeed {
                id: random_id(&mut self.rng),
                class_id: class.id,
                teacher_id,
                subject,
            });
        }

        for _ in 0..students {
            self.add_student(class.id, year)?;
        }

        self.school.classes.push(class);
        Ok(())
    }

    fn add_student(&mut self, class_id: Uuid, year: &AcademicYear) -> Result<(), GenerationError> {
        let mut student = generate_person(&mut self.rng, RoleSeed::Student)?;
        student.class_id = Some(class_id);
        let student_id = student.id;
        self.school.people.push(student);

        let mut parent = generate_person(&mut self.rng, RoleSeed::Parent)?;
        parent.guardian_of = Some(student_id);
        let parent_id = parent.id;
        self.school.people.push(parent);

        let notes = self.add_notes(student_id, year)?;
        let absences = self.rng.random_range(0..=MAX_ABSENCES);
        self.add_justifications(student_id, absences, year)?;
        self.school.attendance.push(AttendanceSeed {
            student_id,
            absences,
            notes,
        });

        for semester in 1..=2 {
            self.school.report_cards.push(ReportCardSeed {
                id: random_id(&mut self.rng),
                student_id,
                semester,
                overall_grade: self.rng.random_range(LOWEST_GRADE..=HIGHEST_GRADE),
                comments: pick(&mut self.rng, &REPORT_COMMENTS),
            });
        }

        let sites = select_subset(&mut self.rng, self.registry.sites(), 0, MAX_SITES_PER_PARENT);
        for site in sites {
            self.school.preferred_sites.push(PreferredSiteSeed {
                id: random_id(&mut self.rng),
                owner_id: parent_id,
                site_name: site.name().to_owned(),
                city: site.city().to_owned(),
            });
        }
        Ok(())
    }

    fn add_notes(&mut self, student_id: Uuid, year: &AcademicYear) -> Result<u32, GenerationError> {
        let count = self.rng.random_range(0..=MAX_NOTES_PER_STUDENT);
        for _ in 0..count {
            let Some(&(_, teacher_id)) = self.subject_teachers.choose(&mut self.rng) else {
                return Ok(0);
            };
            self.school.notes.push(NoteSeed {
                id: random_id(&mut self.rng),
                student_id,
                teacher_id,
                description: pick(&mut self.rng, &NOTE_DESCRIPTIONS),
                date: school_day(&mut self.rng, year)?,
            });
        }
        Ok(count)
    }

    fn add_justifications(
        &mut self,
        student_id: Uuid,
        absences: u32,
        year: &AcademicYear,
    ) -> Result<(), GenerationError> {
        let count = self
            .rng
            .random_range(0..=absences.min(MAX_JUSTIFICATIONS_PER_STUDENT));
        for _ in 0..count {
            let status = [
                JustificationStatusSeed::Pending,
                JustificationStatusSeed::Accepted,
                JustificationStatusSeed::Rejected,
            ]
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(JustificationStatusSeed::Pending);
            self.school.justifications.push(JustificationSeed {
                id: random_id(&mut self.rng),
                student_id,
                absence_date: school_day(&mut self.rng, year)?,
                reason: pick(&mut self.rng, &ABSENCE_REASONS),
                status,
                reviewer_id: self.administrator_id,
            });
        }
        Ok(())
    }
}

/// Class names in generation order: every grade level of section A, then of
/// section B, and so on.
fn class_names() -> impl Iterator<Item = String> {
    ('A'..='Z').flat_map(|section| {
        GRADE_LEVELS
            .into_iter()
            .map(move |level| format!("Grade {level}{section}"))
    })
}

fn random_id(rng: &mut ChaCha8Rng) -> Uuid {
    Uuid::from_u128(rng.random())
}

fn pick(rng: &mut ChaCha8Rng, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_owned()
}

fn school_day(rng: &mut ChaCha8Rng, year: &AcademicYear) -> Result<NaiveDate, GenerationError> {
    let offset = rng.random_range(0..SCHOOL_DAYS);
    NaiveDate::from_ymd_opt(year.start_year(), 9, 1)
        .and_then(|first_day| first_day.checked_add_days(Days::new(offset)))
        .ok_or_else(|| GenerationError::DateOutOfRange {
            academic_year: year.label().to_owned(),
        })
}

fn generate_person(rng: &mut ChaCha8Rng, role: RoleSeed) -> Result<PersonSeed, GenerationError> {
    let id = random_id(rng);
    let display_name = generate_person_name(rng)?;
    Ok(PersonSeed {
        id,
        display_name,
        role,
        class_id: None,
        guardian_of: None,
    })
}

/// Generates a valid person name using the provided RNG.
///
/// Retries up to `MAX_NAME_ATTEMPTS` times if the sanitised and truncated
/// candidate fails validation.
fn generate_person_name(rng: &mut ChaCha8Rng) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let first: String = FirstName(EN).fake_with_rng(rng);
        let last: String = LastName(EN).fake_with_rng(rng);

        let sanitized = sanitize_person_name(&format!("{first} {last}"));
        let truncated: String = sanitized.chars().take(PERSON_NAME_MAX).collect();

        if is_valid_person_name(&truncated) {
            return Ok(truncated);
        }
    }

    Err(GenerationError::NameGenerationFailed {
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}

/// Selects a deterministic subset of `items`.
///
/// The count is drawn from `min_count..=max_count`, clamped to the number of
/// available items.
fn select_subset<T: Clone>(
    rng: &mut ChaCha8Rng,
    items: &[T],
    min_count: usize,
    max_count: usize,
) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }

    let clamped_min = min_count.min(items.len());
    let clamped_max = max_count.min(items.len());
    let count = if clamped_min == clamped_max {
        clamped_min
    } else {
        rng.random_range(clamped_min..=clamped_max)
    };

    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}
