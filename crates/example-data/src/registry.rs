//! Seed registry types and JSON parsing.
//!
//! The registry names the academic years, subjects and visitor sites a
//! generated school draws from, plus one or more named seeds describing how
//! large each school should be.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// Registry shipped with the crate, used when no registry file is configured.
pub const BUNDLED_REGISTRY_JSON: &str = include_str!("../fixtures/school_registry.json");

/// Largest class count a seed may request: four grade levels times 26
/// section letters.
pub const MAX_CLASSES: usize = 104;

/// A seed registry containing named seeds and the catalogues they draw from.
///
/// # Example
///
/// ```
/// use example_data::SeedRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "academicYears": ["2023-2024"],
///     "subjects": ["Mathematics", "History"],
///     "seeds": [{"name": "small", "seed": 42, "classCount": 2, "studentsPerClass": 3}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.seeds().len(), 1);
/// assert_eq!(registry.academic_years()[0].start_year(), 2023);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    version: u32,
    academic_years: Vec<AcademicYear>,
    subjects: Vec<String>,
    sites: Vec<SiteDefinition>,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed or a required field is missing
    /// - The version is unsupported
    /// - An academic year label is malformed, or none are listed
    /// - No subjects are listed
    /// - The seeds array is empty or a seed describes an impossible school
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Parses the registry shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the bundled JSON fails validation.
    pub fn bundled() -> Result<Self, RegistryError> {
        Self::from_json(BUNDLED_REGISTRY_JSON)
    }

    /// Loads a seed registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        let academic_years = raw
            .academic_years
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                AcademicYear::parse(&label)
                    .ok_or(RegistryError::InvalidAcademicYear { index, value: label })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if academic_years.is_empty() {
            return Err(RegistryError::EmptyAcademicYears);
        }

        let subjects: Vec<String> = raw
            .subjects
            .into_iter()
            .map(|subject| subject.trim().to_owned())
            .filter(|subject| !subject.is_empty())
            .collect();
        if subjects.is_empty() {
            return Err(RegistryError::EmptySubjects);
        }

        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }
        let seeds = raw
            .seeds
            .into_iter()
            .map(SeedDefinition::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let sites = raw
            .sites
            .into_iter()
            .map(|site| SiteDefinition {
                name: site.name,
                city: site.city,
            })
            .collect();

        Ok(Self {
            version: raw.version,
            academic_years,
            subjects,
            sites,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the academic years classes are spread across.
    #[must_use]
    pub fn academic_years(&self) -> &[AcademicYear] {
        &self.academic_years
    }

    /// Returns the subjects classes may be taught.
    #[must_use]
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Returns the sites parents may bookmark. May be empty.
    #[must_use]
    pub fn sites(&self) -> &[SiteDefinition] {
        &self.sites
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// An academic year such as `2023-2024`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicYear {
    label: String,
    start_year: i32,
}

impl AcademicYear {
    fn parse(label: &str) -> Option<Self> {
        let (start, end) = label.split_once('-')?;
        if start.len() != 4 || end.len() != 4 {
            return None;
        }
        let start_year: i32 = start.parse().ok()?;
        let end_year: i32 = end.parse().ok()?;
        (start_year.checked_add(1)? == end_year).then(|| Self {
            label: label.to_owned(),
            start_year,
        })
    }

    /// Returns the label exactly as written in the registry.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the calendar year in which the academic year starts.
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }
}

/// A visitor site parents may keep as a preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDefinition {
    name: String,
    city: String,
}

impl SiteDefinition {
    /// Returns the site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the city the site is in.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }
}

/// A named seed definition for deterministic school generation.
///
/// Each seed has a unique name, an RNG seed value and the size of the school
/// to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    class_count: usize,
    students_per_class: usize,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of classes to generate.
    #[must_use]
    pub const fn class_count(&self) -> usize {
        self.class_count
    }

    /// Returns the number of students enrolled in each class.
    #[must_use]
    pub const fn students_per_class(&self) -> usize {
        self.students_per_class
    }
}

impl TryFrom<RawSeedDefinition> for SeedDefinition {
    type Error = RegistryError;

    fn try_from(raw: RawSeedDefinition) -> Result<Self, Self::Error> {
        if !(1..=MAX_CLASSES).contains(&raw.class_count) || raw.students_per_class == 0 {
            return Err(RegistryError::InvalidSchoolSize {
                name: raw.name,
                max_classes: MAX_CLASSES,
            });
        }
        Ok(Self {
            name: raw.name,
            seed: raw.seed,
            class_count: raw.class_count,
            students_per_class: raw.students_per_class,
        })
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    academic_years: Vec<String>,
    subjects: Vec<String>,
    #[serde(default)]
    sites: Vec<RawSiteDefinition>,
    seeds: Vec<RawSeedDefinition>,
}

#[derive(Debug, Deserialize)]
struct RawSiteDefinition {
    name: String,
    city: String,
}

/// Raw JSON representation of a seed definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    class_count: usize,
    students_per_class: usize,
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use rstest::rstest;

    use super::*;

    const VALID_JSON: &str = r#"{
        "version": 1,
        "academicYears": ["2022-2023", "2023-2024"],
        "subjects": ["Mathematics", "  ", "History"],
        "sites": [{"name": "Castel dell'Ovo", "city": "Naples"}],
        "seeds": [
            {"name": "spring-term", "seed": 2024, "classCount": 6, "studentsPerClass": 4},
            {"name": "tiny", "seed": 7, "classCount": 1, "studentsPerClass": 1}
        ]
    }"#;

    #[test]
    fn parses_valid_registry() {
        let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");

        assert_eq!(registry.version(), 1);
        assert_eq!(registry.academic_years().len(), 2);
        assert_eq!(registry.subjects(), ["Mathematics", "History"]);
        assert_eq!(registry.sites().len(), 1);
        assert_eq!(registry.seeds().len(), 2);
    }

    #[test]
    fn finds_seed_by_name() {
        let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");
        let seed = registry.find_seed("spring-term").expect("seed found");

        assert_eq!(seed.seed(), 2024);
        assert_eq!(seed.class_count(), 6);
        assert_eq!(seed.students_per_class(), 4);
    }

    #[rstest]
    #[case("2023-2024", Some(2023))]
    #[case("2023-2025", None)]
    #[case("23-24", None)]
    #[case("2023/2024", None)]
    #[case("abcd-efgh", None)]
    fn parses_academic_years(#[case] label: &str, #[case] expected: Option<i32>) {
        assert_eq!(
            AcademicYear::parse(label).map(|year| year.start_year()),
            expected
        );
    }

    #[rstest]
    #[case::unsupported_version(
        r#"{"version": 2, "academicYears": ["2023-2024"], "subjects": ["Art"], "seeds": [{"name": "a", "seed": 1, "classCount": 1, "studentsPerClass": 1}]}"#,
        RegistryError::UnsupportedVersion { expected: 1, actual: 2 }
    )]
    #[case::bad_year(
        r#"{"version": 1, "academicYears": ["2023-2024", "2024"], "subjects": ["Art"], "seeds": [{"name": "a", "seed": 1, "classCount": 1, "studentsPerClass": 1}]}"#,
        RegistryError::InvalidAcademicYear { index: 1, value: "2024".to_owned() }
    )]
    #[case::no_years(
        r#"{"version": 1, "academicYears": [], "subjects": ["Art"], "seeds": [{"name": "a", "seed": 1, "classCount": 1, "studentsPerClass": 1}]}"#,
        RegistryError::EmptyAcademicYears
    )]
    #[case::blank_subjects(
        r#"{"version": 1, "academicYears": ["2023-2024"], "subjects": [" "], "seeds": [{"name": "a", "seed": 1, "classCount": 1, "studentsPerClass": 1}]}"#,
        RegistryError::EmptySubjects
    )]
    #[case::empty_seeds(
        r#"{"version": 1, "academicYears": ["2023-2024"], "subjects": ["Art"], "seeds": []}"#,
        RegistryError::EmptySeeds
    )]
    #[case::too_many_classes(
        r#"{"version": 1, "academicYears": ["2023-2024"], "subjects": ["Art"], "seeds": [{"name": "huge", "seed": 1, "classCount": 105, "studentsPerClass": 1}]}"#,
        RegistryError::InvalidSchoolSize { name: "huge".to_owned(), max_classes: MAX_CLASSES }
    )]
    #[case::no_students(
        r#"{"version": 1, "academicYears": ["2023-2024"], "subjects": ["Art"], "seeds": [{"name": "empty", "seed": 1, "classCount": 2, "studentsPerClass": 0}]}"#,
        RegistryError::InvalidSchoolSize { name: "empty".to_owned(), max_classes: MAX_CLASSES }
    )]
    fn rejects_invalid_registry(#[case] json: &str, #[case] expected: RegistryError) {
        assert_eq!(SeedRegistry::from_json(json), Err(expected));
    }
}
