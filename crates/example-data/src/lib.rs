//! Deterministic example school data for demonstrations and tests.
//!
//! A JSON seed registry names the academic years, subjects and visitor sites
//! a school draws from, plus named seeds describing its size. Generating from
//! a named seed always yields the same people, classes, registers, notes,
//! teaching assignments, justifications, report cards and attendance totals.
//! The crate is independent of backend domain types to avoid circular
//! dependencies.
//!
//! # Example
//!
//! ```
//! use example_data::{SeedRegistry, generate_example_school};
//!
//! let json = r#"{
//!     "version": 1,
//!     "academicYears": ["2023-2024", "2024-2025"],
//!     "subjects": ["Mathematics", "History"],
//!     "seeds": [{"name": "demo", "seed": 7, "classCount": 3, "studentsPerClass": 2}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("demo").expect("seed exists");
//! let school = generate_example_school(&registry, seed_def).expect("generation succeeds");
//!
//! assert_eq!(school.registers.len(), 3);
//! ```

mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use error::{GenerationError, RegistryError};
pub use generator::generate_example_school;
pub use registry::{
    AcademicYear, BUNDLED_REGISTRY_JSON, MAX_CLASSES, SeedDefinition, SeedRegistry, SiteDefinition,
};
pub use seed::{
    AttendanceSeed, ClassSeed, ExampleSchool, JustificationSeed, JustificationStatusSeed,
    NoteSeed, PersonSeed, PreferredSiteSeed, RegisterSeed, ReportCardSeed, RoleSeed, TeachingSeed,
};
pub use validation::{PERSON_NAME_MAX, PERSON_NAME_MIN, is_valid_person_name};
