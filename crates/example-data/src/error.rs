//! Error types for the example-data crate.
//!
//! Registry parsing and school generation fail through separate `thiserror`
//! enums so callers can tell a bad registry file from a generation problem.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or querying a seed registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry lists no academic years.
    #[error("registry contains no academic years")]
    EmptyAcademicYears,

    /// An academic year label is not of the form `YYYY-YYYY` with consecutive
    /// years.
    #[error("invalid academic year at index {index}: {value}")]
    InvalidAcademicYear {
        /// Index of the invalid label in the array.
        index: usize,
        /// The rejected label.
        value: String,
    },

    /// The registry lists no subjects.
    #[error("registry contains no subjects")]
    EmptySubjects,

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// A seed asks for an empty school or more classes than can be named.
    #[error("seed '{name}' must have between 1 and {max_classes} classes and at least one student per class")]
    InvalidSchoolSize {
        /// Name of the offending seed.
        name: String,
        /// Largest supported class count.
        max_classes: usize,
    },

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur while generating a school.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Failed to generate a valid person name after maximum retries.
    #[error("failed to generate valid person name after {max_attempts} attempts")]
    NameGenerationFailed {
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },

    /// A generated calendar date fell outside the supported range.
    #[error("academic year '{academic_year}' produced a date outside the calendar")]
    DateOutOfRange {
        /// Label of the academic year being generated.
        academic_year: String,
    },
}
