//! Loading the configured example school.

use std::sync::Arc;

use example_data::{
    ExampleSchool, GenerationError, RegistryError, RoleSeed, SeedRegistry,
    generate_example_school,
};
use thiserror::Error;
use tracing::info;

use super::dataset::{DatasetError, SchoolDataset};
use crate::config::PipelineSettings;
use crate::domain::ports::AvailabilityGate;

/// Errors returned while preparing example data.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Registry could not be read or parsed, or lacks the seed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Seed generation failed.
    #[error("example data generation error: {0}")]
    Generation(#[from] GenerationError),
    /// Generated data could not be loaded into stores.
    #[error("example data loading error: {0}")]
    Dataset(#[from] DatasetError),
    /// Seed name must not be empty.
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// Read the configured registry, or the bundled one when no path is set.
///
/// # Errors
///
/// Returns [`StartupError::Registry`] if the registry cannot be loaded.
pub fn load_registry(settings: &PipelineSettings) -> Result<SeedRegistry, StartupError> {
    let registry = match &settings.registry_path {
        Some(path) => SeedRegistry::from_file(path)?,
        None => SeedRegistry::bundled()?,
    };
    Ok(registry)
}

/// Generate the school named by the configured seed.
///
/// # Errors
///
/// Returns [`StartupError`] if the seed is blank, missing or cannot be
/// generated.
pub fn generate_school(settings: &PipelineSettings) -> Result<ExampleSchool, StartupError> {
    let seed_name = settings.seed_name().trim();
    if seed_name.is_empty() {
        return Err(StartupError::EmptySeedName);
    }
    let registry = load_registry(settings)?;
    let seed = registry.find_seed(seed_name)?;
    let school = generate_example_school(&registry, seed)?;
    info!(
        seed_key = seed_name,
        classes = school.classes.len(),
        students = school.people_with_role(RoleSeed::Student).count(),
        "example school generated"
    );
    Ok(school)
}

/// Generate the configured school and load it into stores guarded by
/// `gate`.
///
/// # Errors
///
/// Returns [`StartupError`] from generation or loading.
pub fn load_example_school(
    settings: &PipelineSettings,
    gate: Arc<dyn AvailabilityGate>,
) -> Result<(ExampleSchool, SchoolDataset), StartupError> {
    let school = generate_school(settings)?;
    let dataset = SchoolDataset::from_school(&school, gate)?;
    Ok((school, dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixtureAvailabilityGate;
    use rstest::rstest;

    #[rstest]
    fn default_settings_use_bundled_registry() {
        let (school, dataset) =
            load_example_school(&PipelineSettings::default(), Arc::new(FixtureAvailabilityGate))
                .expect("bundled seed loads");

        assert!(!school.classes.is_empty());
        assert_eq!(dataset.registers.len(), Ok(school.registers.len()));
    }

    #[rstest]
    fn unknown_seed_is_reported() {
        let settings = PipelineSettings {
            seed_name: Some("winter-term".to_owned()),
            ..PipelineSettings::default()
        };

        let err = generate_school(&settings).expect_err("seed is missing");
        assert!(matches!(err, StartupError::Registry(RegistryError::SeedNotFound { .. })));
    }

    #[rstest]
    fn blank_seed_is_rejected() {
        let settings = PipelineSettings {
            seed_name: Some("   ".to_owned()),
            ..PipelineSettings::default()
        };

        assert!(matches!(
            generate_school(&settings),
            Err(StartupError::EmptySeedName)
        ));
    }
}
