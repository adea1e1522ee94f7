//! Pipeline configuration loaded via OrthoConfig.
//!
//! Values come from `CLASSBOOK_*` environment variables, a configuration
//! file, or command-line arguments. Every field is optional; accessors fall
//! back to the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::MAX_LIMIT;
use serde::Deserialize;
use thiserror::Error;

/// Chance that a flaky availability check reports an interruption.
pub const DEFAULT_FAULT_PROBABILITY: f64 = 0.2;
/// Deadline for one connectivity probe.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;
/// Page size used when a caller asks for paging without a limit.
pub const DEFAULT_PAGE_LIMIT: usize = pagination::DEFAULT_LIMIT;
/// Seed generated when none is named.
pub const DEFAULT_SEED_NAME: &str = "spring-term";

/// Errors returned by [`PipelineSettings::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("fault probability must lie within 0.0..=1.0, got {0}")]
    FaultProbability(f64),
    #[error("probe timeout must be positive")]
    ZeroProbeTimeout,
    #[error("default page limit must lie within 1..={max}, got {actual}")]
    PageLimit { max: usize, actual: usize },
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// Configuration for gates, paging and example data.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CLASSBOOK")]
pub struct PipelineSettings {
    /// Probability in `0.0..=1.0` that a demo availability check fails.
    pub fault_probability: Option<f64>,
    /// Seed for the fault injector. Unseeded injectors use system entropy.
    pub fault_seed: Option<u64>,
    /// Connectivity probe deadline in milliseconds.
    pub probe_timeout_ms: Option<u64>,
    /// Page size applied when none is requested.
    pub default_page_limit: Option<usize>,
    /// Example data seed to load from the registry.
    pub seed_name: Option<String>,
    /// Registry path override. The bundled registry is used when absent.
    pub registry_path: Option<PathBuf>,
}

impl PipelineSettings {
    pub fn fault_probability(&self) -> f64 {
        self.fault_probability.unwrap_or(DEFAULT_FAULT_PROBABILITY)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms.unwrap_or(DEFAULT_PROBE_TIMEOUT_MS))
    }

    pub fn default_page_limit(&self) -> usize {
        self.default_page_limit.unwrap_or(DEFAULT_PAGE_LIMIT)
    }

    /// Return the configured seed name, falling back to the default.
    pub fn seed_name(&self) -> &str {
        self.seed_name.as_deref().unwrap_or(DEFAULT_SEED_NAME)
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let probability = self.fault_probability();
        if !(0.0..=1.0).contains(&probability) {
            return Err(SettingsError::FaultProbability(probability));
        }
        if self.probe_timeout_ms == Some(0) {
            return Err(SettingsError::ZeroProbeTimeout);
        }
        let limit = self.default_page_limit();
        if limit == 0 || limit > MAX_LIMIT {
            return Err(SettingsError::PageLimit {
                max: MAX_LIMIT,
                actual: limit,
            });
        }
        if self.seed_name().trim().is_empty() {
            return Err(SettingsError::EmptySeedName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "CLASSBOOK_FAULT_PROBABILITY",
        "CLASSBOOK_FAULT_SEED",
        "CLASSBOOK_PROBE_TIMEOUT_MS",
        "CLASSBOOK_DEFAULT_PAGE_LIMIT",
        "CLASSBOOK_SEED_NAME",
        "CLASSBOOK_REGISTRY_PATH",
    ];

    fn load_from_empty_args() -> PipelineSettings {
        PipelineSettings::load_from_iter([OsString::from("classbook")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|var| (var, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.fault_probability(), DEFAULT_FAULT_PROBABILITY);
        assert_eq!(settings.fault_seed, None);
        assert_eq!(settings.probe_timeout(), Duration::from_millis(2000));
        assert_eq!(settings.default_page_limit(), 20);
        assert_eq!(settings.seed_name(), DEFAULT_SEED_NAME);
        assert!(settings.registry_path.is_none());
        assert_eq!(settings.validate(), Ok(()));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CLASSBOOK_FAULT_PROBABILITY", Some("0.5".to_owned())),
            ("CLASSBOOK_FAULT_SEED", Some("7".to_owned())),
            ("CLASSBOOK_PROBE_TIMEOUT_MS", Some("150".to_owned())),
            ("CLASSBOOK_DEFAULT_PAGE_LIMIT", Some("50".to_owned())),
            ("CLASSBOOK_SEED_NAME", Some("large-school".to_owned())),
            (
                "CLASSBOOK_REGISTRY_PATH",
                Some("/tmp/school_registry.json".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.fault_probability(), 0.5);
        assert_eq!(settings.fault_seed, Some(7));
        assert_eq!(settings.probe_timeout(), Duration::from_millis(150));
        assert_eq!(settings.default_page_limit(), 50);
        assert_eq!(settings.seed_name(), "large-school");
        assert_eq!(
            settings.registry_path,
            Some(PathBuf::from("/tmp/school_registry.json"))
        );
    }

    #[rstest]
    #[case(PipelineSettings { fault_probability: Some(1.2), ..PipelineSettings::default() }, SettingsError::FaultProbability(1.2))]
    #[case(PipelineSettings { probe_timeout_ms: Some(0), ..PipelineSettings::default() }, SettingsError::ZeroProbeTimeout)]
    #[case(PipelineSettings { default_page_limit: Some(0), ..PipelineSettings::default() }, SettingsError::PageLimit { max: 100, actual: 0 })]
    #[case(PipelineSettings { default_page_limit: Some(101), ..PipelineSettings::default() }, SettingsError::PageLimit { max: 100, actual: 101 })]
    #[case(PipelineSettings { seed_name: Some("  ".to_owned()), ..PipelineSettings::default() }, SettingsError::EmptySeedName)]
    fn unusable_values_are_rejected(#[case] settings: PipelineSettings, #[case] expected: SettingsError) {
        assert_eq!(settings.validate(), Err(expected));
    }
}
