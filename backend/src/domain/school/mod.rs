//! School management use cases built on the retrieval pipeline.
//!
//! Each submodule pairs a raw record with its filter, transfer object,
//! mapper and pipeline constructors:
//!
//! - [`register`]: class registers, listed or grouped by class.
//! - [`note`]: disciplinary notes for one student.
//! - [`teaching`]: teaching assignments grouped by class.
//! - [`justification`]: absence justifications, readable and writable.
//! - [`report`]: report cards and grade statistics.
//! - [`monitoring`]: students over absence or note thresholds.
//! - [`preferences`]: a tourist's preferred sites grouped by city.

use crate::domain::Capability;

pub mod justification;
pub mod monitoring;
pub mod note;
pub mod preferences;
pub mod register;
pub mod report;
pub mod teaching;

pub use justification::{
    Justification, JustificationDto, JustificationFilter, JustificationMapper,
    JustificationStatus, justification_commands, justifications_pipeline,
};
pub use monitoring::{
    AttendanceTally, MonitoringDto, MonitoringFilter, MonitoringMapper, monitoring_pipeline,
};
pub use note::{Note, NoteDto, NoteFilter, NoteMapper, notes_pipeline};
pub use preferences::{
    PreferredSite, PreferredSiteDto, PreferredSiteFilter, PreferredSiteMapper,
    preferred_site_commands, preferred_sites_pipeline,
};
pub use register::{
    Register, RegisterDto, RegisterFilter, RegisterMapper, registers_by_class_pipeline,
    registers_pipeline,
};
pub use report::{
    ReportCard, ReportCardDto, ReportCardFilter, ReportCardMapper, ReportStatistics,
    ReportStatisticsService, report_cards_pipeline, report_statistics_pipeline,
};
pub use teaching::{Teaching, TeachingDto, TeachingFilter, TeachingMapper, teachings_pipeline};

/// Name of the custom capability held by tourists.
pub const TOURIST: &str = "tourist";

/// The capability required to manage preferred sites.
pub fn tourist() -> Capability {
    Capability::Custom(TOURIST.to_owned())
}

/// Reject blank text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be blank"));
    }
    Ok(())
}

/// Check an academic year label of the form `2023-2024`.
///
/// The two years must be consecutive.
///
/// # Examples
/// ```
/// use classbook::domain::school::validate_academic_year;
///
/// assert!(validate_academic_year("2023-2024").is_ok());
/// assert!(validate_academic_year("2023-2025").is_err());
/// assert!(validate_academic_year("23-24").is_err());
/// ```
pub fn validate_academic_year(label: &str) -> Result<(), String> {
    let invalid = || format!("academic year `{label}` must look like 2023-2024");
    let (start, end) = label.split_once('-').ok_or_else(invalid)?;
    let four_digits = |part: &str| part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit());
    if !four_digits(start) || !four_digits(end) {
        return Err(invalid());
    }
    let start: u16 = start.parse().map_err(|_| invalid())?;
    let end: u16 = end.parse().map_err(|_| invalid())?;
    if start.checked_add(1) != Some(end) {
        return Err(format!(
            "academic year `{label}` must span consecutive years"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2023-2024", true)]
    #[case("1999-2000", true)]
    #[case("2023-2023", false)]
    #[case("2024-2023", false)]
    #[case("2023/2024", false)]
    #[case("2023-20244", false)]
    #[case("abcd-efgh", false)]
    #[case("", false)]
    #[case("+999-1000", false)]
    #[case("2023-+024", false)]
    #[case(" 203-2024", false)]
    fn academic_years_are_checked(#[case] label: &str, #[case] valid: bool) {
        assert_eq!(validate_academic_year(label).is_ok(), valid);
    }

    #[rstest]
    fn tourist_is_a_custom_capability() {
        assert_eq!(tourist(), Capability::custom("tourist").expect("valid name"));
    }

    #[rstest]
    fn blank_text_is_rejected() {
        assert_eq!(
            require_text("reason", "  "),
            Err("reason must not be blank".to_owned())
        );
        assert!(require_text("reason", "fever").is_ok());
    }
}
