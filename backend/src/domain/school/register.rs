//! Class registers.

use std::sync::Arc;

use serde::Serialize;

use super::{require_text, validate_academic_year};
use crate::domain::ports::{NameDirectory, RecordStore};
use crate::domain::{
    Capability, Gates, GroupOrder, Mapper, Pipeline, Record, RecordFilter, RecordId, resolve_name,
};

/// A class register for one academic year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub id: RecordId,
    pub class_id: String,
    pub academic_year: String,
}

impl Record for Register {
    type Filter = RegisterFilter;
    const KIND: &'static str = "register";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        require_text("class id", &self.class_id)?;
        validate_academic_year(&self.academic_year)
    }
}

/// Selects the registers of one academic year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFilter {
    academic_year: String,
}

impl RegisterFilter {
    /// Select registers for `academic_year`, such as `2023-2024`.
    pub fn academic_year(academic_year: impl Into<String>) -> Self {
        Self {
            academic_year: academic_year.into(),
        }
    }
}

impl RecordFilter<Register> for RegisterFilter {
    fn validate(&self) -> Result<(), String> {
        validate_academic_year(&self.academic_year)
    }

    fn matches(&self, record: &Register) -> bool {
        record.academic_year == self.academic_year
    }
}

/// Register as shown to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    pub id: String,
    pub class_name: String,
    pub academic_year: String,
}

/// Resolves the class name of each register.
#[derive(Clone)]
pub struct RegisterMapper {
    directory: Arc<dyn NameDirectory>,
}

impl RegisterMapper {
    pub fn new(directory: Arc<dyn NameDirectory>) -> Self {
        Self { directory }
    }
}

impl Mapper<Register> for RegisterMapper {
    type Dto = RegisterDto;

    fn to_dto(&self, record: &Register) -> RegisterDto {
        RegisterDto {
            id: record.id.to_string(),
            class_name: resolve_name(self.directory.as_ref(), &record.class_id),
            academic_year: record.academic_year.clone(),
        }
    }
}

fn class_name(dto: &RegisterDto) -> String {
    dto.class_name.clone()
}

/// Registers of a year, ordered by class name.
pub fn registers_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<Register, S, RegisterMapper>
where
    S: RecordStore<Register>,
{
    Pipeline::builder(
        "registers",
        Capability::Administrator,
        gates,
        store,
        RegisterMapper::new(directory),
    )
    .sort_by(class_name)
    .build()
}

/// Registers of a year, grouped by class name in lexicographic order.
pub fn registers_by_class_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
    directory: Arc<dyn NameDirectory>,
) -> Pipeline<Register, S, RegisterMapper>
where
    S: RecordStore<Register>,
{
    Pipeline::builder(
        "registers_by_class",
        Capability::Administrator,
        gates,
        store,
        RegisterMapper::new(directory),
    )
    .group_by(class_name, GroupOrder::Lexicographic)
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockNameDirectory;
    use rstest::rstest;

    fn register(id: &str, class_id: &str, year: &str) -> Register {
        Register {
            id: RecordId::new(id).expect("valid id"),
            class_id: class_id.to_owned(),
            academic_year: year.to_owned(),
        }
    }

    #[rstest]
    fn filter_matches_exact_year() {
        let filter = RegisterFilter::academic_year("2023-2024");
        assert!(filter.matches(&register("r-1", "c-1", "2023-2024")));
        assert!(!filter.matches(&register("r-2", "c-1", "2022-2023")));
    }

    #[rstest]
    #[case("")]
    #[case("2023")]
    #[case("2023-2025")]
    fn malformed_years_fail_validation(#[case] year: &str) {
        assert!(RegisterFilter::academic_year(year).validate().is_err());
    }

    #[rstest]
    fn mapper_resolves_class_name() {
        let mut directory = MockNameDirectory::new();
        directory
            .expect_display_name()
            .withf(|id| id == "c-1")
            .return_const(Some("Grade 10A".to_owned()));
        let mapper = RegisterMapper::new(Arc::new(directory));

        let dto = mapper.to_dto(&register("r-1", "c-1", "2023-2024"));

        assert_eq!(dto.class_name, "Grade 10A");
        assert_eq!(dto, mapper.to_dto(&register("r-1", "c-1", "2023-2024")));
    }

    #[rstest]
    fn dto_serialises_camel_case() {
        let dto = RegisterDto {
            id: "r-1".to_owned(),
            class_name: "Grade 9A".to_owned(),
            academic_year: "2023-2024".to_owned(),
        };
        let value = serde_json::to_value(&dto).expect("serialises");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "r-1",
                "className": "Grade 9A",
                "academicYear": "2023-2024"
            })
        );
    }

    #[rstest]
    fn register_with_blank_class_is_malformed() {
        assert!(register("r-1", " ", "2023-2024").check().is_err());
    }
}
