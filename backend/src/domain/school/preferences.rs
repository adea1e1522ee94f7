//! A tourist's preferred sites.
//!
//! Sites are owner-scoped: a principal lists and changes only their own.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;

use super::{require_text, tourist};
use crate::domain::ports::RecordStore;
use crate::domain::{
    CommandPipeline, Gates, GroupOrder, Mapper, Pipeline, Record, RecordFilter, RecordId,
};

/// A site a user saved to visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredSite {
    pub id: RecordId,
    pub owner_id: String,
    pub site_name: String,
    pub city: String,
}

impl Record for PreferredSite {
    type Filter = PreferredSiteFilter;
    const KIND: &'static str = "preferred site";
    const OWNER_SCOPED: bool = true;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn check(&self) -> Result<(), String> {
        require_text("owner id", &self.owner_id)?;
        require_text("site name", &self.site_name)?;
        require_text("city", &self.city)
    }

    fn owner(&self) -> Option<&str> {
        Some(self.owner_id.as_str())
    }
}

/// Selects the sites one user saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredSiteFilter {
    owner_id: String,
}

impl PreferredSiteFilter {
    pub fn owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
        }
    }
}

impl RecordFilter<PreferredSite> for PreferredSiteFilter {
    fn validate(&self) -> Result<(), String> {
        require_text("owner id", &self.owner_id)
    }

    fn matches(&self, record: &PreferredSite) -> bool {
        record.owner_id == self.owner_id
    }

    fn owner(&self) -> Option<&str> {
        Some(self.owner_id.as_str())
    }
}

/// Site as shown to its owner. The owner id is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredSiteDto {
    pub id: String,
    pub site_name: String,
    pub city: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PreferredSiteMapper;

impl Mapper<PreferredSite> for PreferredSiteMapper {
    type Dto = PreferredSiteDto;

    fn to_dto(&self, record: &PreferredSite) -> PreferredSiteDto {
        PreferredSiteDto {
            id: record.id.to_string(),
            site_name: record.site_name.clone(),
            city: record.city.clone(),
        }
    }
}

/// A user's sites grouped by city.
pub fn preferred_sites_pipeline<S>(
    gates: Gates,
    store: Arc<S>,
) -> Pipeline<PreferredSite, S, PreferredSiteMapper>
where
    S: RecordStore<PreferredSite>,
{
    Pipeline::builder("preferred_sites", tourist(), gates, store, PreferredSiteMapper)
        .group_by(
            |dto: &PreferredSiteDto| dto.city.clone(),
            GroupOrder::Lexicographic,
        )
        .build()
}

/// Save or remove preferred sites.
pub fn preferred_site_commands<S>(
    gates: Gates,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
) -> CommandPipeline<PreferredSite, S, PreferredSiteMapper>
where
    S: RecordStore<PreferredSite>,
{
    CommandPipeline::new(
        "preferred_site_writes",
        tourist(),
        gates,
        store,
        PreferredSiteMapper,
        clock,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockRecordStore;
    use crate::domain::{Mutation, PipelineErrorKind, RequestContext};
    use crate::test_support::{fixed_gates, fixture_clock, principal};
    use rstest::rstest;

    fn site(id: &str, owner_id: &str) -> PreferredSite {
        PreferredSite {
            id: RecordId::new(id).expect("valid id"),
            owner_id: owner_id.to_owned(),
            site_name: "Pompei Scavi".to_owned(),
            city: "Pompei".to_owned(),
        }
    }

    fn stored_sites() -> MockRecordStore<PreferredSite> {
        let mut store = MockRecordStore::<PreferredSite>::new();
        store
            .expect_fetch_by_id()
            .returning(|id| Ok(Some(site(&id.to_string(), "p-1"))));
        store
    }

    type SiteWrites =
        CommandPipeline<PreferredSite, MockRecordStore<PreferredSite>, PreferredSiteMapper>;

    fn writes(store: MockRecordStore<PreferredSite>) -> SiteWrites {
        preferred_site_commands(fixed_gates(true, true), Arc::new(store), fixture_clock())
    }

    #[rstest]
    fn listing_someone_elses_sites_is_refused() {
        let mut store = MockRecordStore::<PreferredSite>::new();
        store.expect_fetch_by_filter().times(0);
        let pipeline = preferred_sites_pipeline(fixed_gates(true, true), Arc::new(store));

        let err = pipeline
            .execute(&RequestContext::by_filter(
                principal("p-2", [tourist()]),
                PreferredSiteFilter::owner("p-1"),
            ))
            .expect_err("sites belong to p-1");

        assert_eq!(err.kind(), PipelineErrorKind::Unauthorized);
    }

    #[rstest]
    fn reading_someone_elses_site_by_id_is_refused() {
        let pipeline = preferred_sites_pipeline(fixed_gates(true, true), Arc::new(stored_sites()));

        let err = pipeline
            .execute(&RequestContext::by_id(principal("p-2", [tourist()]), "ps-1"))
            .expect_err("site belongs to p-1");

        assert_eq!(err.kind(), PipelineErrorKind::Unauthorized);
    }

    #[rstest]
    #[case::insert_for_another_owner(Mutation::Insert(site("ps-9", "p-1")))]
    #[case::update_taking_over_a_site(Mutation::Update(site("ps-1", "p-2")))]
    #[case::delete_of_another_owner(Mutation::Delete("ps-1".to_owned()))]
    fn writes_outside_the_callers_sites_are_refused(#[case] mutation: Mutation<PreferredSite>) {
        let mut store = stored_sites();
        store.expect_insert().times(0);
        store.expect_update().times(0);
        store.expect_delete().times(0);

        let err = writes(store)
            .execute(&principal("p-2", [tourist()]), mutation)
            .expect_err("caller does not own the site");

        assert_eq!(err.kind(), PipelineErrorKind::Unauthorized);
    }

    #[rstest]
    fn owners_delete_their_own_sites() {
        let mut store = stored_sites();
        store
            .expect_delete()
            .times(1)
            .returning(|id| Ok(site(&id.to_string(), "p-1")));

        let removed = writes(store)
            .execute(&principal("p-1", [tourist()]), Mutation::Delete("ps-1".to_owned()))
            .expect("owner may delete");

        assert_eq!(removed.id, "ps-1");
    }

    #[test]
    fn dto_drops_owner() {
        let site = PreferredSite {
            id: RecordId::new("ps-1").expect("valid id"),
            owner_id: "p-7".to_owned(),
            site_name: "Reggia di Caserta".to_owned(),
            city: "Caserta".to_owned(),
        };

        let value = serde_json::to_value(PreferredSiteMapper.to_dto(&site)).expect("serialises");

        assert_eq!(
            value,
            serde_json::json!({ "id": "ps-1", "siteName": "Reggia di Caserta", "city": "Caserta" })
        );
    }
}
