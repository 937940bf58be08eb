// MCA21 connector - corporate-asset filings
//
// Companies are searchable by their own name or by any director's name.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{address_matches, contains_ci, contains_id, same_label, simulate_latency, Connector};
use crate::criteria::{present, SearchCriteria};
use crate::error::ConnectorError;
use crate::raw::{Mca21Record, RawRecord};
use crate::record::Source;

pub struct Mca21Connector {
    records: Vec<Mca21Record>,
    latency: Duration,
}

impl Mca21Connector {
    pub fn new(records: Vec<Mca21Record>, latency: Duration) -> Self {
        Mca21Connector { records, latency }
    }

    fn property_type(record: &Mca21Record) -> &str {
        present(&record.asset_type).unwrap_or("urban")
    }

    fn any_director(record: &Mca21Record, name: &str) -> bool {
        record
            .directors
            .iter()
            .any(|director| contains_ci(present(&director.name), name))
    }

    pub(crate) fn matches(record: &Mca21Record, criteria: &SearchCriteria) -> bool {
        let company = present(&record.company_name).or_else(|| present(&record.owner_name));
        let address = present(&record.asset_address)
            .or_else(|| present(&record.registered_address))
            .or_else(|| present(&record.address));
        let id = present(&record.company_id).or_else(|| present(&record.id));
        let cin = present(&record.cin);

        if let Some(name) = present(&criteria.owner_name) {
            if !contains_ci(company, name) && !Self::any_director(record, name) {
                return false;
            }
        }

        if let Some(name) = present(&criteria.company_name) {
            if !contains_ci(company, name) {
                return false;
            }
        }

        if let Some(name) = present(&criteria.director_name) {
            if !Self::any_director(record, name) {
                return false;
            }
        }

        if !address_matches(address, &criteria.address_terms()) {
            return false;
        }

        if let Some(wanted) = present(&criteria.cin) {
            if !contains_id(cin, wanted) {
                return false;
            }
        }

        if let Some(wanted) = present(&criteria.registration_number) {
            let charge = present(&record.charge_number);
            if !contains_id(cin, wanted) && !contains_id(charge, wanted) {
                return false;
            }
        }

        if let Some(wanted) = present(&criteria.property_id) {
            let holds = record
                .property_assets
                .iter()
                .any(|asset| contains_id(present(&asset.property_id), wanted));
            if !contains_id(id, wanted) && !holds {
                return false;
            }
        }

        if let Some(kind) = criteria.type_filter() {
            if !same_label(Self::property_type(record), kind) {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl Connector for Mca21Connector {
    fn source(&self) -> Source {
        Source::Mca21
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RawRecord>, ConnectorError> {
        debug!(?criteria, "searching MCA21");
        simulate_latency(self.latency).await;

        let results: Vec<RawRecord> = self
            .records
            .iter()
            .filter(|record| Self::matches(record, criteria))
            .cloned()
            .map(RawRecord::Mca21)
            .collect();

        debug!(count = results.len(), "MCA21 search finished");
        Ok(results)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::RegistryFixtures;

    fn connector() -> Mca21Connector {
        Mca21Connector::new(RegistryFixtures::builtin().mca21, Duration::ZERO)
    }

    fn ids(results: &[RawRecord]) -> Vec<String> {
        results
            .iter()
            .map(|raw| match raw {
                RawRecord::Mca21(r) => r.company_id.clone().or_else(|| r.id.clone()).unwrap_or_default(),
                other => panic!("unexpected record from MCA21: {:?}", other),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_owner_matches_company_or_director() {
        let company = SearchCriteria::default().with_owner_name("greenenergy");
        assert_eq!(ids(&connector().search(&company).await.unwrap()), vec!["MCA21-002"]);

        let director = SearchCriteria::default().with_owner_name("Priya Patel");
        assert_eq!(ids(&connector().search(&director).await.unwrap()), vec!["MCA21-001"]);
    }

    #[test]
    fn test_address_terms_follow_displayed_address() {
        let record = Mca21Record {
            asset_address: Some("Survey 12, Hosur Road, Bangalore, Karnataka".to_string()),
            registered_address: Some("Tower B, Cyber City, Gurugram, Haryana".to_string()),
            ..Default::default()
        };
        let karnataka = SearchCriteria {
            state: Some("Karnataka".to_string()),
            ..Default::default()
        };
        let haryana = SearchCriteria {
            state: Some("Haryana".to_string()),
            ..Default::default()
        };
        assert!(Mca21Connector::matches(&record, &karnataka));
        assert!(!Mca21Connector::matches(&record, &haryana));
    }

    #[tokio::test]
    async fn test_director_name_only_checks_directors() {
        let criteria = SearchCriteria::default().with_director_name("TechSolutions");
        assert!(connector().search(&criteria).await.unwrap().is_empty());

        let criteria = SearchCriteria::default().with_director_name("neha");
        assert_eq!(ids(&connector().search(&criteria).await.unwrap()), vec!["MCA21-002"]);
    }

    #[tokio::test]
    async fn test_cin_filter() {
        let criteria = SearchCriteria {
            cin: Some("L40300HR".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&connector().search(&criteria).await.unwrap()), vec!["MCA21-002"]);
    }

    #[tokio::test]
    async fn test_property_id_matches_held_assets() {
        let criteria = SearchCriteria::default().with_property_id("PROP-GGN-002");
        assert_eq!(ids(&connector().search(&criteria).await.unwrap()), vec!["MCA21-002"]);

        let criteria = SearchCriteria::default().with_property_id("DORIS-12345");
        assert_eq!(ids(&connector().search(&criteria).await.unwrap()), vec!["MCA21-12345"]);
    }

    #[tokio::test]
    async fn test_rural_filter_excludes_default_urban_companies() {
        let criteria = SearchCriteria::default().with_property_type("rural");
        assert!(connector().search(&criteria).await.unwrap().is_empty());
    }
}
