// CERSAI connector - security-interest filings
//
// CERSAI classifies assets (agricultural, residential, commercial, ...)
// rather than urban/rural, so type filters are translated before comparing.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{address_matches, contains_ci, contains_id, same_label, simulate_latency, Connector};
use crate::criteria::{present, SearchCriteria};
use crate::error::ConnectorError;
use crate::raw::{CersaiRecord, RawRecord};
use crate::record::Source;

const AGRICULTURAL: &str = "agricultural";

pub struct CersaiConnector {
    records: Vec<CersaiRecord>,
    latency: Duration,
}

impl CersaiConnector {
    pub fn new(records: Vec<CersaiRecord>, latency: Duration) -> Self {
        CersaiConnector { records, latency }
    }

    pub(crate) fn is_agricultural(record: &CersaiRecord) -> bool {
        present(&record.asset_type)
            .map(|kind| same_label(kind, AGRICULTURAL))
            .unwrap_or(false)
    }

    /// rural ↔ agricultural, urban ↔ anything else; other labels compare
    /// against the asset type directly
    fn type_matches(record: &CersaiRecord, filter: &str) -> bool {
        if same_label(filter, "rural") {
            Self::is_agricultural(record)
        } else if same_label(filter, "urban") {
            !Self::is_agricultural(record)
        } else {
            present(&record.asset_type)
                .map(|kind| same_label(kind, filter))
                .unwrap_or(false)
        }
    }

    pub(crate) fn matches(record: &CersaiRecord, criteria: &SearchCriteria) -> bool {
        let owner = present(&record.borrower_name).or_else(|| present(&record.owner_name));
        let address = present(&record.asset_address).or_else(|| present(&record.address));
        let id = present(&record.asset_id).or_else(|| present(&record.id));
        let interest_id = present(&record.security_interest_id).or_else(|| present(&record.registration_number));

        if let Some(name) = present(&criteria.owner_name) {
            if !contains_ci(owner, name) {
                return false;
            }
        }

        if !address_matches(address, &criteria.address_terms()) {
            return false;
        }

        if let Some(wanted) = present(&criteria.registration_number) {
            if !contains_id(interest_id, wanted) {
                return false;
            }
        }

        if let Some(wanted) = present(&criteria.property_id) {
            if !contains_id(id, wanted) && !contains_id(interest_id, wanted) {
                return false;
            }
        }

        if let Some(kind) = criteria.type_filter() {
            if !Self::type_matches(record, kind) {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl Connector for CersaiConnector {
    fn source(&self) -> Source {
        Source::Cersai
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RawRecord>, ConnectorError> {
        debug!(?criteria, "searching CERSAI");
        simulate_latency(self.latency).await;

        let results: Vec<RawRecord> = self
            .records
            .iter()
            .filter(|record| Self::matches(record, criteria))
            .cloned()
            .map(RawRecord::Cersai)
            .collect();

        debug!(count = results.len(), "CERSAI search finished");
        Ok(results)
    }
}

// ============================================================================
// TESTS
// ============================================================================
