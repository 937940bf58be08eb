// DLR connector - rural land records

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{address_matches, contains_ci, contains_id, same_label, simulate_latency, Connector};
use crate::criteria::{present, SearchCriteria};
use crate::error::ConnectorError;
use crate::raw::{DlrRecord, RawRecord};
use crate::record::Source;

pub struct DlrConnector {
    records: Vec<DlrRecord>,
    latency: Duration,
}

impl DlrConnector {
    pub fn new(records: Vec<DlrRecord>, latency: Duration) -> Self {
        DlrConnector { records, latency }
    }

    fn property_type(record: &DlrRecord) -> &str {
        present(&record.property_type).unwrap_or("rural")
    }

    pub(crate) fn matches(record: &DlrRecord, criteria: &SearchCriteria) -> bool {
        let owner = present(&record.owner_name).or_else(|| present(&record.khata_holder));
        let address = present(&record.land_address).or_else(|| present(&record.address));
        let id = present(&record.land_id).or_else(|| present(&record.id));
        let khasra = present(&record.khasra_number);
        let survey = present(&record.survey_number);

        if let Some(name) = present(&criteria.owner_name) {
            if !contains_ci(owner, name) {
                return false;
            }
        }

        if !address_matches(address, &criteria.address_terms()) {
            return false;
        }

        // Land parcels are identified by land id, khasra or survey number
        if let Some(wanted) = present(&criteria.property_id) {
            if !contains_id(id, wanted) && !contains_id(khasra, wanted) && !contains_id(survey, wanted) {
                return false;
            }
        }

        if let Some(wanted) = present(&criteria.survey_number) {
            if !contains_id(survey, wanted) && !contains_id(khasra, wanted) {
                return false;
            }
        }

        if let Some(wanted) = present(&criteria.registration_number) {
            let reg = khasra.or_else(|| present(&record.registration_number));
            if !contains_id(reg, wanted) {
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
impl Connector for DlrConnector {
    fn source(&self) -> Source {
        Source::Dlr
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RawRecord>, ConnectorError> {
        debug!(?criteria, "searching DLR");
        simulate_latency(self.latency).await;

        let results: Vec<RawRecord> = self
            .records
            .iter()
            .filter(|record| Self::matches(record, criteria))
            .cloned()
            .map(RawRecord::Dlr)
            .collect();

        debug!(count = results.len(), "DLR search finished");
        Ok(results)
    }
}

// ============================================================================
// TESTS
// ============================================================================
