// DORIS connector - urban registration records

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{address_matches, contains_ci, contains_id, same_label, simulate_latency, Connector};
use crate::criteria::{present, SearchCriteria};
use crate::error::ConnectorError;
use crate::raw::{DorisRecord, RawRecord};
use crate::record::Source;

pub struct DorisConnector {
    records: Vec<DorisRecord>,
    latency: Duration,
}

impl DorisConnector {
    pub fn new(records: Vec<DorisRecord>, latency: Duration) -> Self {
        DorisConnector { records, latency }
    }

    /// DORIS only registers urban property unless a record says otherwise
    fn property_type(record: &DorisRecord) -> &str {
        present(&record.property_type).unwrap_or("urban")
    }

    pub(crate) fn matches(record: &DorisRecord, criteria: &SearchCriteria) -> bool {
        let owner = present(&record.owner_name).or_else(|| present(&record.owner));
        let address = present(&record.property_address).or_else(|| present(&record.address));
        let id = present(&record.property_id).or_else(|| present(&record.id));
        let reg_number = present(&record.reg_number).or_else(|| present(&record.registration_number));

        if let Some(name) = present(&criteria.owner_name) {
            if !contains_ci(owner, name) {
                return false;
            }
        }

        if !address_matches(address, &criteria.address_terms()) {
            return false;
        }

        if let Some(wanted) = present(&criteria.property_id) {
            if !contains_id(id, wanted) && !contains_id(reg_number, wanted) {
                return false;
            }
        }

        if let Some(wanted) = present(&criteria.registration_number) {
            if !contains_id(reg_number, wanted) {
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
impl Connector for DorisConnector {
    fn source(&self) -> Source {
        Source::Doris
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RawRecord>, ConnectorError> {
        debug!(?criteria, "searching DORIS");
        simulate_latency(self.latency).await;

        let results: Vec<RawRecord> = self
            .records
            .iter()
            .filter(|record| Self::matches(record, criteria))
            .cloned()
            .map(RawRecord::Doris)
            .collect();

        debug!(count = results.len(), "DORIS search finished");
        Ok(results)
    }
}

// ============================================================================
// TESTS
// ============================================================================
