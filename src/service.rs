// 🧭 Property Search Service - fan-out, normalize, merge
//
// The entry points external callers use: search every relevant registry,
// search one registry, or read back the unified store.

use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::connectors::{Connector, ConnectorRegistry};
use crate::criteria::{RecordQuery, SearchCriteria};
use crate::error::ConnectorError;
use crate::fixtures::RegistryFixtures;
use crate::normalizer::normalize_all;
use crate::raw::RawRecord;
use crate::record::{CanonicalRecord, Source};
use crate::store::UnifiedStore;

// ============================================================================
// RESPONSES
// ============================================================================

/// Response of `search_all`.
///
/// Always successful: registry failures contribute no records and a store
/// failure is only logged, so `error` stays empty. Only retrieval has a
/// failure shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<CanonicalRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn ok(results: Vec<CanonicalRecord>, sources: Vec<Source>) -> Self {
        Self {
            success: true,
            count: Some(results.len()),
            results,
            sources: Some(sources),
            error: None,
        }
    }
}

/// Response of `retrieve_unified_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponse {
    pub success: bool,
    pub results: Vec<CanonicalRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RetrieveResponse {
    pub fn ok(results: Vec<CanonicalRecord>) -> Self {
        Self {
            success: true,
            count: Some(results.len()),
            results,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            count: None,
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct PropertySearchService {
    connectors: ConnectorRegistry,
    store: Arc<UnifiedStore>,
    timeout: Option<Duration>,
}

impl PropertySearchService {
    pub fn new(connectors: ConnectorRegistry, store: Arc<UnifiedStore>) -> Self {
        PropertySearchService {
            connectors,
            store,
            timeout: None,
        }
    }

    /// Builder pattern: give up on a connector after `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wire connectors and store from configuration.
    ///
    /// An unreadable fixtures file is an error; an unreadable store is not
    /// (the service starts with a degraded store and reports it per request).
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let fixtures = match &config.fixtures_file {
            Some(path) => RegistryFixtures::from_json_file(path)?,
            None => RegistryFixtures::builtin(),
        };
        debug!(records = fixtures.len(), "registry datasets loaded");

        let connectors = ConnectorRegistry::from_fixtures(&fixtures, &config.latency);
        let store = UnifiedStore::open_or_degraded(&config.data_file).await;

        let mut service = Self::new(connectors, Arc::new(store));
        if let Some(timeout) = config.connector_timeout {
            service = service.with_timeout(timeout);
        }
        Ok(service)
    }

    pub fn connectors(&self) -> &ConnectorRegistry {
        &self.connectors
    }

    pub fn store(&self) -> &Arc<UnifiedStore> {
        &self.store
    }

    /// Registries relevant to the criteria's property type, in query order.
    ///
    /// urban (or no type) → DORIS, CERSAI, MCA21; rural (or no type) → DLR,
    /// CERSAI. A registry selected by both branches appears once.
    pub fn select_sources(criteria: &SearchCriteria) -> Vec<Source> {
        let filter = criteria.type_filter();
        let wants = |label: &str| filter.map(|f| f.eq_ignore_ascii_case(label)).unwrap_or(true);

        let mut candidates = Vec::new();
        if wants("urban") {
            candidates.extend([Source::Doris, Source::Cersai, Source::Mca21]);
        }
        if wants("rural") {
            candidates.extend([Source::Dlr, Source::Cersai]);
        }

        let mut selected: Vec<Source> = Vec::with_capacity(candidates.len());
        for source in candidates {
            if !selected.contains(&source) {
                selected.push(source);
            }
        }
        selected
    }

    /// Run one connector, applying the deadline if one is configured
    async fn run_connector(&self, connector: Arc<dyn Connector>, criteria: &SearchCriteria) -> Result<Vec<RawRecord>, ConnectorError> {
        let source = connector.source();
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, connector.search(criteria))
                .await
                .map_err(|_| ConnectorError::TimedOut {
                    registry: source,
                    timeout,
                })?,
            None => connector.search(criteria).await,
        }
    }

    /// Query one registry; any failure becomes an empty contribution
    async fn query_source(&self, source: Source, criteria: &SearchCriteria) -> Vec<RawRecord> {
        let Some(connector) = self.connectors.get(source) else {
            warn!(%source, "no connector registered for registry; skipping");
            return Vec::new();
        };

        match self.run_connector(connector, criteria).await {
            Ok(records) => {
                debug!(%source, count = records.len(), "registry answered");
                records
            }
            Err(err) => {
                warn!(%source, error = %err, "registry failed; contributing no records");
                Vec::new()
            }
        }
    }

    /// Fan out to the selected registries concurrently and normalize what
    /// comes back. Nothing is persisted.
    pub async fn collect(&self, criteria: &SearchCriteria) -> (Vec<CanonicalRecord>, Vec<Source>) {
        let sources = Self::select_sources(criteria);
        debug!(?sources, "querying registries");

        let batches = join_all(sources.iter().map(|&source| self.query_source(source, criteria))).await;
        let raws: Vec<RawRecord> = batches.into_iter().flatten().collect();

        (normalize_all(&raws), sources)
    }

    /// Search every relevant registry and merge the results into the store.
    ///
    /// A store failure is logged; the freshly normalized results are still
    /// returned.
    pub async fn search_all(&self, criteria: &SearchCriteria) -> SearchResponse {
        let (records, sources) = self.collect(criteria).await;

        if let Err(err) = self.store.merge(&records).await {
            warn!(error = %err, "could not persist search results");
        }

        info!(count = records.len(), ?sources, "search complete");
        SearchResponse::ok(records, sources)
    }

    /// Search a single registry by name. Results are not persisted; an
    /// unknown name or failing registry yields an empty list.
    pub async fn search_source(&self, name: &str, criteria: &SearchCriteria) -> Vec<CanonicalRecord> {
        let Some(connector) = self.connectors.resolve(name) else {
            return Vec::new();
        };
        let source = connector.source();

        match self.run_connector(connector, criteria).await {
            Ok(raws) => {
                let records = normalize_all(&raws);
                info!(%source, count = records.len(), "single-registry search complete");
                records
            }
            Err(err) => {
                warn!(%source, error = %err, "registry failed; returning no records");
                Vec::new()
            }
        }
    }

    /// Read back stored records matching `query`
    pub async fn retrieve_unified_data(&self, query: &RecordQuery) -> RetrieveResponse {
        match self.store.query(query).await {
            Ok(records) => {
                debug!(count = records.len(), "retrieved unified records");
                RetrieveResponse::ok(records)
            }
            Err(err) => {
                warn!(error = %err, "retrieval failed");
                RetrieveResponse::failure(err.to_string())
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
