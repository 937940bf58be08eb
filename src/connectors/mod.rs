// 🔌 Connector Framework - one adapter per registry
//
// A connector owns an immutable dataset, waits out a simulated registry
// latency and returns the records matching the criteria in the registry's
// own shape. Normalization happens later, never here.

pub mod cersai;
pub mod dlr;
pub mod doris;
pub mod mca21;

pub use cersai::CersaiConnector;
pub use dlr::DlrConnector;
pub use doris::DorisConnector;
pub use mca21::Mca21Connector;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LatencyProfile;
use crate::criteria::SearchCriteria;
use crate::error::ConnectorError;
use crate::fixtures::RegistryFixtures;
use crate::raw::RawRecord;
use crate::record::Source;

// ============================================================================
// CONNECTOR TRAIT
// ============================================================================

/// Connector - query one registry.
///
/// Implementations must not share mutable state: the orchestrator polls
/// several of them at once for the same request.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Registry this connector answers for
    fn source(&self) -> Source;

    /// Return every record matching `criteria`, in dataset order
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RawRecord>, ConnectorError>;

    /// Connector version (for provenance in logs)
    fn version(&self) -> &str {
        "1.0.0"
    }
}

// ============================================================================
// FACTORY
// ============================================================================

/// Build the connector for a registry from the shared fixtures
pub fn build_connector(source: Source, fixtures: &RegistryFixtures, latency: Duration) -> Arc<dyn Connector> {
    match source {
        Source::Doris => Arc::new(DorisConnector::new(fixtures.doris.clone(), latency)),
        Source::Dlr => Arc::new(DlrConnector::new(fixtures.dlr.clone(), latency)),
        Source::Cersai => Arc::new(CersaiConnector::new(fixtures.cersai.clone(), latency)),
        Source::Mca21 => Arc::new(Mca21Connector::new(fixtures.mca21.clone(), latency)),
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// ConnectorRegistry - resolves registry names to connectors
#[derive(Clone, Default)]
pub struct ConnectorRegistry {
    connectors: HashMap<Source, Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One connector per registry, each with its own latency
    pub fn from_fixtures(fixtures: &RegistryFixtures, latency: &LatencyProfile) -> Self {
        let mut registry = ConnectorRegistry::new();
        for source in Source::ALL {
            registry.register(build_connector(source, fixtures, latency.for_source(source)));
        }
        registry
    }

    /// Add or replace the connector for its registry
    pub fn register(&mut self, connector: Arc<dyn Connector>) {
        let source = connector.source();
        debug!(%source, version = connector.version(), "registered connector");
        self.connectors.insert(source, connector);
    }

    pub fn get(&self, source: Source) -> Option<Arc<dyn Connector>> {
        self.connectors.get(&source).cloned()
    }

    /// Resolve a registry by name (case-insensitive).
    ///
    /// Unknown names and registries without a connector yield None and a
    /// warning; callers treat that as an empty contribution.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Connector>> {
        match name.parse::<Source>() {
            Ok(source) => {
                let connector = self.get(source);
                if connector.is_none() {
                    warn!(%source, "no connector registered for registry; skipping");
                }
                connector
            }
            Err(err) => {
                warn!(error = %err, "skipping unresolvable registry");
                None
            }
        }
    }

    pub fn sources(&self) -> Vec<Source> {
        let mut sources: Vec<Source> = self.connectors.keys().copied().collect();
        sources.sort();
        sources
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

// ============================================================================
// FILTER HELPERS (shared by all connectors)
// ============================================================================

/// Case-insensitive substring match; a missing field never matches
pub(crate) fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

/// Case-sensitive substring match for identifiers
pub(crate) fn contains_id(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map(|h| h.contains(needle)).unwrap_or(false)
}

/// Exact, case-insensitive comparison of type labels
pub(crate) fn same_label(kind: &str, filter: &str) -> bool {
    kind.trim().eq_ignore_ascii_case(filter.trim())
}

/// Every term must occur in the address
pub(crate) fn address_matches(address: Option<&str>, terms: &[&str]) -> bool {
    terms.iter().all(|term| contains_ci(address, term))
}

/// Wait out the simulated registry round trip
pub(crate) async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

// ============================================================================
// TESTS
// ============================================================================
