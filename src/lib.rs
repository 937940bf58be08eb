// Udaan - Unified Property Registry Aggregator - Core Library
// Exposes the aggregation pipeline for use in the CLI and tests

pub mod config;
pub mod connectors;
pub mod criteria;
pub mod error;
pub mod fixtures;
pub mod normalizer;
pub mod raw;
pub mod record;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::{AppConfig, LatencyProfile};
pub use connectors::{
    build_connector, CersaiConnector, Connector, ConnectorRegistry, DlrConnector, DorisConnector,
    Mca21Connector,
};
pub use criteria::{RecordQuery, SearchCriteria};
pub use error::{ConnectorError, StoreError, UnknownSource};
pub use fixtures::RegistryFixtures;
pub use normalizer::{normalize, normalize_all, normalize_date, parse_date};
pub use raw::{CersaiRecord, Director, DlrRecord, DorisRecord, Mca21Record, PropertyAsset, RawEncumbrance, RawRecord};
pub use record::{CanonicalRecord, Encumbrance, PropertyType, RecordDate, Source, NOT_AVAILABLE};
pub use service::{PropertySearchService, RetrieveResponse, SearchResponse};
pub use store::{MergeOutcome, UnifiedStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
