// ⚙️ Configuration - environment-driven settings for the pipeline
//
// Every setting has a default, so an empty environment yields a working
// configuration backed by the built-in registry datasets.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::record::Source;

pub const ENV_DATA_FILE: &str = "UDAAN_DATA_FILE";
pub const ENV_FIXTURES: &str = "UDAAN_FIXTURES";
pub const ENV_LATENCY_MS: &str = "UDAAN_LATENCY_MS";
pub const ENV_CONNECTOR_TIMEOUT_MS: &str = "UDAAN_CONNECTOR_TIMEOUT_MS";

pub const DEFAULT_DATA_FILE: &str = "data/unified_property_data.json";

// ============================================================================
// LATENCY PROFILE
// ============================================================================

/// Simulated round-trip time of each registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub doris: Duration,
    pub dlr: Duration,
    pub cersai: Duration,
    pub mca21: Duration,
}

impl LatencyProfile {
    /// Same latency for every registry
    pub fn uniform(latency: Duration) -> Self {
        LatencyProfile {
            doris: latency,
            dlr: latency,
            cersai: latency,
            mca21: latency,
        }
    }

    /// No simulated delay (tests, batch runs)
    pub fn zero() -> Self {
        Self::uniform(Duration::ZERO)
    }

    pub fn for_source(&self, source: Source) -> Duration {
        match source {
            Source::Doris => self.doris,
            Source::Dlr => self.dlr,
            Source::Cersai => self.cersai,
            Source::Mca21 => self.mca21,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        LatencyProfile {
            doris: Duration::from_millis(500),
            dlr: Duration::from_millis(700),
            cersai: Duration::from_millis(600),
            mca21: Duration::from_millis(700),
        }
    }
}

// ============================================================================
// APP CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Unified store container
    pub data_file: PathBuf,
    /// Replacement registry datasets; None means built-in
    pub fixtures_file: Option<PathBuf>,
    pub latency: LatencyProfile,
    /// Per-connector deadline; None waits for every connector
    pub connector_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            fixtures_file: None,
            latency: LatencyProfile::default(),
            connector_timeout: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from `UDAAN_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = AppConfig::default();

        if let Some(path) = get(ENV_DATA_FILE) {
            config.data_file = PathBuf::from(path);
        }

        config.fixtures_file = get(ENV_FIXTURES).map(PathBuf::from);

        if let Some(raw) = get(ENV_LATENCY_MS) {
            let latency = parse_millis(ENV_LATENCY_MS, &raw)?;
            config.latency = LatencyProfile::uniform(latency);
        }

        if let Some(raw) = get(ENV_CONNECTOR_TIMEOUT_MS) {
            config.connector_timeout = Some(parse_millis(ENV_CONNECTOR_TIMEOUT_MS, &raw)?);
        }

        Ok(config)
    }

    /// Builder pattern: store container path
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Builder pattern: registry datasets file
    pub fn with_fixtures_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixtures_file = Some(path.into());
        self
    }

    /// Builder pattern: same latency for every registry
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = LatencyProfile::uniform(latency);
        self
    }

    /// Builder pattern: per-connector deadline
    pub fn with_connector_timeout(mut self, timeout: Duration) -> Self {
        self.connector_timeout = Some(timeout);
        self
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration> {
    let millis: u64 = raw
        .parse()
        .with_context(|| format!("{} must be a whole number of milliseconds, got {:?}", key, raw))?;
    Ok(Duration::from_millis(millis))
}

// ============================================================================
// TESTS
// ============================================================================
