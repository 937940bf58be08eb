// End-to-end tests of the aggregation pipeline through the public API

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use udaan::{
    AppConfig, Connector, ConnectorError, ConnectorRegistry, DorisRecord, LatencyProfile, PropertySearchService,
    PropertyType, RawRecord, RecordQuery, RegistryFixtures, SearchCriteria, Source, UnifiedStore,
};

async fn service_with(dir: &TempDir, latency: LatencyProfile) -> PropertySearchService {
    let connectors = ConnectorRegistry::from_fixtures(&RegistryFixtures::builtin(), &latency);
    let store = UnifiedStore::open(dir.path().join("unified_property_data.json"))
        .await
        .unwrap();
    PropertySearchService::new(connectors, Arc::new(store))
}

/// Returns the same id-less record on every search
struct AnonymousDoris;

#[async_trait]
impl Connector for AnonymousDoris {
    fn source(&self) -> Source {
        Source::Doris
    }

    async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<RawRecord>, ConnectorError> {
        Ok(vec![RawRecord::Doris(DorisRecord {
            owner_name: Some("Walk-in Owner".to_string()),
            address: Some("Ward 7, Surat, Gujarat".to_string()),
            ..Default::default()
        })])
    }
}

#[tokio::test]
async fn test_owner_search_finds_urban_record() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, LatencyProfile::zero()).await;

    let criteria = SearchCriteria::default()
        .with_owner_name("Suresh Patel")
        .with_property_type("urban");
    let response = service.search_all(&criteria).await;

    assert!(response.success);
    assert_eq!(response.sources, Some(vec![Source::Doris, Source::Cersai, Source::Mca21]));
    assert!(response.results.iter().any(|r| {
        matches!(r.source, Source::Doris | Source::Mca21)
            && r.property_type == PropertyType::Urban
            && r.owner_name.contains("Suresh Patel")
    }));
    assert!(response.results.iter().all(|r| r.property_type == PropertyType::Urban));
}

#[tokio::test]
async fn test_untyped_search_queries_cersai_once() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, LatencyProfile::zero()).await;

    let response = service.search_all(&SearchCriteria::default()).await;
    assert_eq!(
        response.sources,
        Some(vec![Source::Doris, Source::Cersai, Source::Mca21, Source::Dlr])
    );

    let cersai = response.results.iter().filter(|r| r.source == Source::Cersai).count();
    assert_eq!(cersai, 4);

    // connector order, then dataset order
    let order: Vec<Source> = response.results.iter().map(|r| r.source).collect();
    let mut sorted_by_selection = order.clone();
    let rank = |s: &Source| [Source::Doris, Source::Cersai, Source::Mca21, Source::Dlr]
        .iter()
        .position(|x| x == s)
        .unwrap_or(usize::MAX);
    sorted_by_selection.sort_by_key(rank);
    assert_eq!(order, sorted_by_selection);
}

#[tokio::test]
async fn test_rural_search_returns_only_rural_records() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, LatencyProfile::zero()).await;

    let response = service
        .search_all(&SearchCriteria::default().with_property_type("rural"))
        .await;

    assert_eq!(response.sources, Some(vec![Source::Dlr, Source::Cersai]));
    assert_eq!(response.count, Some(5));
    assert!(response.results.iter().all(|r| r.property_type == PropertyType::Rural));
}

#[tokio::test]
async fn test_repeated_search_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, LatencyProfile::zero()).await;

    let first = service.search_all(&SearchCriteria::default()).await;
    let second = service.search_all(&SearchCriteria::default()).await;
    assert_eq!(first.results, second.results);

    let stored = service.retrieve_unified_data(&RecordQuery::new()).await;
    assert!(stored.success);
    assert_eq!(stored.count, Some(16));
}

#[tokio::test]
async fn test_records_without_ids_do_not_duplicate() {
    let dir = TempDir::new().unwrap();
    let store = UnifiedStore::open(dir.path().join("store.json")).await.unwrap();
    let mut connectors = ConnectorRegistry::new();
    connectors.register(Arc::new(AnonymousDoris));
    let service = PropertySearchService::new(connectors, Arc::new(store));

    let criteria = SearchCriteria::default().with_property_type("urban");
    let first = service.search_all(&criteria).await;
    service.search_all(&criteria).await;

    // CERSAI and MCA21 have no connector here and contribute nothing
    assert_eq!(first.count, Some(1));
    assert!(first.results[0].id.starts_with("DORIS-"));
    assert_eq!(service.store().len().await, 1);
}

#[tokio::test]
async fn test_retrieve_from_empty_store() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, LatencyProfile::zero()).await;

    let response = service.retrieve_unified_data(&RecordQuery::new()).await;
    assert!(response.success);
    assert!(response.results.is_empty());
    assert_eq!(response.count, Some(0));
}

#[tokio::test]
async fn test_retrieve_filters_stored_records() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, LatencyProfile::zero()).await;
    service.search_all(&SearchCriteria::default()).await;

    let rural = service
        .retrieve_unified_data(&RecordQuery::new().with("propertyType", "Rural"))
        .await;
    assert_eq!(rural.count, Some(5));

    let by_id = service
        .retrieve_unified_data(&RecordQuery::new().with("id", "MCA21-12345"))
        .await;
    assert_eq!(by_id.count, Some(1));
    assert_eq!(by_id.results[0].registration_number, "CH12345");

    let criteria = SearchCriteria::default().with_owner_name("patel");
    let from_criteria = service.retrieve_unified_data(&RecordQuery::from(&criteria)).await;
    assert!(from_criteria.results.iter().all(|r| r.owner_name.to_lowercase().contains("patel")));
    assert_eq!(from_criteria.count, Some(3));
}

#[tokio::test]
async fn test_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default()
        .with_data_file(dir.path().join("data").join("unified.json"))
        .with_latency(Duration::ZERO);

    {
        let service = PropertySearchService::from_config(&config).await.unwrap();
        service
            .search_all(&SearchCriteria::default().with_property_type("rural"))
            .await;
    }

    let restarted = PropertySearchService::from_config(&config).await.unwrap();
    let stored = restarted.retrieve_unified_data(&RecordQuery::new()).await;
    assert_eq!(stored.count, Some(5));
}

#[tokio::test]
async fn test_fixtures_file_replaces_datasets() {
    let dir = TempDir::new().unwrap();
    let fixtures_path = dir.path().join("fixtures.json");
    std::fs::write(
        &fixtures_path,
        r#"{"dlr": [{"landId": "DLR-900", "khataHolder": "Gita Devi", "registrationDate": "01/02/2023"}]}"#,
    )
    .unwrap();

    let config = AppConfig::default()
        .with_data_file(dir.path().join("store.json"))
        .with_fixtures_file(&fixtures_path)
        .with_latency(Duration::ZERO);
    let service = PropertySearchService::from_config(&config).await.unwrap();

    let response = service.search_all(&SearchCriteria::default()).await;
    assert_eq!(response.count, Some(1));
    assert_eq!(response.results[0].id, "DLR-900");
    assert_eq!(response.results[0].registration_date.to_string(), "2023-02-01");
}

#[tokio::test]
async fn test_missing_fixtures_file_is_error() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::default()
        .with_data_file(dir.path().join("store.json"))
        .with_fixtures_file(dir.path().join("absent.json"));
    assert!(PropertySearchService::from_config(&config).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_connectors_run_concurrently() {
    let dir = TempDir::new().unwrap();
    let service = service_with(&dir, LatencyProfile::default()).await;

    let started = tokio::time::Instant::now();
    let (records, sources) = service.collect(&SearchCriteria::default()).await;
    let elapsed = started.elapsed();

    assert_eq!(sources.len(), 4);
    assert_eq!(records.len(), 16);
    // bounded by the slowest registry (700ms), not the sum (2500ms)
    assert!(elapsed >= Duration::from_millis(700));
    assert!(elapsed < Duration::from_millis(1000), "took {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_slow_connector_times_out() {
    let dir = TempDir::new().unwrap();
    let latency = LatencyProfile {
        doris: Duration::ZERO,
        dlr: Duration::from_secs(5),
        cersai: Duration::from_secs(5),
        mca21: Duration::from_secs(5),
    };
    let service = service_with(&dir, latency).await.with_timeout(Duration::from_secs(1));

    let (records, sources) = service.collect(&SearchCriteria::default()).await;
    assert_eq!(sources.len(), 4);
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.source == Source::Doris));
}
