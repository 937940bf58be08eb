// 💾 Unified Store - canonical records persisted as one JSON container
//
// Layout on disk: {"properties": [CanonicalRecord, ...]}
//
// Merges are serialized by `writer` for the whole read-modify-rewrite and
// replace the file through a temp file + rename. Readers only ever see a
// complete snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::connectors::contains_ci;
use crate::criteria::RecordQuery;
use crate::error::StoreError;
use crate::record::CanonicalRecord;

#[derive(Debug, Default, Deserialize)]
struct Container {
    #[serde(default)]
    properties: Vec<CanonicalRecord>,
}

#[derive(Serialize)]
struct ContainerRef<'a> {
    properties: &'a [CanonicalRecord],
}

enum Snapshot {
    Ready(Arc<Vec<CanonicalRecord>>),
    /// The container could not be loaded; every operation reports this reason
    Unavailable(String),
}

/// Counts reported by a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub inserted: usize,
    pub updated: usize,
}

impl MergeOutcome {
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

pub struct UnifiedStore {
    path: PathBuf,
    writer: Mutex<()>,
    snapshot: RwLock<Snapshot>,
}

impl UnifiedStore {
    /// Open the container at `path`, creating an empty one if it does not exist
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let exists = tokio::fs::try_exists(&path).await.map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        if !exists {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            write_container(&path, &[]).await?;
            info!(path = %path.display(), "created new unified store");
        }

        let text = tokio::fs::read_to_string(&path).await.map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let container: Container = serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), records = container.properties.len(), "loaded unified store");

        Ok(UnifiedStore {
            path,
            writer: Mutex::new(()),
            snapshot: RwLock::new(Snapshot::Ready(Arc::new(container.properties))),
        })
    }

    /// Open the container, or return a store that refuses every operation
    /// when it cannot be loaded. The process keeps running either way.
    pub async fn open_or_degraded(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()).await {
            Ok(store) => store,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unified store unavailable");
                UnifiedStore {
                    path,
                    writer: Mutex::new(()),
                    snapshot: RwLock::new(Snapshot::Unavailable(err.to_string())),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn is_available(&self) -> bool {
        matches!(*self.snapshot.read().await, Snapshot::Ready(_))
    }

    /// Number of stored records (0 when unavailable)
    pub async fn len(&self) -> usize {
        match &*self.snapshot.read().await {
            Snapshot::Ready(records) => records.len(),
            Snapshot::Unavailable(_) => 0,
        }
    }

    async fn current(&self) -> Result<Arc<Vec<CanonicalRecord>>, StoreError> {
        match &*self.snapshot.read().await {
            Snapshot::Ready(records) => Ok(Arc::clone(records)),
            Snapshot::Unavailable(reason) => Err(StoreError::Unavailable {
                reason: reason.clone(),
            }),
        }
    }

    /// Insert records with new ids and overwrite those already on file.
    ///
    /// The container is rewritten before the in-memory snapshot changes, so
    /// a failed write leaves both the file and the snapshot as they were.
    pub async fn merge(&self, records: &[CanonicalRecord]) -> Result<MergeOutcome, StoreError> {
        let _guard = self.writer.lock().await;
        let current = self.current().await?;

        if records.is_empty() {
            return Ok(MergeOutcome::default());
        }

        let mut merged: Vec<CanonicalRecord> = current.as_ref().clone();
        let mut positions: HashMap<String, usize> = merged
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id.clone(), i))
            .collect();

        let mut outcome = MergeOutcome::default();
        for incoming in records {
            match positions.get(&incoming.id) {
                Some(&i) => {
                    merged[i].merge_from(incoming.clone());
                    outcome.updated += 1;
                }
                None => {
                    positions.insert(incoming.id.clone(), merged.len());
                    merged.push(incoming.clone());
                    outcome.inserted += 1;
                }
            }
        }

        write_container(&self.path, &merged).await?;

        let total = merged.len();
        *self.snapshot.write().await = Snapshot::Ready(Arc::new(merged));

        info!(
            inserted = outcome.inserted,
            updated = outcome.updated,
            total,
            "merged records into unified store"
        );
        Ok(outcome)
    }

    /// Records matching every condition of `query`; an empty query returns all.
    ///
    /// `propertyType` compares case-insensitively, `ownerName` and `address`
    /// are case-insensitive substrings, every other key must equal the field
    /// of that name exactly. Keys naming no field match nothing.
    pub async fn query(&self, query: &RecordQuery) -> Result<Vec<CanonicalRecord>, StoreError> {
        let records = self.current().await?;
        Ok(records
            .iter()
            .filter(|record| matches_query(record, query))
            .cloned()
            .collect())
    }
}

fn matches_query(record: &CanonicalRecord, query: &RecordQuery) -> bool {
    query.conditions().all(|(key, expected)| match key {
        "propertyType" => record.property_type.as_str().eq_ignore_ascii_case(expected),
        "ownerName" => contains_ci(Some(&record.owner_name), expected),
        "address" => contains_ci(Some(&record.address), expected),
        _ => record.field_value(key).as_deref() == Some(expected),
    })
}

/// Replace the container at `path` via a sibling temp file and rename
async fn write_container(path: &Path, records: &[CanonicalRecord]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(&ContainerRef { properties: records })?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    if let Err(source) = tokio::fs::write(&tmp_path, &bytes).await {
        return Err(StoreError::Io { path: tmp_path, source });
    }

    if let Err(source) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::RegistryFixtures;
    use crate::normalizer::normalize;
    use crate::raw::RawRecord;
    use crate::record::PropertyType;
    use tempfile::TempDir;

    fn sample_records() -> Vec<CanonicalRecord> {
        let fixtures = RegistryFixtures::builtin();
        vec![
            normalize(&RawRecord::Doris(fixtures.doris[4].clone())),
            normalize(&RawRecord::Dlr(fixtures.dlr[0].clone())),
            normalize(&RawRecord::Cersai(fixtures.cersai[3].clone())),
        ]
    }

    #[tokio::test]
    async fn test_open_creates_empty_container() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = UnifiedStore::open(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(store.len().await, 0);

        let on_disk: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, serde_json::json!({ "properties": [] }));
    }

    #[tokio::test]
    async fn test_query_on_empty_store_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = UnifiedStore::open(dir.path().join("store.json")).await.unwrap();
        assert!(store.query(&RecordQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_merge_same_record_twice_keeps_latest() {
        let dir = TempDir::new().unwrap();
        let store = UnifiedStore::open(dir.path().join("store.json")).await.unwrap();

        let first = sample_records().remove(0);
        let mut second = first.clone();
        second.market_value = "₹ 1,40,00,000".to_string();

        let outcome = store.merge(&[first.clone()]).await.unwrap();
        assert_eq!(outcome, MergeOutcome { inserted: 1, updated: 0 });

        let outcome = store.merge(&[second.clone()]).await.unwrap();
        assert_eq!(outcome, MergeOutcome { inserted: 0, updated: 1 });

        let all = store.query(&RecordQuery::new()).await.unwrap();
        assert_eq!(all, vec![second]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_within_one_batch() {
        let dir = TempDir::new().unwrap();
        let store = UnifiedStore::open(dir.path().join("store.json")).await.unwrap();

        let record = sample_records().remove(0);
        let outcome = store.merge(&[record.clone(), record]).await.unwrap();
        assert_eq!(outcome, MergeOutcome { inserted: 1, updated: 1 });
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_merges_keep_every_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(UnifiedStore::open(&path).await.unwrap());

        let template = sample_records().remove(0);
        let batch = |start: usize| -> Vec<CanonicalRecord> {
            (start..start + 5)
                .map(|n| {
                    let mut record = template.clone();
                    record.id = format!("DORIS-{:03}", n);
                    record
                })
                .collect()
        };

        let (a, b, c) = tokio::join!(
            tokio::spawn({
                let store = Arc::clone(&store);
                let records = batch(100);
                async move { store.merge(&records).await }
            }),
            tokio::spawn({
                let store = Arc::clone(&store);
                let records = batch(200);
                async move { store.merge(&records).await }
            }),
            tokio::spawn({
                let store = Arc::clone(&store);
                let records = batch(300);
                async move { store.merge(&records).await }
            }),
        );
        for outcome in [a, b, c] {
            assert_eq!(outcome.unwrap().unwrap(), MergeOutcome { inserted: 5, updated: 0 });
        }

        let mut expected: Vec<String> = [100, 200, 300].into_iter().flat_map(batch).map(|r| r.id).collect();
        expected.sort();

        let mut in_memory: Vec<String> = store.query(&RecordQuery::new()).await.unwrap().into_iter().map(|r| r.id).collect();
        in_memory.sort();
        assert_eq!(in_memory, expected);

        let reopened = UnifiedStore::open(&path).await.unwrap();
        let mut on_disk: Vec<String> = reopened.query(&RecordQuery::new()).await.unwrap().into_iter().map(|r| r.id).collect();
        on_disk.sort();
        assert_eq!(on_disk, expected);
    }

    #[tokio::test]
    async fn test_merge_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let records = sample_records();

        {
            let store = UnifiedStore::open(&path).await.unwrap();
            store.merge(&records).await.unwrap();
        }

        let reopened = UnifiedStore::open(&path).await.unwrap();
        assert_eq!(reopened.query(&RecordQuery::new()).await.unwrap(), records);
        assert!(!dir.path().join("store.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_query_rules() {
        let dir = TempDir::new().unwrap();
        let store = UnifiedStore::open(dir.path().join("store.json")).await.unwrap();
        store.merge(&sample_records()).await.unwrap();

        let urban = store.query(&RecordQuery::new().with("propertyType", "URBAN")).await.unwrap();
        assert_eq!(urban.len(), 2);
        assert!(urban.iter().all(|r| r.property_type == PropertyType::Urban));

        let owner = store.query(&RecordQuery::new().with("ownerName", "suresh")).await.unwrap();
        assert_eq!(owner.len(), 2);

        let address = store.query(&RecordQuery::new().with("address", "hoskote")).await.unwrap();
        assert_eq!(address.len(), 1);
        assert_eq!(address[0].id, "DLR-001");

        let exact = store
            .query(&RecordQuery::new().with("registrationNumber", "REG345678"))
            .await
            .unwrap();
        assert_eq!(exact.len(), 1);

        let partial = store.query(&RecordQuery::new().with("registrationNumber", "REG345")).await.unwrap();
        assert!(partial.is_empty());

        let unknown = store.query(&RecordQuery::new().with("colour", "blue")).await.unwrap();
        assert!(unknown.is_empty());

        let combined = store
            .query(&RecordQuery::new().with("ownerName", "Suresh Patel").with("source", "CERSAI"))
            .await
            .unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id, "CERSAI-24680");
    }

    #[tokio::test]
    async fn test_corrupt_container_degrades_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(UnifiedStore::open(&path).await, Err(StoreError::Corrupt { .. })));

        let store = UnifiedStore::open_or_degraded(&path).await;
        assert!(!store.is_available().await);
        assert!(matches!(
            store.query(&RecordQuery::new()).await,
            Err(StoreError::Unavailable { .. })
        ));
        assert!(matches!(
            store.merge(&sample_records()).await,
            Err(StoreError::Unavailable { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        let store = UnifiedStore::open(sub.join("store.json")).await.unwrap();
        let records = sample_records();
        store.merge(&records[..1]).await.unwrap();

        std::fs::remove_dir_all(&sub).unwrap();

        let result = store.merge(&records[1..]).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(store.query(&RecordQuery::new()).await.unwrap(), records[..1].to_vec());
    }
}
