use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::entity::{TransactionRecord, TxStatus};
use crate::storage::KeyValueStore;

/// Ordered history of submitted transfers, newest first, kept in one storage slot.
///
/// Every mutation rewrites the whole list. Read-modify-write cycles are
/// serialized so concurrent writers within the process never drop each
/// other's records.
#[async_trait]
pub trait HistoryInteractor: Send + Sync {
    /// Insert at the head of the list and persist
    async fn append(&self, record: TransactionRecord) -> Result<()>;

    /// All records, newest first. Missing or unreadable data yields an empty list.
    async fn list(&self) -> Vec<TransactionRecord>;

    /// Set the status of the first (newest) record carrying `hash`.
    /// Returns whether a record matched.
    async fn update_status(&self, hash: &str, status: TxStatus) -> Result<bool>;

    /// Set statuses of records by id in one write. Returns how many records
    /// actually changed along with the resulting list. Ids no longer present
    /// are skipped.
    async fn apply_statuses(
        &self,
        updates: &[(Uuid, TxStatus)],
    ) -> Result<(usize, Vec<TransactionRecord>)>;

    /// Drop every record
    async fn clear(&self) -> Result<()>;
}

#[derive(Default)]
struct Loaded {
    records: Vec<TransactionRecord>,
    /// Some records were stored without an id and got a fresh one on this read
    missing_ids: bool,
}

pub struct HistoryInteractorImpl {
    store: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl HistoryInteractorImpl {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Loaded {
        let raw = match self.store.read(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::default(),
            Err(e) => {
                error!("Failed to read history slot {}: {}", self.key, e);
                return Loaded::default();
            }
        };

        let parsed = serde_json::from_slice::<Vec<Value>>(&raw).and_then(|values| {
            let missing_ids = values.iter().any(|value| value.get("id").is_none());
            let records = values
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<TransactionRecord>, _>>()?;
            Ok(Loaded {
                records,
                missing_ids,
            })
        });

        match parsed {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("History slot {} is unreadable, treating as empty: {}", self.key, e);
                Loaded::default()
            }
        }
    }

    /// Load while holding the write lock. Ids assigned to records stored
    /// without one are written back so they stay stable across reads.
    async fn load_locked(&self) -> Vec<TransactionRecord> {
        let loaded = self.load().await;

        if loaded.missing_ids {
            info!("Persisting ids for history records stored without one");
            if let Err(e) = self.save(&loaded.records).await {
                error!("Failed to persist history record ids: {}", e);
            }
        }

        loaded.records
    }

    async fn save(&self, records: &[TransactionRecord]) -> Result<()> {
        let raw = serde_json::to_vec(records)?;
        self.store.write(&self.key, &raw).await?;
        debug!("Saved {} history records", records.len());
        Ok(())
    }
}

#[async_trait]
impl HistoryInteractor for HistoryInteractorImpl {
    async fn append(&self, record: TransactionRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_locked().await;
        records.insert(0, record);
        self.save(&records).await
    }

    async fn list(&self) -> Vec<TransactionRecord> {
        let loaded = self.load().await;
        if !loaded.missing_ids {
            return loaded.records;
        }

        let _guard = self.write_lock.lock().await;
        self.load_locked().await
    }

    async fn update_status(&self, hash: &str, status: TxStatus) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_locked().await;
        match records.iter_mut().find(|record| record.has_hash(hash)) {
            Some(record) => {
                record.status = status;
                self.save(&records).await?;
                Ok(true)
            }
            None => {
                debug!("No history record for {}", hash);
                Ok(false)
            }
        }
    }

    async fn apply_statuses(
        &self,
        updates: &[(Uuid, TxStatus)],
    ) -> Result<(usize, Vec<TransactionRecord>)> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_locked().await;
        let mut changed = 0;

        for (id, status) in updates {
            if let Some(record) = records.iter_mut().find(|record| record.id == *id) {
                if record.status != *status {
                    record.status = *status;
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            self.save(&records).await?;
        }

        Ok((changed, records))
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.store.delete(&self.key).await?;
        Ok(())
    }
}
