//! In-memory fakes shared by unit tests

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::entity::{BotError, TransactionRecord, TxReceipt};
use crate::network::{ChainParams, NetworkProvider};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::view::history_view::HistoryView;

/// Scripted answer for one hash
#[derive(Clone)]
pub enum Lookup {
    Receipt(TxReceipt),
    NotFound,
    Error,
}

pub fn confirmed(confirmations: u64) -> Lookup {
    Lookup::Receipt(TxReceipt {
        block_number: Some(1),
        confirmations,
        failed: false,
    })
}

pub fn reverted() -> Lookup {
    Lookup::Receipt(TxReceipt {
        block_number: Some(1),
        confirmations: 1,
        failed: true,
    })
}

#[derive(Default)]
pub struct FakeProvider {
    lookups: Mutex<HashMap<String, Lookup>>,
    queried: Mutex<Vec<String>>,
    sent: Mutex<Vec<(String, String, u128)>>,
    fail_send: Mutex<bool>,
    accounts: Vec<String>,
    chain_id: u64,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            accounts: vec!["0x00000000000000000000000000000000000000aa".to_string()],
            chain_id: 8408,
            ..Default::default()
        }
    }

    pub fn without_accounts() -> Self {
        Self {
            chain_id: 8408,
            ..Default::default()
        }
    }

    pub fn script(&self, hash: &str, lookup: Lookup) {
        self.lookups
            .lock()
            .unwrap()
            .insert(hash.to_string(), lookup);
    }

    pub fn fail_sends(&self) {
        *self.fail_send.lock().unwrap() = true;
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(String, String, u128)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkProvider for FakeProvider {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        Ok(self.accounts.clone())
    }

    async fn ensure_chain(&self, _params: &ChainParams) -> Result<()> {
        Ok(())
    }

    async fn get_balance(&self, _address: &str) -> Result<u128> {
        Ok(2_500_000_000_000_000_000)
    }

    async fn send_transfer(&self, from: &str, to: &str, value_wei: u128) -> Result<String> {
        if *self.fail_send.lock().unwrap() {
            return Err(anyhow!("user rejected the request"));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push((from.to_string(), to.to_string(), value_wei));
        Ok(format!("0x{:064x}", sent.len()))
    }

    async fn get_transaction_status(&self, hash: &str) -> Result<Option<TxReceipt>> {
        self.queried.lock().unwrap().push(hash.to_string());

        let lookup = self
            .lookups
            .lock()
            .unwrap()
            .get(hash)
            .cloned()
            .unwrap_or(Lookup::NotFound);

        match lookup {
            Lookup::Receipt(receipt) => Ok(Some(receipt)),
            Lookup::NotFound => Ok(None),
            Lookup::Error => Err(anyhow!("connection reset while fetching {}", hash)),
        }
    }
}

/// Records every render and status line
#[derive(Default)]
pub struct RecordingView {
    renders: Mutex<Vec<Vec<TransactionRecord>>>,
    statuses: Mutex<Vec<String>>,
}

impl RecordingView {
    pub fn renders(&self) -> Vec<Vec<TransactionRecord>> {
        self.renders.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryView for RecordingView {
    async fn render(&self, records: &[TransactionRecord]) -> Result<()> {
        self.renders.lock().unwrap().push(records.to_vec());
        Ok(())
    }

    async fn show_status(&self, text: &str) -> Result<()> {
        self.statuses.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn prompt_clear_confirmation(&self) -> Result<()> {
        self.statuses
            .lock()
            .unwrap()
            .push("confirm clear?".to_string());
        Ok(())
    }
}

/// Memory store that counts writes
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, BotError> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<(), BotError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), BotError> {
        self.inner.delete(key).await
    }
}
