use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Confirmation status of a submitted transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
    #[default]
    Unknown,
}

impl TxStatus {
    /// Whether the status poller should stop revisiting a record in this status.
    /// `Failed` is only terminal when failed transfers are not retried.
    pub fn is_terminal(&self, retry_failed: bool) -> bool {
        match self {
            TxStatus::Confirmed => true,
            TxStatus::Failed => !retry_failed,
            TxStatus::Pending | TxStatus::Unknown => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Confirmed => "confirmed",
            TxStatus::Failed => "failed",
            TxStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted transfer attempt as kept in the local history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub time: DateTime<Utc>,
    pub to: String,
    /// Amount exactly as the user typed it
    pub amount: String,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub status: TxStatus,
}

impl TransactionRecord {
    /// Record for a transfer the network accepted, waiting for confirmation
    pub fn pending(to: &str, amount: &str, hash: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            time: Utc::now(),
            to: to.to_string(),
            amount: amount.to_string(),
            hash: Some(hash.to_string()),
            status: TxStatus::Pending,
        }
    }

    pub fn has_hash(&self, hash: &str) -> bool {
        self.hash.as_deref() == Some(hash)
    }
}
