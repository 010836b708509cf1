use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::entity::TxReceipt;

pub mod rpc_client;
pub mod units;

pub use rpc_client::RpcNetworkProvider;

/// Parameters a wallet needs to add a custom network
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParams {
    #[serde(serialize_with = "serialize_chain_id")]
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl ChainParams {
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    pub fn explorer_url(&self) -> Option<&str> {
        self.block_explorer_urls.first().map(|url| url.trim_end_matches('/'))
    }
}

fn serialize_chain_id<S: serde::Serializer>(chain_id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:#x}", chain_id))
}

/// Wallet and chain access used by the bot. Signing happens on the wallet side.
#[async_trait]
pub trait NetworkProvider: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;

    /// Ask the wallet for its accounts, first one is the active account
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Make the wallet use the given chain, adding it when unknown
    async fn ensure_chain(&self, params: &ChainParams) -> Result<()>;

    /// Native balance in wei
    async fn get_balance(&self, address: &str) -> Result<u128>;

    /// Broadcast a native transfer and return its hash
    async fn send_transfer(&self, from: &str, to: &str, value_wei: u128) -> Result<String>;

    /// `None` while the network has no receipt for the hash
    async fn get_transaction_status(&self, hash: &str) -> Result<Option<TxReceipt>>;

    /// Poll until the transaction has `confirmations` confirmations or has failed.
    /// Callers bound the wait with a timeout.
    async fn wait_for_transaction(
        &self,
        hash: &str,
        confirmations: u64,
        poll_every: Duration,
    ) -> Result<TxReceipt> {
        loop {
            if let Some(receipt) = self.get_transaction_status(hash).await? {
                if receipt.failed || receipt.confirmations >= confirmations {
                    return Ok(receipt);
                }
            }
            sleep(poll_every).await;
        }
    }
}
