use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{ChainParams, NetworkProvider};
use crate::entity::{BotError, TxReceipt};

/// Wallet error code for a chain the wallet does not know yet
const UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    block_number: Option<String>,
    status: Option<String>,
}

/// Delivers one JSON-RPC request body and returns the raw response body
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post(&self, url: &str, request: &Value) -> Result<Value, BotError>;
}

#[derive(Default)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
        }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, url: &str, request: &Value) -> Result<Value, BotError> {
        Ok(self
            .http_client
            .post(url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

/// EVM JSON-RPC provider. Reads go to the public node, wallet methods to the signer endpoint.
pub struct RpcNetworkProvider {
    transport: Arc<dyn RpcTransport>,
    rpc_url: String,
    wallet_url: String,
    next_id: AtomicU64,
}

impl RpcNetworkProvider {
    pub fn new(rpc_url: &str, wallet_url: &str) -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()), rpc_url, wallet_url)
    }

    pub fn with_transport(transport: Arc<dyn RpcTransport>, rpc_url: &str, wallet_url: &str) -> Self {
        Self {
            transport,
            rpc_url: rpc_url.to_string(),
            wallet_url: wallet_url.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call_raw(&self, url: &str, method: &str, params: Value) -> Result<Value, BotError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!("RPC request #{} {}", id, method);

        let body = self.transport.post(url, &request).await?;
        let response: RpcResponse = serde_json::from_value(body)?;

        match response.error {
            Some(RpcErrorBody { code, message }) => Err(BotError::Rpc { code, message }),
            None => Ok(response.result),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, BotError> {
        let value = self.call_raw(&self.rpc_url, method, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn call_wallet<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, BotError> {
        let value = self.call_raw(&self.wallet_url, method, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Parse a `0x`-prefixed hex quantity
pub fn parse_quantity(quantity: &str) -> Result<u128> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| anyhow!("Quantity is not hex prefixed: {}", quantity))?;

    if digits.is_empty() {
        return Ok(0);
    }

    u128::from_str_radix(digits, 16).map_err(|e| anyhow!("Invalid quantity {}: {}", quantity, e))
}

fn receipt_from_raw(raw: &RawReceipt, latest_block: u64) -> Result<TxReceipt> {
    let block_number = match raw.block_number.as_deref() {
        Some(block) => Some(parse_quantity(block)? as u64),
        None => None,
    };

    let confirmations = match block_number {
        Some(block) if block <= latest_block => latest_block - block + 1,
        _ => 0,
    };

    let failed = match raw.status.as_deref() {
        Some(status) => parse_quantity(status)? == 0,
        None => false,
    };

    Ok(TxReceipt {
        block_number,
        confirmations,
        failed,
    })
}

#[async_trait]
impl NetworkProvider for RpcNetworkProvider {
    async fn chain_id(&self) -> Result<u64> {
        let chain_id: String = self.call("eth_chainId", json!([])).await?;
        Ok(parse_quantity(&chain_id)? as u64)
    }

    async fn request_accounts(&self) -> Result<Vec<String>> {
        let accounts: Vec<String> = self.call_wallet("eth_requestAccounts", json!([])).await?;
        Ok(accounts)
    }

    async fn ensure_chain(&self, params: &ChainParams) -> Result<()> {
        let current: String = self.call_wallet("eth_chainId", json!([])).await?;
        if parse_quantity(&current)? as u64 == params.chain_id {
            return Ok(());
        }

        info!(
            "Wallet is on chain {}, switching to {} ({})",
            current,
            params.chain_name,
            params.chain_id_hex()
        );

        let switched = self
            .call_raw(
                &self.wallet_url,
                "wallet_switchEthereumChain",
                json!([{ "chainId": params.chain_id_hex() }]),
            )
            .await;

        match switched {
            Ok(_) => Ok(()),
            Err(BotError::Rpc { code, .. }) if code == UNRECOGNIZED_CHAIN => {
                info!("Chain {} unknown to wallet, adding it", params.chain_name);
                self.call_raw(
                    &self.wallet_url,
                    "wallet_addEthereumChain",
                    json!([params]),
                )
                .await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_balance(&self, address: &str) -> Result<u128> {
        let balance: String = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity(&balance)
    }

    async fn send_transfer(&self, from: &str, to: &str, value_wei: u128) -> Result<String> {
        let hash: String = self
            .call_wallet(
                "eth_sendTransaction",
                json!([{
                    "from": from,
                    "to": to,
                    "value": format!("{:#x}", value_wei),
                }]),
            )
            .await?;

        info!("Broadcast transfer of {} wei to {}: {}", value_wei, to, hash);
        Ok(hash)
    }

    async fn get_transaction_status(&self, hash: &str) -> Result<Option<TxReceipt>> {
        let raw: Option<RawReceipt> = self
            .call("eth_getTransactionReceipt", json!([hash]))
            .await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let latest: String = self.call("eth_blockNumber", json!([])).await?;
        let latest_block = parse_quantity(&latest)? as u64;

        receipt_from_raw(&raw, latest_block).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NativeCurrency;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const NODE: &str = "http://node.test";
    const WALLET: &str = "http://wallet.test";

    /// Answers by method name and records every call
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<HashMap<String, Value>>,
        calls: Mutex<Vec<(String, String, Value)>>,
    }

    impl ScriptedTransport {
        fn answer(&self, method: &str, body: Value) {
            self.responses
                .lock()
                .unwrap()
                .insert(method.to_string(), body);
        }

        fn methods(&self) -> Vec<(String, String)> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, method, _)| (url.clone(), method.clone()))
                .collect()
        }

        fn params_of(&self, method: &str) -> Option<Value> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .find(|(_, called, _)| called == method)
                .map(|(_, _, params)| params.clone())
        }
    }

    #[async_trait]
    impl RpcTransport for ScriptedTransport {
        async fn post(&self, url: &str, request: &Value) -> Result<Value, BotError> {
            let method = request["method"].as_str().unwrap_or_default().to_string();
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), method.clone(), request["params"].clone()));

            Ok(self
                .responses
                .lock()
                .unwrap()
                .get(&method)
                .cloned()
                .unwrap_or_else(|| json!({ "jsonrpc": "2.0", "id": 1, "result": null })))
        }
    }

    fn provider() -> (Arc<ScriptedTransport>, RpcNetworkProvider) {
        let transport = Arc::new(ScriptedTransport::default());
        let provider = RpcNetworkProvider::with_transport(transport.clone(), NODE, WALLET);
        (transport, provider)
    }

    fn zenchain() -> ChainParams {
        ChainParams {
            chain_id: 8408,
            chain_name: "ZenChain Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "ZenChain Test Coin".to_string(),
                symbol: "ZTC".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![NODE.to_string()],
            block_explorer_urls: vec![],
        }
    }

    fn wallet_call(method: &str) -> (String, String) {
        (WALLET.to_string(), method.to_string())
    }

    #[tokio::test]
    async fn test_ensure_chain_on_configured_chain_does_nothing() {
        let (transport, provider) = provider();
        transport.answer("eth_chainId", json!({ "result": "0x20d8" }));

        provider.ensure_chain(&zenchain()).await.unwrap();

        assert_eq!(transport.methods(), vec![wallet_call("eth_chainId")]);
    }

    #[tokio::test]
    async fn test_ensure_chain_switches_known_chain() {
        let (transport, provider) = provider();
        transport.answer("eth_chainId", json!({ "result": "0x1" }));

        provider.ensure_chain(&zenchain()).await.unwrap();

        assert_eq!(
            transport.methods(),
            vec![
                wallet_call("eth_chainId"),
                wallet_call("wallet_switchEthereumChain")
            ]
        );
        assert_eq!(
            transport.params_of("wallet_switchEthereumChain").unwrap(),
            json!([{ "chainId": "0x20d8" }])
        );
    }

    #[tokio::test]
    async fn test_ensure_chain_adds_unrecognized_chain() {
        let (transport, provider) = provider();
        transport.answer("eth_chainId", json!({ "result": "0x1" }));
        transport.answer(
            "wallet_switchEthereumChain",
            json!({ "error": { "code": 4902, "message": "Unrecognized chain ID" } }),
        );

        provider.ensure_chain(&zenchain()).await.unwrap();

        assert_eq!(
            transport.methods(),
            vec![
                wallet_call("eth_chainId"),
                wallet_call("wallet_switchEthereumChain"),
                wallet_call("wallet_addEthereumChain")
            ]
        );
        let added = transport.params_of("wallet_addEthereumChain").unwrap();
        assert_eq!(added[0]["chainId"], "0x20d8");
        assert_eq!(added[0]["chainName"], "ZenChain Testnet");
        assert_eq!(added[0]["nativeCurrency"]["symbol"], "ZTC");
    }

    #[tokio::test]
    async fn test_ensure_chain_propagates_other_wallet_errors() {
        let (transport, provider) = provider();
        transport.answer("eth_chainId", json!({ "result": "0x1" }));
        transport.answer(
            "wallet_switchEthereumChain",
            json!({ "error": { "code": 4001, "message": "User rejected the request" } }),
        );

        let err = provider.ensure_chain(&zenchain()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BotError>(),
            Some(BotError::Rpc { code: 4001, .. })
        ));
        assert!(transport.params_of("wallet_addEthereumChain").is_none());
    }

    #[tokio::test]
    async fn test_transaction_status_reads_from_node() {
        let (transport, provider) = provider();
        transport.answer(
            "eth_getTransactionReceipt",
            json!({ "result": { "blockNumber": "0x10", "status": "0x1" } }),
        );
        transport.answer("eth_blockNumber", json!({ "result": "0x11" }));

        let receipt = provider.get_transaction_status("0xabc").await.unwrap().unwrap();

        assert_eq!(receipt.confirmations, 2);
        assert!(!receipt.failed);
        assert_eq!(
            transport.methods(),
            vec![
                (NODE.to_string(), "eth_getTransactionReceipt".to_string()),
                (NODE.to_string(), "eth_blockNumber".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_transaction_has_no_status() {
        let (_transport, provider) = provider();

        assert_eq!(provider.get_transaction_status("0xabc").await.unwrap(), None);
    }

    fn raw(block_number: Option<&str>, status: Option<&str>) -> RawReceipt {
        RawReceipt {
            block_number: block_number.map(str::to_string),
            status: status.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x20d8").unwrap(), 8408);
        assert_eq!(parse_quantity("0X1A").unwrap(), 26);
        assert_eq!(parse_quantity("0x").unwrap(), 0);
        assert!(parse_quantity("1234").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_receipt_confirmations() {
        let receipt = receipt_from_raw(&raw(Some("0x10"), Some("0x1")), 0x12).unwrap();
        assert_eq!(receipt.block_number, Some(16));
        assert_eq!(receipt.confirmations, 3);
        assert!(!receipt.failed);
        assert!(receipt.is_confirmed());
    }

    #[test]
    fn test_receipt_in_latest_block_has_one_confirmation() {
        let receipt = receipt_from_raw(&raw(Some("0x10"), Some("0x1")), 0x10).unwrap();
        assert_eq!(receipt.confirmations, 1);
    }

    #[test]
    fn test_receipt_ahead_of_node_has_no_confirmations() {
        let receipt = receipt_from_raw(&raw(Some("0x10"), Some("0x1")), 0x0f).unwrap();
        assert_eq!(receipt.confirmations, 0);
    }

    #[test]
    fn test_reverted_receipt_is_failed() {
        let receipt = receipt_from_raw(&raw(Some("0x10"), Some("0x0")), 0x10).unwrap();
        assert!(receipt.failed);
        assert!(!receipt.is_confirmed());
    }

    #[test]
    fn test_unmined_receipt() {
        let receipt = receipt_from_raw(&raw(None, None), 0x10).unwrap();
        assert_eq!(receipt.block_number, None);
        assert_eq!(receipt.confirmations, 0);
        assert!(!receipt.failed);
    }

    #[test]
    fn test_rpc_response_parsing() {
        let response: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(response.error.is_none());
        let receipt: Option<RawReceipt> = serde_json::from_value(response.result).unwrap();
        assert!(receipt.is_none());

        let response: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":2,"error":{"code":4902,"message":"Unrecognized chain"}}"#,
        )
        .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, UNRECOGNIZED_CHAIN);
        assert_eq!(error.message, "Unrecognized chain");
    }
}
