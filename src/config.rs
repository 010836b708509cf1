use config::{Config, ConfigError, Environment, Source};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::network::{ChainParams, NativeCurrency};

/// Application configuration read from the process environment
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub telegram_bot_token: String,

    /// The only chat the bot talks to; background updates are sent here
    pub owner_chat_id: i64,

    /// Postgres history storage when set, files under `history_dir` otherwise
    pub database_url: Option<String>,
    pub history_dir: String,
    pub history_key: String,

    pub poll_interval_secs: u64,
    pub confirmation_timeout_secs: u64,
    pub retry_failed: bool,
    pub large_amount_threshold: Decimal,

    pub chain_id: u64,
    pub chain_name: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub rpc_url: String,
    /// Signer endpoint, defaults to `rpc_url`
    pub wallet_rpc_url: Option<String>,
    pub explorer_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("history_dir", "./data")?
            .set_default("history_key", "micropay_history_v1")?
            .set_default("poll_interval_secs", 8)?
            .set_default("confirmation_timeout_secs", 60)?
            .set_default("retry_failed", false)?
            .set_default("large_amount_threshold", "10")?
            .set_default("chain_id", 8408)?
            .set_default("chain_name", "ZenChain Testnet")?
            .set_default("currency_name", "ZenChain Test Coin")?
            .set_default("currency_symbol", "ZTC")?
            .set_default("rpc_url", "https://zenchain-testnet.api.onfinality.io/public")?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn wallet_url(&self) -> &str {
        self.wallet_rpc_url.as_deref().unwrap_or(&self.rpc_url)
    }

    pub fn chain_params(&self) -> ChainParams {
        ChainParams {
            chain_id: self.chain_id,
            chain_name: self.chain_name.clone(),
            native_currency: NativeCurrency {
                name: self.currency_name.clone(),
                symbol: self.currency_symbol.clone(),
                decimals: 18,
            },
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: self.explorer_url.iter().cloned().collect(),
        }
    }
}
