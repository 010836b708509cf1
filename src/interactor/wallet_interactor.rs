use crate::entity::{BotError, SessionContext};
use crate::network::{units, ChainParams, NetworkProvider};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

#[async_trait]
pub trait WalletInteractor: Send + Sync {
    /// Put the wallet on the configured chain and open a session for its first account
    async fn connect(&self) -> Result<SessionContext>;
    /// Native balance of the session account, formatted in whole coins
    async fn get_balance(&self, session: &SessionContext) -> Result<String>;
}

pub struct WalletInteractorImpl {
    provider: Arc<dyn NetworkProvider>,
    chain: ChainParams,
}

impl WalletInteractorImpl {
    pub fn new(provider: Arc<dyn NetworkProvider>, chain: ChainParams) -> Self {
        Self { provider, chain }
    }
}

#[async_trait]
impl WalletInteractor for WalletInteractorImpl {
    async fn connect(&self) -> Result<SessionContext> {
        self.provider.ensure_chain(&self.chain).await?;

        let accounts = self.provider.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or(BotError::NoAccounts)?;
        let chain_id = self.provider.chain_id().await?;

        info!("Wallet connected: {} on chain {}", account, chain_id);

        Ok(SessionContext::new(self.provider.clone(), account, chain_id))
    }

    async fn get_balance(&self, session: &SessionContext) -> Result<String> {
        let wei = session.provider().get_balance(session.account()).await?;
        Ok(units::format_ether(wei))
    }
}
