use crate::interactor::wallet_interactor::WalletInteractor;
use crate::services::StatusPoller;
use crate::view::wallet_view::WalletView;
use anyhow::Result;
use async_trait::async_trait;
use log::{error, warn};
use std::sync::Arc;

#[async_trait]
pub trait WalletPresenter: Send + Sync {
    async fn connect(&self) -> Result<()>;
    async fn disconnect(&self) -> Result<()>;
    async fn show_balance(&self) -> Result<()>;
}

pub struct WalletPresenterImpl<I: ?Sized, V: ?Sized> {
    interactor: Arc<I>,
    view: Arc<V>,
    poller: Arc<StatusPoller>,
    chain_name: String,
    symbol: String,
}

impl<I, V> WalletPresenterImpl<I, V>
where
    I: WalletInteractor + ?Sized,
    V: WalletView + ?Sized,
{
    pub fn new(
        interactor: Arc<I>,
        view: Arc<V>,
        poller: Arc<StatusPoller>,
        chain_name: &str,
        symbol: &str,
    ) -> Self {
        Self {
            interactor,
            view,
            poller,
            chain_name: chain_name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

#[async_trait]
impl<I, V> WalletPresenter for WalletPresenterImpl<I, V>
where
    I: WalletInteractor + ?Sized,
    V: WalletView + ?Sized,
{
    async fn connect(&self) -> Result<()> {
        let message = self.view.display_connecting(&self.chain_name).await?;

        match self.interactor.connect().await {
            Ok(session) => {
                let balance = match self.interactor.get_balance(&session).await {
                    Ok(balance) => Some(balance),
                    Err(e) => {
                        warn!("Failed to fetch balance for {}: {}", session.account(), e);
                        None
                    }
                };

                let account = session.account().to_string();
                self.poller.replace_context(Some(session)).await;

                self.view
                    .display_connected(&account, &self.chain_name, balance, &self.symbol, message)
                    .await
            }
            Err(e) => {
                error!("Wallet connection failed: {}", e);
                self.view.display_connect_error(e.to_string(), message).await
            }
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.poller.replace_context(None).await;
        self.view.display_disconnected().await
    }

    async fn show_balance(&self) -> Result<()> {
        let Some(session) = self.poller.current_context().await else {
            return self.view.display_not_connected().await;
        };

        let balance = match self.interactor.get_balance(&session).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!("Failed to fetch balance for {}: {}", session.account(), e);
                None
            }
        };

        self.view
            .display_balance(session.account(), balance, &self.symbol)
            .await
    }
}
