use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use teloxide::{types::ChatId, Bot};

use crate::config::AppConfig;
use crate::interactor::history_interactor::{HistoryInteractor, HistoryInteractorImpl};
use crate::network::{ChainParams, NetworkProvider, RpcNetworkProvider};
use crate::services::{PollPolicy, StatusPoller};
use crate::storage::KeyValueStore;
use crate::view::history_view::{HistoryView, TelegramHistoryView};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    chain: ChainParams,
    large_amount_threshold: Decimal,

    network_provider: Arc<dyn NetworkProvider>,
    history: Arc<dyn HistoryInteractor>,
    status_poller: Arc<StatusPoller>,
}

impl ServiceContainer {
    /// Wire the core services. The poller starts without a wallet session.
    pub fn new(config: &AppConfig, store: Arc<dyn KeyValueStore>, bot: Bot) -> Self {
        let chain = config.chain_params();

        let network_provider = Arc::new(RpcNetworkProvider::new(
            &config.rpc_url,
            config.wallet_url(),
        )) as Arc<dyn NetworkProvider>;

        let history = Arc::new(HistoryInteractorImpl::new(store, &config.history_key))
            as Arc<dyn HistoryInteractor>;

        // Background re-renders go to the owner chat
        let owner_view = Arc::new(TelegramHistoryView::new(
            bot,
            ChatId(config.owner_chat_id),
            &chain.native_currency.symbol,
            chain.explorer_url(),
        )) as Arc<dyn HistoryView>;

        let status_poller = Arc::new(StatusPoller::new(
            history.clone(),
            owner_view,
            None,
            PollPolicy {
                retry_failed: config.retry_failed,
            },
            Duration::from_secs(config.poll_interval_secs),
            Duration::from_secs(config.confirmation_timeout_secs),
        ));

        Self {
            chain,
            large_amount_threshold: config.large_amount_threshold,
            network_provider,
            history,
            status_poller,
        }
    }

    // Accessor methods

    pub fn chain_params(&self) -> ChainParams {
        self.chain.clone()
    }

    pub fn large_amount_threshold(&self) -> Decimal {
        self.large_amount_threshold
    }

    pub fn network_provider(&self) -> Arc<dyn NetworkProvider> {
        self.network_provider.clone()
    }

    pub fn history(&self) -> Arc<dyn HistoryInteractor> {
        self.history.clone()
    }

    pub fn status_poller(&self) -> Arc<StatusPoller> {
        self.status_poller.clone()
    }
}
