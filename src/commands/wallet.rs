use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, types::ChatId, Bot};

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::wallet_interactor::WalletInteractorImpl;
use crate::presenter::wallet_presenter::{WalletPresenter, WalletPresenterImpl};
use crate::view::wallet_view::TelegramWalletView;

fn wallet_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> WalletPresenterImpl<WalletInteractorImpl, TelegramWalletView> {
    let chain = services.chain_params();
    let interactor = Arc::new(WalletInteractorImpl::new(
        services.network_provider(),
        chain.clone(),
    ));
    let view = Arc::new(TelegramWalletView::new(bot, chat_id));

    WalletPresenterImpl::new(
        interactor,
        view,
        services.status_poller(),
        &chain.chain_name,
        &chain.native_currency.symbol,
    )
}

pub struct ConnectCommand;

impl CommandHandler for ConnectCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Connect command received in chat {}", chat_id);
        wallet_presenter(bot, chat_id, &services).connect().await
    }
}

pub struct DisconnectCommand;

impl CommandHandler for DisconnectCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Disconnect command received in chat {}", chat_id);
        wallet_presenter(bot, chat_id, &services).disconnect().await
    }
}

pub struct BalanceCommand;

impl CommandHandler for BalanceCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        wallet_presenter(bot, chat_id, &services)
            .show_balance()
            .await
    }
}
