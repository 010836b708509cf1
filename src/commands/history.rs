use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, types::ChatId, Bot};

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::interactor::history_interactor::HistoryInteractor;
use crate::presenter::history_presenter::{HistoryPresenter, HistoryPresenterImpl};
use crate::view::history_view::TelegramHistoryView;

pub fn history_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> HistoryPresenterImpl<dyn HistoryInteractor, TelegramHistoryView> {
    let chain = services.chain_params();
    let view = Arc::new(TelegramHistoryView::new(
        bot,
        chat_id,
        &chain.native_currency.symbol,
        chain.explorer_url(),
    ));

    HistoryPresenterImpl::new(services.history(), view, services.status_poller())
}

pub struct HistoryCommand;

impl CommandHandler for HistoryCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        history_presenter(bot, chat_id, &services)
            .show_history()
            .await
    }
}

pub struct RefreshCommand;

impl CommandHandler for RefreshCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        history_presenter(bot, chat_id, &services).refresh().await
    }
}

pub struct ClearCommand;

impl CommandHandler for ClearCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        history_presenter(bot, chat_id, &services)
            .request_clear()
            .await
    }
}
