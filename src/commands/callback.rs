use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, types::CallbackQuery, Bot};

use crate::commands::history::history_presenter;
use crate::commands::{send, wallet, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::presenter::history_presenter::HistoryPresenter;

// Main callback handler function
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(callback_data) = q.data.clone() else {
        return Ok(());
    };

    let chat_id = match q.message {
        Some(ref msg) => msg.chat().id,
        None => return Ok(()),
    };

    info!("Received callback: {} in chat {}", callback_data, chat_id);

    // Acknowledge the callback query to stop loading animation
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        info!("Failed to answer callback query: {}", err);
    }

    match callback_data.as_str() {
        "send" => {
            send::SendCommand::execute(bot, chat_id, Some(dialogue), services).await?;
        }
        "balance" => {
            wallet::BalanceCommand::execute(bot, chat_id, Some(dialogue), services).await?;
        }
        "history" => {
            history_presenter(bot, chat_id, &services)
                .show_history()
                .await?;
        }
        "refresh" => {
            history_presenter(bot, chat_id, &services).refresh().await?;
        }
        "clear" => {
            history_presenter(bot, chat_id, &services)
                .request_clear()
                .await?;
        }
        "clear_confirm" => {
            history_presenter(bot, chat_id, &services)
                .confirm_clear()
                .await?;
        }
        "clear_cancel" => {
            history_presenter(bot, chat_id, &services)
                .cancel_clear()
                .await?;
        }
        other => {
            info!("Ignoring unknown callback: {}", other);
        }
    }

    Ok(())
}
