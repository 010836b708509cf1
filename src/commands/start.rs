use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{
    prelude::*,
    types::{ChatId, ParseMode},
    utils::html,
    Bot,
};

use super::{ui, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::utils;

pub struct StartCommand;

impl CommandHandler for StartCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Start command received in chat {}", chat_id);

        let chain = services.chain_params();
        let wallet_line = match services.status_poller().current_context().await {
            Some(session) => format!(
                "Wallet: <code>{}</code>",
                utils::shorten_address(session.account())
            ),
            None => "Wallet: Not connected. Use /connect.".to_string(),
        };

        bot.send_message(
            chat_id,
            format!(
                "<b>{} Micro Payments</b>\n\nSend small {} transfers and keep track of their confirmations.\n\n{}",
                html::escape(&chain.chain_name),
                html::escape(&chain.native_currency.symbol),
                wallet_line
            ),
        )
        .parse_mode(ParseMode::Html)
        .reply_markup(ui::create_main_menu_keyboard())
        .await?;

        Ok(())
    }
}
