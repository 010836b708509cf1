use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, types::ChatId, utils::command::BotCommands, Bot};

use super::{Command, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;

pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        _dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        bot.send_message(chat_id, Command::descriptions().to_string())
            .await?;

        Ok(())
    }
}
