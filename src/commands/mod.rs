use anyhow::Result;
use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::{Dialogue, InMemStorage},
    prelude::*,
    types::ChatId,
    utils::command::BotCommands,
    Bot,
};

use crate::di::ServiceContainer;
use crate::entity::State;

pub mod callback;
pub mod help;
pub mod history;
pub mod send;
pub mod start;
pub mod ui;
pub mod wallet;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// Execute the command
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

/// Bot Commands enum for teloxide command filter
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start the bot and show the main menu")]
    Start,
    #[command(description = "display this help message")]
    Help,
    #[command(description = "connect the wallet and switch to the test network")]
    Connect,
    #[command(description = "forget the connected wallet")]
    Disconnect,
    #[command(description = "show the wallet balance")]
    Balance,
    #[command(description = "send a micro payment")]
    Send,
    #[command(description = "show the local transaction history")]
    History,
    #[command(description = "refresh pending transaction statuses now")]
    Refresh,
    #[command(description = "clear the local transaction history")]
    Clear,
    #[command(description = "cancel the current operation")]
    Cancel,
}
