use crate::commands::ui;
use crate::utils;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, Message, ParseMode},
    utils::html,
    Bot,
};

#[async_trait]
pub trait WalletView: Send + Sync {
    async fn display_connecting(&self, chain_name: &str) -> Result<Option<Message>>;
    async fn display_connected(
        &self,
        account: &str,
        chain_name: &str,
        balance: Option<String>,
        symbol: &str,
        message: Option<Message>,
    ) -> Result<()>;
    async fn display_connect_error(&self, error_message: String, message: Option<Message>)
        -> Result<()>;
    async fn display_disconnected(&self) -> Result<()>;
    async fn display_balance(&self, account: &str, balance: Option<String>, symbol: &str)
        -> Result<()>;
    async fn display_not_connected(&self) -> Result<()>;
}

pub struct TelegramWalletView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramWalletView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    fn format_balance(balance: Option<String>, symbol: &str) -> String {
        match balance {
            Some(balance) => format!("{} {}", balance, html::escape(symbol)),
            None => "-".to_string(),
        }
    }
}

#[async_trait]
impl WalletView for TelegramWalletView {
    async fn display_connecting(&self, chain_name: &str) -> Result<Option<Message>> {
        let message = self
            .bot
            .send_message(
                self.chat_id,
                format!("Connecting wallet to {}...", chain_name),
            )
            .await?;

        Ok(Some(message))
    }

    async fn display_connected(
        &self,
        account: &str,
        chain_name: &str,
        balance: Option<String>,
        symbol: &str,
        message: Option<Message>,
    ) -> Result<()> {
        let text = format!(
            "<b>Wallet connected</b>\n\nNetwork: {}\nWallet: <code>{}</code>\nBalance: {}",
            html::escape(chain_name),
            html::escape(account),
            Self::format_balance(balance, symbol)
        );

        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(ui::create_main_menu_keyboard())
                .await?;
        } else {
            self.bot
                .send_message(self.chat_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(ui::create_main_menu_keyboard())
                .await?;
        }

        Ok(())
    }

    async fn display_connect_error(
        &self,
        error_message: String,
        message: Option<Message>,
    ) -> Result<()> {
        let text = format!(
            "❌ Failed to connect or switch network: {}",
            error_message
        );

        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .await?;
        } else {
            self.bot.send_message(self.chat_id, text).await?;
        }

        Ok(())
    }

    async fn display_disconnected(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Wallet disconnected.")
            .await?;
        Ok(())
    }

    async fn display_balance(
        &self,
        account: &str,
        balance: Option<String>,
        symbol: &str,
    ) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "Wallet: <code>{}</code> ({})\nBalance: {}",
                    html::escape(account),
                    utils::shorten_address(account),
                    Self::format_balance(balance, symbol)
                ),
            )
            .parse_mode(ParseMode::Html)
            .reply_markup(ui::create_main_menu_keyboard())
            .await?;
        Ok(())
    }

    async fn display_not_connected(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Wallet: Not connected. Use /connect.")
            .await?;
        Ok(())
    }
}
