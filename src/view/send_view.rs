use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, Message, ParseMode},
    utils::html,
    Bot,
};

#[async_trait]
pub trait SendView: Send + Sync {
    async fn prompt_for_recipient_address(&self) -> Result<()>;
    async fn display_invalid_address(&self) -> Result<()>;
    async fn prompt_for_amount(&self, symbol: &str) -> Result<()>;
    async fn display_invalid_amount(&self, error_message: String) -> Result<()>;
    async fn prompt_for_confirmation(&self, recipient: &str, amount: &str, symbol: &str)
        -> Result<()>;
    async fn display_processing(&self) -> Result<Option<Message>>;
    async fn display_transaction_success(
        &self,
        recipient: &str,
        amount: &str,
        symbol: &str,
        hash: &str,
        message: Option<Message>,
    ) -> Result<()>;
    async fn display_transaction_error(
        &self,
        recipient: &str,
        amount: &str,
        symbol: &str,
        error_message: String,
        message: Option<Message>,
    ) -> Result<()>;
    async fn display_transaction_cancelled(&self) -> Result<()>;
    async fn display_not_connected(&self) -> Result<()>;
}

pub struct TelegramSendView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSendView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn replace_or_send(&self, text: String, message: Option<Message>) -> Result<()> {
        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        } else {
            self.bot
                .send_message(self.chat_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl SendView for TelegramSendView {
    async fn prompt_for_recipient_address(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Enter the recipient address (0x...):")
            .await?;
        Ok(())
    }

    async fn display_invalid_address(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Invalid address. It must be 0x followed by 40 hex characters. Try again:",
            )
            .await?;
        Ok(())
    }

    async fn prompt_for_amount(&self, symbol: &str) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!("Enter the amount of {} to send (example: 0.01):", symbol),
            )
            .await?;
        Ok(())
    }

    async fn display_invalid_amount(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("{}. Enter the amount again:", error_message))
            .await?;
        Ok(())
    }

    async fn prompt_for_confirmation(
        &self,
        recipient: &str,
        amount: &str,
        symbol: &str,
    ) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                format!(
                    "⚠️ You are sending a relatively large amount: <b>{} {}</b> to <code>{}</code>.\nProceed? (yes/no)",
                    html::escape(amount),
                    html::escape(symbol),
                    html::escape(recipient)
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_processing(&self) -> Result<Option<Message>> {
        let message = self
            .bot
            .send_message(self.chat_id, "Sending transaction... Approve it in your wallet.")
            .await?;

        Ok(Some(message))
    }

    async fn display_transaction_success(
        &self,
        recipient: &str,
        amount: &str,
        symbol: &str,
        hash: &str,
        message: Option<Message>,
    ) -> Result<()> {
        let text = format!(
            "✅ Transaction sent.\nAmount: {} {}\nTo: <code>{}</code>\nHash: <code>{}</code>\nStatus: pending",
            html::escape(amount),
            html::escape(symbol),
            html::escape(recipient),
            html::escape(hash)
        );

        self.replace_or_send(text, message).await
    }

    async fn display_transaction_error(
        &self,
        recipient: &str,
        amount: &str,
        symbol: &str,
        error_message: String,
        message: Option<Message>,
    ) -> Result<()> {
        let text = format!(
            "❌ Error sending {} {} to <code>{}</code>:\n{}",
            html::escape(amount),
            html::escape(symbol),
            html::escape(recipient),
            html::escape(&error_message)
        );

        self.replace_or_send(text, message).await
    }

    async fn display_transaction_cancelled(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Transaction cancelled.")
            .await?;
        Ok(())
    }

    async fn display_not_connected(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Connect your wallet first with /connect.")
            .await?;
        Ok(())
    }
}
