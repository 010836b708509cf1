use crate::commands::ui;
use crate::entity::{TransactionRecord, TxStatus};
use crate::utils;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, ParseMode},
    utils::html,
    Bot,
};

/// Most rows shown in one history message
pub const MAX_HISTORY_ROWS: usize = 20;

#[async_trait]
pub trait HistoryView: Send + Sync {
    /// Show the whole history, newest first
    async fn render(&self, records: &[TransactionRecord]) -> Result<()>;
    async fn show_status(&self, text: &str) -> Result<()>;
    async fn prompt_clear_confirmation(&self) -> Result<()>;
}

pub struct TelegramHistoryView {
    bot: Bot,
    chat_id: ChatId,
    symbol: String,
    explorer_url: Option<String>,
}

impl TelegramHistoryView {
    pub fn new(bot: Bot, chat_id: ChatId, symbol: &str, explorer_url: Option<&str>) -> Self {
        Self {
            bot,
            chat_id,
            symbol: symbol.to_string(),
            explorer_url: explorer_url.map(str::to_string),
        }
    }
}

/// `0x123456...abcdef` style hash, or `-` when there is none
pub fn short_hash(hash: Option<&str>) -> String {
    match hash {
        Some(hash) => utils::shorten(hash, 8, 6),
        None => "-".to_string(),
    }
}

fn format_hash(hash: Option<&str>, explorer_url: Option<&str>) -> String {
    match (hash, explorer_url) {
        (Some(hash), Some(explorer)) => format!(
            "<a href=\"{}/tx/{}\">{}</a>",
            explorer,
            html::escape(hash),
            html::escape(&short_hash(Some(hash)))
        ),
        (Some(hash), None) => format!("<code>{}</code>", html::escape(hash)),
        (None, _) => "-".to_string(),
    }
}

fn status_icon(record: &TransactionRecord) -> &'static str {
    match record.status {
        TxStatus::Pending => "⏳",
        TxStatus::Confirmed => "✅",
        TxStatus::Failed => "❌",
        TxStatus::Unknown => "❔",
    }
}

/// HTML body of the history message
pub fn format_history(
    records: &[TransactionRecord],
    symbol: &str,
    explorer_url: Option<&str>,
) -> String {
    if records.is_empty() {
        return "<b>Transaction History</b>\n\nNo transactions yet.".to_string();
    }

    let mut text = format!("<b>Transaction History</b> ({})\n", records.len());

    for record in records.iter().take(MAX_HISTORY_ROWS) {
        text.push_str(&format!(
            "\n{} <b>{}</b> {} → <code>{}</code>\n{} · {} · {}\n",
            status_icon(record),
            html::escape(&record.amount),
            html::escape(symbol),
            html::escape(&record.to),
            record.time.format("%Y-%m-%d %H:%M:%S UTC"),
            format_hash(record.hash.as_deref(), explorer_url),
            record.status,
        ));
    }

    if records.len() > MAX_HISTORY_ROWS {
        text.push_str(&format!(
            "\n… and {} older transactions",
            records.len() - MAX_HISTORY_ROWS
        ));
    }

    text
}

#[async_trait]
impl HistoryView for TelegramHistoryView {
    async fn render(&self, records: &[TransactionRecord]) -> Result<()> {
        let text = format_history(records, &self.symbol, self.explorer_url.as_deref());

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(ui::create_history_keyboard())
            .await?;

        Ok(())
    }

    async fn show_status(&self, text: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, text).await?;
        Ok(())
    }

    async fn prompt_clear_confirmation(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "Clear local transaction history? This cannot be undone.",
            )
            .reply_markup(ui::create_clear_confirmation_keyboard())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash() {
        assert_eq!(
            short_hash(Some(
                "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060"
            )),
            "0x5c504e...b22060"
        );
        assert_eq!(short_hash(Some("0x111")), "0x111");
        assert_eq!(short_hash(None), "-");
    }

    #[test]
    fn test_short_hash_with_multibyte_text() {
        assert_eq!(short_hash(Some("0x12345é6789abcdef")), "0x12345é...abcdef");

        let hash = format!("0xé1{}2", "é".repeat(10));
        let record = TransactionRecord::pending("0xAAA", "1", &hash);
        let text = format_history(&[record], "ZTC", Some("https://explorer.example"));
        assert!(text.contains(">0xé1éééé...ééééé2</a>"));
    }

    #[test]
    fn test_empty_history() {
        let text = format_history(&[], "ZTC", None);
        assert!(text.contains("No transactions yet."));
    }

    #[test]
    fn test_history_is_rendered_in_order() {
        let older = TransactionRecord::pending("0xAAA", "1.5", "0x111");
        let mut newer = TransactionRecord::pending("0xBBB", "0.25", "0x222");
        newer.status = TxStatus::Confirmed;

        let text = format_history(&[newer, older], "ZTC", None);

        let newer_at = text.find("0xBBB").unwrap();
        let older_at = text.find("0xAAA").unwrap();
        assert!(newer_at < older_at);
        assert!(text.contains("<b>0.25</b> ZTC"));
        assert!(text.contains("<code>0x111</code>"));
        assert!(text.contains("confirmed"));
    }

    #[test]
    fn test_hash_links_to_explorer() {
        let record = TransactionRecord::pending(
            "0xAAA",
            "1",
            "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060",
        );

        let text = format_history(&[record], "ZTC", Some("https://explorer.example"));

        assert!(text.contains(
            "<a href=\"https://explorer.example/tx/0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060\">0x5c504e...b22060</a>"
        ));
    }

    #[test]
    fn test_record_without_hash_shows_dash() {
        let mut record = TransactionRecord::pending("0xAAA", "1", "0x1");
        record.hash = None;
        let text = format_history(&[record], "ZTC", Some("https://explorer.example"));
        assert!(text.contains("· - ·"));
        assert!(text.contains("pending"));
    }

    #[test]
    fn test_long_history_is_truncated() {
        let records: Vec<TransactionRecord> = (0..25)
            .map(|i| TransactionRecord::pending("0xAAA", "1", &format!("0x{}", i)))
            .collect();

        let text = format_history(&records, "ZTC", None);

        assert!(text.contains("(25)"));
        assert!(text.contains("and 5 older transactions"));
        assert!(!text.contains("<code>0x20</code>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let record = TransactionRecord::pending("<b>", "1&2", "0x1");
        let text = format_history(&[record], "ZTC", None);
        assert!(text.contains("&lt;b&gt;"));
        assert!(text.contains("1&amp;2"));
    }
}
