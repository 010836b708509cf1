use crate::interactor::history_interactor::HistoryInteractor;
use crate::interactor::send_interactor::SendInteractor;
use crate::services::StatusPoller;
use crate::view::history_view::HistoryView;
use crate::view::send_view::SendView;
use anyhow::Result;
use async_trait::async_trait;
use log::error;
use std::sync::Arc;

/// What the send flow should do after an amount was entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountOutcome {
    Invalid,
    NeedsConfirmation,
    Sent,
}

#[async_trait]
pub trait SendPresenter: Send + Sync {
    /// Returns false when there is no wallet session to send from
    async fn start_send_flow(&self) -> Result<bool>;
    async fn handle_recipient_address(&self, address_text: &str) -> Result<bool>;
    async fn handle_amount(&self, amount_text: &str, recipient: &str) -> Result<AmountOutcome>;
    async fn handle_confirmation(
        &self,
        confirmation_text: &str,
        recipient: &str,
        amount: &str,
    ) -> Result<()>;
}

pub struct SendPresenterImpl<I: ?Sized, V: ?Sized> {
    interactor: Arc<I>,
    view: Arc<V>,
    history: Arc<dyn HistoryInteractor>,
    history_view: Arc<dyn HistoryView>,
    poller: Arc<StatusPoller>,
    symbol: String,
}

impl<I, V> SendPresenterImpl<I, V>
where
    I: SendInteractor + ?Sized,
    V: SendView + ?Sized,
{
    pub fn new(
        interactor: Arc<I>,
        view: Arc<V>,
        history: Arc<dyn HistoryInteractor>,
        history_view: Arc<dyn HistoryView>,
        poller: Arc<StatusPoller>,
        symbol: &str,
    ) -> Self {
        Self {
            interactor,
            view,
            history,
            history_view,
            poller,
            symbol: symbol.to_string(),
        }
    }

    async fn send(&self, recipient: &str, amount: &str) -> Result<()> {
        let Some(session) = self.poller.current_context().await else {
            self.view.display_not_connected().await?;
            return Ok(());
        };

        let message = self.view.display_processing().await?;

        let result = self
            .interactor
            .send_payment(&session, recipient, amount)
            .await?;

        match (result.success, result.hash) {
            (true, Some(hash)) => {
                self.view
                    .display_transaction_success(
                        &result.recipient,
                        &result.amount,
                        &self.symbol,
                        &hash,
                        message,
                    )
                    .await?;

                self.poller.watch_confirmation(session, hash);
            }
            _ => {
                self.view
                    .display_transaction_error(
                        &result.recipient,
                        &result.amount,
                        &self.symbol,
                        result
                            .error_message
                            .unwrap_or_else(|| "Unknown error".to_string()),
                        message,
                    )
                    .await?;
            }
        }

        let records = self.history.list().await;
        if let Err(e) = self.history_view.render(&records).await {
            error!("Failed to render transaction history: {}", e);
        }

        Ok(())
    }
}

#[async_trait]
impl<I, V> SendPresenter for SendPresenterImpl<I, V>
where
    I: SendInteractor + ?Sized,
    V: SendView + ?Sized,
{
    async fn start_send_flow(&self) -> Result<bool> {
        if self.poller.current_context().await.is_none() {
            self.view.display_not_connected().await?;
            return Ok(false);
        }

        self.view.prompt_for_recipient_address().await?;
        Ok(true)
    }

    async fn handle_recipient_address(&self, address_text: &str) -> Result<bool> {
        if self.interactor.validate_address(address_text).await? {
            self.view.prompt_for_amount(&self.symbol).await?;
            Ok(true)
        } else {
            self.view.display_invalid_address().await?;
            Ok(false)
        }
    }

    async fn handle_amount(&self, amount_text: &str, recipient: &str) -> Result<AmountOutcome> {
        match self.interactor.parse_amount(amount_text).await {
            Ok(amount) if self.interactor.needs_confirmation(&amount) => {
                self.view
                    .prompt_for_confirmation(recipient, amount_text.trim(), &self.symbol)
                    .await?;
                Ok(AmountOutcome::NeedsConfirmation)
            }
            Ok(_) => {
                self.send(recipient, amount_text).await?;
                Ok(AmountOutcome::Sent)
            }
            Err(e) => {
                self.view.display_invalid_amount(e.to_string()).await?;
                Ok(AmountOutcome::Invalid)
            }
        }
    }

    async fn handle_confirmation(
        &self,
        confirmation_text: &str,
        recipient: &str,
        amount: &str,
    ) -> Result<()> {
        let confirmation = confirmation_text.trim().to_lowercase();

        if confirmation == "yes" || confirmation == "y" {
            self.send(recipient, amount).await
        } else {
            self.view.display_transaction_cancelled().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{SessionContext, TxStatus};
    use crate::interactor::history_interactor::HistoryInteractorImpl;
    use crate::interactor::send_interactor::SendInteractorImpl;
    use crate::services::PollPolicy;
    use crate::storage::MemoryStore;
    use crate::test_support::{FakeProvider, RecordingView};
    use rust_decimal::Decimal;
    use std::sync::Mutex;
    use std::time::Duration;
    use teloxide::types::Message;

    const RECIPIENT: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[derive(Default)]
    struct RecordingSendView {
        events: Mutex<Vec<String>>,
    }

    impl RecordingSendView {
        fn push(&self, event: &str) {
            self.events.lock().unwrap().push(event.to_string());
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SendView for RecordingSendView {
        async fn prompt_for_recipient_address(&self) -> Result<()> {
            self.push("recipient?");
            Ok(())
        }

        async fn display_invalid_address(&self) -> Result<()> {
            self.push("invalid address");
            Ok(())
        }

        async fn prompt_for_amount(&self, _symbol: &str) -> Result<()> {
            self.push("amount?");
            Ok(())
        }

        async fn display_invalid_amount(&self, _error_message: String) -> Result<()> {
            self.push("invalid amount");
            Ok(())
        }

        async fn prompt_for_confirmation(
            &self,
            _recipient: &str,
            _amount: &str,
            _symbol: &str,
        ) -> Result<()> {
            self.push("confirm?");
            Ok(())
        }

        async fn display_processing(&self) -> Result<Option<Message>> {
            self.push("processing");
            Ok(None)
        }

        async fn display_transaction_success(
            &self,
            _recipient: &str,
            _amount: &str,
            _symbol: &str,
            _hash: &str,
            _message: Option<Message>,
        ) -> Result<()> {
            self.push("success");
            Ok(())
        }

        async fn display_transaction_error(
            &self,
            _recipient: &str,
            _amount: &str,
            _symbol: &str,
            _error_message: String,
            _message: Option<Message>,
        ) -> Result<()> {
            self.push("error");
            Ok(())
        }

        async fn display_transaction_cancelled(&self) -> Result<()> {
            self.push("cancelled");
            Ok(())
        }

        async fn display_not_connected(&self) -> Result<()> {
            self.push("not connected");
            Ok(())
        }
    }

    struct Harness {
        provider: Arc<FakeProvider>,
        history: Arc<HistoryInteractorImpl>,
        view: Arc<RecordingSendView>,
        history_view: Arc<RecordingView>,
        presenter: SendPresenterImpl<SendInteractorImpl, RecordingSendView>,
    }

    fn harness(connected: bool) -> Harness {
        let provider = Arc::new(FakeProvider::new());
        let history = Arc::new(HistoryInteractorImpl::new(
            Arc::new(MemoryStore::new()),
            "history",
        ));
        let view = Arc::new(RecordingSendView::default());
        let history_view = Arc::new(RecordingView::default());
        let session = connected
            .then(|| SessionContext::new(provider.clone(), "0xaa".to_string(), 8408));

        let poller = Arc::new(StatusPoller::new(
            history.clone(),
            history_view.clone(),
            session,
            PollPolicy::default(),
            Duration::from_secs(8),
            Duration::from_millis(20),
        ));

        let interactor = Arc::new(SendInteractorImpl::new(history.clone(), Decimal::from(10)));
        let presenter = SendPresenterImpl::new(
            interactor,
            view.clone(),
            history.clone(),
            history_view.clone(),
            poller,
            "ZTC",
        );

        Harness {
            provider,
            history,
            view,
            history_view,
            presenter,
        }
    }

    #[tokio::test]
    async fn test_send_flow_requires_session() {
        let h = harness(false);

        assert!(!h.presenter.start_send_flow().await.unwrap());
        assert_eq!(h.view.events(), vec!["not connected"]);
    }

    #[tokio::test]
    async fn test_small_amount_is_sent_immediately() {
        let h = harness(true);

        assert!(h.presenter.start_send_flow().await.unwrap());
        assert!(h.presenter.handle_recipient_address(RECIPIENT).await.unwrap());
        let outcome = h.presenter.handle_amount("0.5", RECIPIENT).await.unwrap();

        assert_eq!(outcome, AmountOutcome::Sent);
        assert_eq!(
            h.view.events(),
            vec!["recipient?", "amount?", "processing", "success"]
        );
        assert_eq!(h.provider.sent().len(), 1);

        let records = h.history.list().await;
        assert_eq!(records[0].status, TxStatus::Pending);
        assert_eq!(h.history_view.renders(), vec![records]);
    }

    #[tokio::test]
    async fn test_large_amount_needs_yes() {
        let h = harness(true);

        let outcome = h.presenter.handle_amount("25", RECIPIENT).await.unwrap();
        assert_eq!(outcome, AmountOutcome::NeedsConfirmation);
        assert!(h.provider.sent().is_empty());

        h.presenter
            .handle_confirmation("no", RECIPIENT, "25")
            .await
            .unwrap();
        assert!(h.provider.sent().is_empty());

        h.presenter
            .handle_confirmation("Yes", RECIPIENT, "25")
            .await
            .unwrap();
        assert_eq!(h.provider.sent().len(), 1);
        assert_eq!(
            h.view.events(),
            vec!["confirm?", "cancelled", "processing", "success"]
        );
    }

    #[tokio::test]
    async fn test_invalid_input_is_reported() {
        let h = harness(true);

        assert!(!h.presenter.handle_recipient_address("0x12").await.unwrap());
        let outcome = h.presenter.handle_amount("lots", RECIPIENT).await.unwrap();

        assert_eq!(outcome, AmountOutcome::Invalid);
        assert_eq!(h.view.events(), vec!["invalid address", "invalid amount"]);
        assert!(h.history.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_transfer_shows_error() {
        let h = harness(true);
        h.provider.fail_sends();

        h.presenter.handle_amount("1", RECIPIENT).await.unwrap();

        assert_eq!(h.view.events(), vec!["processing", "error"]);
        assert!(h.history.list().await.is_empty());
    }
}
