use crate::interactor::history_interactor::HistoryInteractor;
use crate::services::StatusPoller;
use crate::view::history_view::HistoryView;
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

#[async_trait]
pub trait HistoryPresenter: Send + Sync {
    async fn show_history(&self) -> Result<()>;
    async fn refresh(&self) -> Result<()>;
    async fn request_clear(&self) -> Result<()>;
    /// Only reached after the user confirmed the prompt
    async fn confirm_clear(&self) -> Result<()>;
    async fn cancel_clear(&self) -> Result<()>;
}

pub struct HistoryPresenterImpl<I: ?Sized, V: ?Sized> {
    interactor: Arc<I>,
    view: Arc<V>,
    poller: Arc<StatusPoller>,
}

impl<I, V> HistoryPresenterImpl<I, V>
where
    I: HistoryInteractor + ?Sized,
    V: HistoryView + ?Sized,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>, poller: Arc<StatusPoller>) -> Self {
        Self {
            interactor,
            view,
            poller,
        }
    }
}

#[async_trait]
impl<I, V> HistoryPresenter for HistoryPresenterImpl<I, V>
where
    I: HistoryInteractor + ?Sized,
    V: HistoryView + ?Sized,
{
    async fn show_history(&self) -> Result<()> {
        let records = self.interactor.list().await;
        self.view.render(&records).await
    }

    async fn refresh(&self) -> Result<()> {
        if self.poller.current_context().await.is_none() {
            self.view
                .show_status("Connect your wallet with /connect to refresh statuses.")
                .await?;
            return Ok(());
        }

        let changed = self.poller.refresh_now().await;
        if changed == 0 {
            // The poller only renders when something changed
            self.show_history().await?;
        }

        Ok(())
    }

    async fn request_clear(&self) -> Result<()> {
        self.view.prompt_clear_confirmation().await
    }

    async fn confirm_clear(&self) -> Result<()> {
        self.interactor.clear().await?;
        info!("Local transaction history cleared");

        self.view.show_status("Local history cleared.").await?;
        self.view.render(&[]).await
    }

    async fn cancel_clear(&self) -> Result<()> {
        self.view.show_status("History kept.").await
    }
}
