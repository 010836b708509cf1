use futures::future::join_all;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::{interval, timeout, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::entity::{SessionContext, TransactionRecord, TxReceipt, TxStatus};
use crate::interactor::history_interactor::HistoryInteractor;
use crate::view::history_view::HistoryView;

/// Which records a poll pass revisits
#[derive(Debug, Clone, Copy, Default)]
pub struct PollPolicy {
    /// Keep querying records already marked `failed`
    pub retry_failed: bool,
}

impl PollPolicy {
    pub fn is_candidate(&self, record: &TransactionRecord) -> bool {
        record.hash.is_some() && !record.status.is_terminal(self.retry_failed)
    }
}

/// How often the one-shot confirmation wait asks the network
const CONFIRMATION_POLL_EVERY: Duration = Duration::from_secs(2);

/// Map a receipt to the status it proves, if any. An explicit failure wins
/// over the confirmation count.
fn status_from_receipt(receipt: &TxReceipt) -> Option<TxStatus> {
    if receipt.failed {
        Some(TxStatus::Failed)
    } else if receipt.is_confirmed() {
        Some(TxStatus::Confirmed)
    } else {
        None
    }
}

/// Reconciles non-final history records with the network in the background
pub struct StatusPoller {
    history: Arc<dyn HistoryInteractor>,
    view: Arc<dyn HistoryView>,
    session: RwLock<Option<SessionContext>>,
    policy: PollPolicy,
    poll_interval: Duration,
    confirmation_timeout: Duration,
    stop_tx: Mutex<Option<mpsc::Sender<()>>>,
}

impl StatusPoller {
    pub fn new(
        history: Arc<dyn HistoryInteractor>,
        view: Arc<dyn HistoryView>,
        session: Option<SessionContext>,
        policy: PollPolicy,
        poll_interval: Duration,
        confirmation_timeout: Duration,
    ) -> Self {
        Self {
            history,
            view,
            session: RwLock::new(session),
            policy,
            poll_interval,
            confirmation_timeout,
            stop_tx: Mutex::new(None),
        }
    }

    /// Swap in the session produced by a connect or disconnect.
    /// Passes already running finish against the session they started with.
    pub async fn replace_context(&self, session: Option<SessionContext>) {
        match &session {
            Some(ctx) => info!(
                "Status poller now using account {} on chain {}",
                ctx.account(),
                ctx.chain_id()
            ),
            None => info!("Status poller session cleared"),
        }

        *self.session.write().await = session;
    }

    pub async fn current_context(&self) -> Option<SessionContext> {
        self.session.read().await.clone()
    }

    // Start the interval task that runs a poll pass on every tick
    pub async fn start(self: &Arc<Self>) {
        let mut stop_slot = self.stop_tx.lock().await;
        if stop_slot.is_some() {
            warn!("Status poller is already running");
            return;
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        *stop_slot = Some(stop_tx);

        let poller = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(poller.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_run = Instant::now();

            loop {
                select! {
                    _ = ticker.tick() => {
                        debug!("Running status poll (last run: {:.2?} ago)", last_run.elapsed());
                        poller.poll_pass().await;
                        last_run = Instant::now();
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping status poller");
                        break;
                    }
                }
            }
        });

        info!(
            "Status poller started, interval {:?}",
            self.poll_interval
        );
    }

    pub async fn stop(&self) {
        if let Some(tx) = self.stop_tx.lock().await.take() {
            let _ = tx.send(()).await;
            info!("Status poller stop signal sent");
        }
    }

    /// One reconciliation sweep. Returns how many records changed status.
    ///
    /// Lookup errors are logged and leave the record as it was; they never
    /// stop the rest of the sweep.
    pub async fn poll_pass(&self) -> usize {
        let Some(session) = self.current_context().await else {
            debug!("No wallet session, skipping status poll");
            return 0;
        };

        let records = self.history.list().await;
        let candidates: Vec<&TransactionRecord> = records
            .iter()
            .filter(|record| self.policy.is_candidate(record))
            .collect();

        if candidates.is_empty() {
            return 0;
        }

        debug!("Checking {} unsettled transactions", candidates.len());

        let provider = session.provider();
        let lookups = candidates.iter().map(|record| {
            let provider = provider.clone();
            async move {
                // Candidates always carry a hash
                let hash = record.hash.as_deref().unwrap_or_default();
                (record, provider.get_transaction_status(hash).await)
            }
        });

        let mut updates: Vec<(Uuid, TxStatus)> = Vec::new();
        for (record, lookup) in join_all(lookups).await {
            match lookup {
                Ok(Some(receipt)) => {
                    if let Some(status) = status_from_receipt(&receipt) {
                        if status != record.status {
                            updates.push((record.id, status));
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        "Status lookup failed for {}: {}",
                        record.hash.as_deref().unwrap_or("-"),
                        e
                    );
                }
            }
        }

        if updates.is_empty() {
            return 0;
        }

        match self.history.apply_statuses(&updates).await {
            Ok((0, _)) => {
                debug!("Reported statuses no longer apply to stored records");
                0
            }
            Ok((changed, records)) => {
                info!("Updated status of {} transactions", changed);
                if let Err(e) = self.view.render(&records).await {
                    error!("Failed to render transaction history: {}", e);
                }
                changed
            }
            Err(e) => {
                error!("Failed to save transaction statuses: {}", e);
                0
            }
        }
    }

    /// Run one pass right away and report progress to the view
    pub async fn refresh_now(&self) -> usize {
        if let Err(e) = self.view.show_status("Refreshing statuses...").await {
            warn!("Failed to show refresh status: {}", e);
        }

        let changed = self.poll_pass().await;

        if let Err(e) = self.view.show_status("Status refresh complete").await {
            warn!("Failed to show refresh status: {}", e);
        }

        changed
    }

    /// Wait in the background for the first confirmation of a fresh transfer.
    /// Runs alongside the interval poller; on timeout the record is left alone.
    pub fn watch_confirmation(self: &Arc<Self>, session: SessionContext, hash: String) {
        let poller = self.clone();

        tokio::spawn(async move {
            poller.await_confirmation(&session, &hash).await;
        });
    }

    async fn await_confirmation(&self, session: &SessionContext, hash: &str) {
        let provider = session.provider();
        let wait = provider.wait_for_transaction(hash, 1, CONFIRMATION_POLL_EVERY);

        let status = match timeout(self.confirmation_timeout, wait).await {
            Ok(Ok(receipt)) => status_from_receipt(&receipt).unwrap_or(TxStatus::Unknown),
            Ok(Err(e)) => {
                warn!("Waiting for {} failed: {}", hash, e);
                return;
            }
            Err(_) => {
                debug!(
                    "No confirmation for {} within {:?}, leaving it to the poller",
                    hash, self.confirmation_timeout
                );
                return;
            }
        };

        match self.history.update_status(hash, status).await {
            Ok(true) => {
                info!("Transaction {} is {}", hash, status);
                let records = self.history.list().await;
                if let Err(e) = self.view.render(&records).await {
                    error!("Failed to render transaction history: {}", e);
                }
                if status == TxStatus::Confirmed {
                    if let Err(e) = self
                        .view
                        .show_status(&format!("Transaction confirmed: {}", hash))
                        .await
                    {
                        warn!("Failed to show confirmation of {}: {}", hash, e);
                    }
                }
            }
            Ok(false) => debug!("Transaction {} is no longer in history", hash),
            Err(e) => error!("Failed to save status of {}: {}", hash, e),
        }
    }
}
