use crate::entity::{SessionContext, TransactionRecord};
use crate::interactor::history_interactor::HistoryInteractor;
use crate::network::units;
use crate::utils;
use anyhow::Result;
use async_trait::async_trait;
use log::{error, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct TransferResult {
    pub recipient: String,
    pub amount: String,
    pub hash: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
}

#[async_trait]
pub trait SendInteractor: Send + Sync {
    async fn validate_address(&self, address: &str) -> Result<bool>;
    async fn parse_amount(&self, amount_text: &str) -> Result<Decimal>;
    /// Amounts above the configured threshold need an explicit yes
    fn needs_confirmation(&self, amount: &Decimal) -> bool;
    async fn send_payment(
        &self,
        session: &SessionContext,
        recipient: &str,
        amount: &str,
    ) -> Result<TransferResult>;
}

pub struct SendInteractorImpl {
    history: Arc<dyn HistoryInteractor>,
    large_amount_threshold: Decimal,
}

impl SendInteractorImpl {
    pub fn new(history: Arc<dyn HistoryInteractor>, large_amount_threshold: Decimal) -> Self {
        Self {
            history,
            large_amount_threshold,
        }
    }
}

#[async_trait]
impl SendInteractor for SendInteractorImpl {
    async fn validate_address(&self, address: &str) -> Result<bool> {
        Ok(utils::validate_evm_address(address))
    }

    async fn parse_amount(&self, amount_text: &str) -> Result<Decimal> {
        // Reject what cannot be sent exactly before the user is asked anything
        units::parse_ether(amount_text)?;
        Ok(units::parse_amount(amount_text)?)
    }

    fn needs_confirmation(&self, amount: &Decimal) -> bool {
        *amount > self.large_amount_threshold
    }

    async fn send_payment(
        &self,
        session: &SessionContext,
        recipient: &str,
        amount: &str,
    ) -> Result<TransferResult> {
        let recipient = recipient.trim();
        let amount = amount.trim();
        let value_wei = units::parse_ether(amount)?;

        let provider = session.provider();
        match provider
            .send_transfer(session.account(), recipient, value_wei)
            .await
        {
            Ok(hash) => {
                info!("Sent {} to {}: {}", amount, recipient, hash);

                if let Err(e) = self
                    .history
                    .append(TransactionRecord::pending(recipient, amount, &hash))
                    .await
                {
                    error!("Failed to record transaction {}: {}", hash, e);
                }

                Ok(TransferResult {
                    recipient: recipient.to_string(),
                    amount: amount.to_string(),
                    hash: Some(hash),
                    success: true,
                    error_message: None,
                })
            }
            Err(e) => {
                // Nothing reached the network, so there is nothing to track
                warn!("Transfer of {} to {} was not broadcast: {}", amount, recipient, e);

                Ok(TransferResult {
                    recipient: recipient.to_string(),
                    amount: amount.to_string(),
                    hash: None,
                    success: false,
                    error_message: Some(e.to_string()),
                })
            }
        }
    }
}
