mod bot_error;
mod session;
mod state;
mod transaction_record;
mod tx_receipt;

pub use bot_error::BotError;
pub use session::SessionContext;
pub use state::State;
pub use transaction_record::{TransactionRecord, TxStatus};
pub use tx_receipt::TxReceipt;
