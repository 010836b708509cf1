pub mod history_presenter;
pub mod send_presenter;
pub mod wallet_presenter;
