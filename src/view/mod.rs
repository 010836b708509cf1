pub mod history_view;
pub mod send_view;
pub mod wallet_view;
