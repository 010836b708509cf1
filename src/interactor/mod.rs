pub mod history_interactor;
pub mod send_interactor;
pub mod wallet_interactor;
