pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod network;
pub mod presenter;
pub mod router;
pub mod services;
pub mod storage;
pub mod utils;
pub mod view;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, types::ChatId, Bot};

// Re-export commonly used items
pub use commands::{Command, MyDialogue};
pub use config::AppConfig;
pub use di::ServiceContainer;
pub use entity::*;
pub use router::{Router, TelegramRouter};
pub use services::{PollPolicy, StatusPoller};
pub use storage::{FileStore, KeyValueStore, MemoryStore, PostgresStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire the bot: services, router, and dialogue storage
pub fn create_application(
    bot: Bot,
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
) -> (
    TelegramRouter,
    Bot,
    Arc<ServiceContainer>,
    Arc<InMemStorage<State>>,
) {
    let services = Arc::new(ServiceContainer::new(config, store, bot.clone()));
    let router = TelegramRouter::new(services.clone(), ChatId(config.owner_chat_id));
    let storage = InMemStorage::<State>::new();

    (router, bot, services, storage)
}
