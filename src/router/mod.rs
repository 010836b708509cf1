use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::InMemStorage,
    dispatching::UpdateHandler,
    prelude::*,
    types::{CallbackQuery, ChatId, Message, Update},
    Bot,
};

use crate::commands::{
    self, callback::handle_callback, history, send, wallet, Command, CommandHandler, MyDialogue,
};
use crate::di::ServiceContainer;
use crate::entity::State;

// Base router trait
#[async_trait]
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

// Command router implementation
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
    owner_chat_id: ChatId,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>, owner_chat_id: ChatId) -> Self {
        Self {
            services,
            owner_chat_id,
        }
    }
}

#[async_trait]
impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;

        let services = self.services.clone();
        let owner_chat_id = self.owner_chat_id;

        let command_handler = teloxide::filter_command::<Command, _>().endpoint(
            move |bot: Bot, msg: Message, cmd: Command, dialogue: MyDialogue| {
                let services = services.clone();
                let chat_id = msg.chat.id;
                let dialogue = Some(dialogue);
                async move {
                    match cmd {
                        Command::Start => {
                            commands::start::StartCommand::execute(bot, chat_id, dialogue, services)
                                .await
                        }
                        Command::Help => {
                            commands::help::HelpCommand::execute(bot, chat_id, dialogue, services)
                                .await
                        }
                        Command::Connect => {
                            wallet::ConnectCommand::execute(bot, chat_id, dialogue, services).await
                        }
                        Command::Disconnect => {
                            wallet::DisconnectCommand::execute(bot, chat_id, dialogue, services)
                                .await
                        }
                        Command::Balance => {
                            wallet::BalanceCommand::execute(bot, chat_id, dialogue, services).await
                        }
                        Command::Send => {
                            send::SendCommand::execute(bot, chat_id, dialogue, services).await
                        }
                        Command::History => {
                            history::HistoryCommand::execute(bot, chat_id, dialogue, services)
                                .await
                        }
                        Command::Refresh => {
                            history::RefreshCommand::execute(bot, chat_id, dialogue, services)
                                .await
                        }
                        Command::Clear => {
                            history::ClearCommand::execute(bot, chat_id, dialogue, services).await
                        }
                        Command::Cancel => {
                            send::CancelCommand::execute(bot, chat_id, dialogue, services).await
                        }
                    }
                }
            },
        );

        let services_for_dialog1 = self.services.clone();
        let services_for_dialog2 = self.services.clone();
        let services_for_dialog3 = self.services.clone();
        let services_for_callbacks = self.services.clone();

        let message_handler = Update::filter_message()
            .filter(move |msg: Message| msg.chat.id == owner_chat_id)
            .branch(command_handler)
            .branch(
                dptree::entry()
                    .branch(case![State::AwaitingRecipientAddress].endpoint(
                        move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                            let services = services_for_dialog1.clone();
                            async move {
                                send::receive_recipient_address(bot, msg, dialogue, services).await
                            }
                        },
                    ))
                    .branch(case![State::AwaitingAmount { recipient }].endpoint(
                        move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                            let services = services_for_dialog2.clone();
                            async move {
                                send::receive_amount(bot, msg, state, dialogue, services).await
                            }
                        },
                    ))
                    .branch(
                        case![State::AwaitingConfirmation { recipient, amount }].endpoint(
                            move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                                let services = services_for_dialog3.clone();
                                async move {
                                    send::receive_confirmation(bot, msg, state, dialogue, services)
                                        .await
                                }
                            },
                        ),
                    ),
            );

        // Add callback query handler for our buttons
        let callback_handler = Update::filter_callback_query()
            .filter(move |q: CallbackQuery| {
                q.message.as_ref().map(|msg| msg.chat().id) == Some(owner_chat_id)
            })
            .endpoint(move |bot: Bot, q: CallbackQuery, dialogue: MyDialogue| {
                let services = services_for_callbacks.clone();
                async move { handle_callback(bot, q, dialogue, services).await }
            });

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}
