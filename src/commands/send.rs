use anyhow::{anyhow, Result};
use log::info;
use std::sync::Arc;
use teloxide::{prelude::*, types::ChatId, Bot};

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::send_interactor::SendInteractorImpl;
use crate::presenter::send_presenter::{AmountOutcome, SendPresenter, SendPresenterImpl};
use crate::view::history_view::TelegramHistoryView;
use crate::view::send_view::TelegramSendView;

fn send_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> SendPresenterImpl<SendInteractorImpl, TelegramSendView> {
    let chain = services.chain_params();
    let symbol = chain.native_currency.symbol.clone();

    let interactor = Arc::new(SendInteractorImpl::new(
        services.history(),
        services.large_amount_threshold(),
    ));
    let view = Arc::new(TelegramSendView::new(bot.clone(), chat_id));
    let history_view = Arc::new(TelegramHistoryView::new(
        bot,
        chat_id,
        &symbol,
        chain.explorer_url(),
    ));

    SendPresenterImpl::new(
        interactor,
        view,
        services.history(),
        history_view,
        services.status_poller(),
        &symbol,
    )
}

pub struct SendCommand;

impl CommandHandler for SendCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let dialogue = dialogue.ok_or_else(|| anyhow!("Dialogue context not provided"))?;
        info!("Send command initiated in chat {}", chat_id);

        if send_presenter(bot, chat_id, &services)
            .start_send_flow()
            .await?
        {
            dialogue.update(State::AwaitingRecipientAddress).await?;
        } else {
            dialogue.update(State::Start).await?;
        }

        Ok(())
    }
}

pub struct CancelCommand;

impl CommandHandler for CancelCommand {
    async fn execute(
        bot: Bot,
        chat_id: ChatId,
        dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        bot.send_message(chat_id, "Cancelled.").await?;
        Ok(())
    }
}

pub async fn receive_recipient_address(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(address_text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please enter the recipient's address as text:")
            .await?;
        return Ok(());
    };

    let presenter = send_presenter(bot, msg.chat.id, &services);
    if presenter.handle_recipient_address(address_text).await? {
        dialogue
            .update(State::AwaitingAmount {
                recipient: address_text.trim().to_string(),
            })
            .await?;
    }

    Ok(())
}

pub async fn receive_amount(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingAmount { recipient } = state else {
        return Ok(());
    };

    let Some(amount_text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please enter the amount to send:")
            .await?;
        return Ok(());
    };

    let presenter = send_presenter(bot, msg.chat.id, &services);
    match presenter.handle_amount(amount_text, &recipient).await? {
        AmountOutcome::Invalid => {}
        AmountOutcome::NeedsConfirmation => {
            dialogue
                .update(State::AwaitingConfirmation {
                    recipient,
                    amount: amount_text.trim().to_string(),
                })
                .await?;
        }
        AmountOutcome::Sent => {
            dialogue.update(State::Start).await?;
        }
    }

    Ok(())
}

pub async fn receive_confirmation(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingConfirmation { recipient, amount } = state else {
        return Ok(());
    };

    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please answer yes or no:")
            .await?;
        return Ok(());
    };

    // Reset dialogue state before sending
    dialogue.update(State::Start).await?;

    send_presenter(bot, msg.chat.id, &services)
        .handle_confirmation(text, &recipient, &amount)
        .await
}
