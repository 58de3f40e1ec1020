//! Telegram update handlers.
//!
//! Every text message goes through the core command router; the reply is
//! delivered through the MessagingPort so chunking and caption limits apply.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use teloxide::{prelude::*, types::Message};

use neobot_core::{
    commands::{Command, CommandRouter},
    domain::{ChatId, MessageRef},
    messaging::{delivery::deliver, port::MessagingPort, types::Reply},
    Result,
};

use crate::router::AppState;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);
    let user_id = msg.from().map(|u| u.id.0);
    let today = Local::now().date_naive();

    let result = match msg.text() {
        Some(text) => {
            tracing::debug!(chat_id = chat_id.0, ?user_id, text, "incoming text");
            serve_text(&state.router, state.messenger.as_ref(), chat_id, text, today).await
        }
        None => {
            // Stickers, photos, voice notes: nothing to route.
            let fallback = state.router.locale().strings().fallback;
            deliver(state.messenger.as_ref(), chat_id, Reply::text(fallback)).await
        }
    };

    if let Err(e) = result {
        tracing::warn!(chat_id = chat_id.0, error = %e, "failed to deliver reply");
    }
    Ok(())
}

/// Route one text message and deliver the reply to `chat_id`.
pub async fn serve_text(
    router: &CommandRouter,
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    text: &str,
    today: NaiveDate,
) -> Result<Vec<MessageRef>> {
    if let Some(command) = Command::route(text, router.locale()) {
        if let Err(e) = messenger
            .send_chat_action(chat_id, command.chat_action())
            .await
        {
            tracing::debug!(error = %e, "chat action failed");
        }
    }

    let reply = router.respond(text, today).await;
    match deliver(messenger, chat_id, reply).await {
        Ok(sent) => Ok(sent),
        Err(e) => {
            // Last resort: one plain message so the user is not left waiting.
            tracing::warn!(chat_id = chat_id.0, error = %e, "reply not delivered, sending notice");
            let notice = router.locale().strings().fetch_failed;
            Ok(vec![messenger.send_text(chat_id, notice).await?])
        }
    }
}
