//! Message decoding.

use cob_schemas::{ChatId, Command, ConversationKey, Inbound, InboundEvent, UserId};
use teloxide::types::{Message, MessageEntityKind};
use teloxide::utils::command::BotCommands;

use crate::command::BotCommand;

/// Decode a message into a conversation event.
///
/// Returns `None` for messages without a sender (anonymous channel posts).
///
/// A message counts as a command only when it opens with a `bot_command`
/// entity. Trailing arguments are ignored and the command name is matched
/// case-insensitively. A command addressed to another bot, or one this bot
/// does not know, decodes to [`Command::Other`].
pub fn to_inbound(msg: &Message, bot_username: &str) -> Option<InboundEvent> {
    let from = msg.from.as_ref()?;
    let key = ConversationKey::new(ChatId(msg.chat.id.0), UserId(from.id.0));
    Some(InboundEvent::new(key, classify(msg, bot_username)))
}

fn classify(msg: &Message, bot_username: &str) -> Inbound {
    let Some(text) = msg.text() else {
        return Inbound::NonText;
    };
    if !opens_with_command(msg) {
        return Inbound::Text(text.to_string());
    }

    let head = text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match BotCommand::parse(&head, &bot_username.to_lowercase()) {
        Ok(BotCommand::Start) => Inbound::Command(Command::Start),
        Ok(BotCommand::Cancel) => Inbound::Command(Command::Cancel),
        Err(_) => Inbound::Command(Command::Other(head.trim_start_matches('/').to_string())),
    }
}

fn opens_with_command(msg: &Message) -> bool {
    msg.entities().is_some_and(|entities| {
        entities
            .iter()
            .any(|e| e.offset == 0 && matches!(e.kind, MessageEntityKind::BotCommand))
    })
}
