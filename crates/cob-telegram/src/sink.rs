//! Outbound messages.

use async_trait::async_trait;
use cob_schemas::{Markup, OutboundMessage};
use teloxide::payloads::SendMessageSetters;
use teloxide::requests::Requester;
use teloxide::types::{ChatId as TgChatId, KeyboardRemove, ParseMode};
use teloxide::{Bot, RequestError};

/// Sends one [`OutboundMessage`].
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// `sendMessage` with the message's markup and keyboard removal applied.
    async fn send(&self, msg: &OutboundMessage) -> Result<(), RequestError>;
}

pub fn parse_mode(markup: Markup) -> ParseMode {
    match markup {
        Markup::Html => ParseMode::Html,
        Markup::MarkdownV2 => ParseMode::MarkdownV2,
    }
}

#[async_trait]
impl MessageSink for Bot {
    async fn send(&self, msg: &OutboundMessage) -> Result<(), RequestError> {
        let mut req = self.send_message(TgChatId(msg.chat_id.0), msg.text.clone());
        if let Some(markup) = msg.markup {
            req = req.parse_mode(parse_mode(markup));
        }
        if msg.remove_keyboard {
            req = req.reply_markup(KeyboardRemove::new());
        }
        req.await?;
        Ok(())
    }
}
