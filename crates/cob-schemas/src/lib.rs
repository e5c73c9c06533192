//! cob-schemas
//!
//! Transport-neutral types shared by the conversation core, the Bot API
//! boundary and the daemon. Nothing here performs I/O.

use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// Chat identifier as issued by the messaging backend.
///
/// Group and channel ids are negative; private chats are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sender identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one conversation: a user inside a chat.
///
/// Two users writing in the same group hold independent conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationKey {
    pub chat: ChatId,
    pub user: UserId,
}

impl ConversationKey {
    pub fn new(chat: ChatId, user: UserId) -> Self {
        Self { chat, user }
    }
}

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

/// Formatting dialect of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Markup {
    Html,
    MarkdownV2,
}

impl Markup {
    /// Value of the Bot API `parse_mode` field.
    pub fn parse_mode(&self) -> &'static str {
        match self {
            Markup::Html => "HTML",
            Markup::MarkdownV2 => "MarkdownV2",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Markup::Html),
            "markdownv2" | "markdown_v2" | "markdown" => Ok(Markup::MarkdownV2),
            other => Err(anyhow!(
                "invalid markup '{}'. expected one of: html | markdownv2",
                other
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Bot commands the conversation reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`: opens (or restarts) an order conversation.
    Start,
    /// `/cancel`: aborts the current conversation.
    Cancel,
    /// Any other command, including commands addressed to a different bot.
    /// Carried so callers can log it; never acted on.
    Other(String),
}

/// What an inbound message carried, after transport decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Text(String),
    /// Stickers, photos, contacts, edits… anything that is not plain text.
    NonText,
}

/// One inbound message addressed to a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub key: ConversationKey,
    pub inbound: Inbound,
}

impl InboundEvent {
    pub fn new(key: ConversationKey, inbound: Inbound) -> Self {
        Self { key, inbound }
    }

    pub fn text(key: ConversationKey, text: impl Into<String>) -> Self {
        Self::new(key, Inbound::Text(text.into()))
    }

    pub fn command(key: ConversationKey, cmd: Command) -> Self {
        Self::new(key, Inbound::Command(cmd))
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// A text message to be delivered to a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    /// `None` sends plain text.
    pub markup: Option<Markup>,
    /// Ask the client to hide any custom reply keyboard.
    pub remove_keyboard: bool,
}

impl OutboundMessage {
    pub fn plain(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            markup: None,
            remove_keyboard: false,
        }
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = Some(markup);
        self
    }

    pub fn removing_keyboard(mut self) -> Self {
        self.remove_keyboard = true;
        self
    }
}
