//! Conversation driver: routes inbound events to per-conversation sessions
//! and decides what to say back.

use std::collections::HashMap;

use cob_schemas::{ChatId, Command, ConversationKey, Inbound, InboundEvent, Markup, OutboundMessage};

use crate::render::{render_order_notification, OrderNotification};
use crate::session::{CompletedOrder, Rejection, Session, StepOutcome};
use crate::texts;

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Live sessions keyed by conversation. Only non-terminal sessions are kept.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<ConversationKey, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ConversationKey) -> Option<&Session> {
        self.sessions.get(key)
    }

    pub fn contains(&self, key: &ConversationKey) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reaction
// ---------------------------------------------------------------------------

/// A completed order waiting to be delivered to the destination chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub key: ConversationKey,
    pub order: CompletedOrder,
    pub notification: OrderNotification,
    pub destination: ChatId,
}

impl Submission {
    /// The single message to send to the destination.
    pub fn delivery(&self) -> OutboundMessage {
        OutboundMessage::plain(self.destination, self.notification.text.clone())
            .with_markup(self.notification.markup)
    }

    /// Reply to the customer once the delivery attempt has finished.
    pub fn acknowledgement(&self, delivered: bool) -> OutboundMessage {
        let text = if delivered {
            texts::ORDER_SENT
        } else {
            texts::ORDER_FAILED
        };
        OutboundMessage::plain(self.key.chat, text)
    }
}

/// What the caller must do in response to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// The event is not consumed by this conversation.
    Ignored,
    /// Send one reply to the originating chat.
    Reply(OutboundMessage),
    /// Deliver the order, then send [`Submission::acknowledgement`].
    Submit(Submission),
}

// ---------------------------------------------------------------------------
// OrderConversation
// ---------------------------------------------------------------------------

/// The order-intake flow bound to one destination chat and markup.
#[derive(Debug, Clone)]
pub struct OrderConversation {
    destination: ChatId,
    markup: Markup,
}

impl OrderConversation {
    pub fn new(destination: ChatId, markup: Markup) -> Self {
        Self {
            destination,
            markup,
        }
    }

    pub fn destination(&self) -> ChatId {
        self.destination
    }

    pub fn markup(&self) -> Markup {
        self.markup
    }

    /// Apply one inbound event to `store` and return the reaction.
    ///
    /// Sessions that reach `Done` are removed from the store before this
    /// returns, whether by submission or cancellation.
    pub fn handle(&self, store: &mut SessionStore, event: &InboundEvent) -> Reaction {
        let key = event.key;

        match &event.inbound {
            Inbound::Command(Command::Start) => {
                // Entry resets any session already in progress.
                store.sessions.insert(key, Session::new());
                Reaction::Reply(OutboundMessage::plain(key.chat, texts::WELCOME).removing_keyboard())
            }

            Inbound::Command(Command::Cancel) => {
                let Some(session) = store.sessions.get_mut(&key) else {
                    return Reaction::Ignored;
                };
                let cancelled = session.cancel().is_ok();
                store.sessions.remove(&key);
                if cancelled {
                    Reaction::Reply(OutboundMessage::plain(key.chat, texts::CANCELLED))
                } else {
                    Reaction::Ignored
                }
            }

            Inbound::Command(Command::Other(_)) | Inbound::NonText => Reaction::Ignored,

            Inbound::Text(text) => self.handle_text(store, key, text),
        }
    }

    fn handle_text(&self, store: &mut SessionStore, key: ConversationKey, text: &str) -> Reaction {
        let Some(session) = store.sessions.get_mut(&key) else {
            return Reaction::Ignored;
        };

        let reply = |text: &str| Reaction::Reply(OutboundMessage::plain(key.chat, text));

        match session.apply_text(text) {
            Ok(StepOutcome::NameAccepted) => reply(texts::ASK_PHONE),
            Ok(StepOutcome::PhoneAccepted) => reply(texts::ASK_COMMENT),
            Ok(StepOutcome::Rejected(Rejection::EmptyName)) => reply(texts::ASK_NAME),
            Ok(StepOutcome::Rejected(Rejection::InvalidPhone)) => reply(texts::INVALID_PHONE),
            Ok(StepOutcome::Completed(order)) => {
                store.sessions.remove(&key);
                let text =
                    render_order_notification(&order.name, &order.phone, &order.comment, self.markup);
                Reaction::Submit(Submission {
                    key,
                    order,
                    notification: OrderNotification {
                        text,
                        markup: self.markup,
                    },
                    destination: self.destination,
                })
            }
            // Done sessions are never stored; drop it if one slips through.
            Err(_) => {
                store.sessions.remove(&key);
                Reaction::Ignored
            }
        }
    }
}
