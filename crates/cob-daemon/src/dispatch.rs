//! Message dispatcher: conversation reaction → outbound side effects.
//!
//! [`handle_message`] is the top-level error boundary. Anything that goes
//! wrong while processing one message is logged there and swallowed, so the
//! update dispatcher never fails because of a single conversation.

use anyhow::{Context, Result};
use cob_conversation::{Reaction, Submission};
use cob_telegram::to_inbound;
use teloxide::types::Message;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::state::AppState;

/// What processing one message amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Not addressed to a conversation, or not consumed by it.
    Ignored,
    /// One prompt / acknowledgement was sent.
    Replied,
    /// An order was completed; `delivered` is the outcome of the single
    /// send to the destination.
    Submitted { delivered: bool },
}

/// Process one message, logging instead of returning any failure.
pub async fn handle_message(st: &AppState, msg: &Message, bot_username: &str) {
    if let Err(err) = process_message(st, msg, bot_username).await {
        error!(
            chat_id = msg.chat.id.0,
            message_id = msg.id.0,
            error = ?err,
            "message processing failed"
        );
    }
}

/// Process one message.
///
/// The session store lock is held only while the conversation computes its
/// reaction; replies and delivery happen after it is released.
///
/// # Errors
/// Fails when a reply to the user cannot be sent. The conversation state
/// has already advanced at that point and is left as is.
pub async fn process_message(st: &AppState, msg: &Message, bot_username: &str) -> Result<Dispatched> {
    let Some(event) = to_inbound(msg, bot_username) else {
        debug!(chat_id = msg.chat.id.0, "message has no sender");
        return Ok(Dispatched::Ignored);
    };

    let reaction = {
        let mut store = st.sessions.lock().await;
        st.conversation.handle(&mut store, &event)
    };

    let chat_id = event.key.chat.0;
    let user_id = event.key.user.0;

    match reaction {
        Reaction::Ignored => {
            debug!(chat_id, user_id, "inbound not consumed by the conversation");
            Ok(Dispatched::Ignored)
        }
        Reaction::Reply(reply) => {
            st.sink
                .send(&reply)
                .await
                .with_context(|| format!("send reply to chat {chat_id}"))?;
            Ok(Dispatched::Replied)
        }
        Reaction::Submit(sub) => {
            let delivered = deliver_order(st, &sub).await;
            st.sink
                .send(&sub.acknowledgement(delivered))
                .await
                .with_context(|| format!("send order acknowledgement to chat {chat_id}"))?;
            Ok(Dispatched::Submitted { delivered })
        }
    }
}

/// One attempt to post the order to the destination chat. No retry.
async fn deliver_order(st: &AppState, sub: &Submission) -> bool {
    let order_id = Uuid::new_v4();
    let chat_id = sub.key.chat.0;
    let destination = sub.destination.0;

    match st.sink.send(&sub.delivery()).await {
        Ok(()) => {
            info!(%order_id, chat_id, destination, "order delivered");
            true
        }
        Err(err) => {
            error!(
                %order_id,
                chat_id,
                destination,
                error = ?err,
                "order delivery to destination failed: {err}"
            );
            false
        }
    }
}
