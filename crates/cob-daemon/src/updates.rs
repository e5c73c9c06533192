//! teloxide wiring: handler tree and dispatcher.
//!
//! The dispatcher routes updates of one chat to one worker, so messages of a
//! conversation are processed one at a time and in arrival order while other
//! chats proceed in parallel. On shutdown it stops taking updates and lets
//! the workers finish what they already hold.

use std::sync::Arc;

use teloxide::dispatching::{DefaultKey, UpdateHandler};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::debug;

use crate::dispatch::handle_message;
use crate::state::AppState;

pub type HandlerError = anyhow::Error;

/// Only plain messages reach the conversation; edits, callbacks and member
/// updates fall through to the default handler.
pub fn schema() -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(on_message)
}

async fn on_message(msg: Message, me: Me, st: Arc<AppState>) -> Result<(), HandlerError> {
    handle_message(&st, &msg, me.username()).await;
    Ok(())
}

pub fn build_dispatcher(bot: Bot, st: Arc<AppState>) -> Dispatcher<Bot, HandlerError, DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![st])
        .default_handler(|upd| async move {
            debug!(update_id = ?upd.id, "update not handled");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "update handler failed",
        ))
        .build()
}
