//! Shared runtime state for cob-daemon.
//!
//! The health route receives `State<Arc<AppState>>` from Axum; the teloxide
//! dispatcher injects the same `Arc` into the message handler. The session
//! store is the only mutable part.

use std::sync::Arc;

use cob_conversation::{OrderConversation, SessionStore};
use cob_telegram::MessageSink;
use tokio::sync::Mutex;

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

pub struct AppState {
    /// Outbound messages.
    pub sink: Arc<dyn MessageSink>,
    /// Flow definition: destination chat and notification markup.
    pub conversation: OrderConversation,
    /// Live sessions. Locked only for the pure state transition, never
    /// across network I/O.
    pub sessions: Mutex<SessionStore>,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(sink: Arc<dyn MessageSink>, conversation: OrderConversation) -> Self {
        Self {
            sink,
            conversation,
            sessions: Mutex::new(SessionStore::new()),
            build: BuildInfo {
                service: "cob-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}
