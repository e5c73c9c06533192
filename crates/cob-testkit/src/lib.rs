//! cob-testkit
//!
//! In-memory [`MessageSink`] double for dispatcher and webhook tests.
//! Records every send; sends to selected chats can be made to fail; an
//! optional latency makes overlapping sends observable.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cob_schemas::{ChatId, OutboundMessage};
use cob_telegram::MessageSink;
use teloxide::{ApiError, RequestError};

/// Recording sink. Never touches the network.
#[derive(Debug, Default)]
pub struct RecordingSink {
    latency: Option<Duration>,
    sent: Mutex<Vec<OutboundMessage>>,
    failing_chats: Mutex<HashSet<ChatId>>,
    attempts: Mutex<usize>,
    in_flight: Mutex<HashMap<ChatId, usize>>,
    peak_in_flight: Mutex<HashMap<ChatId, usize>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send sleeps for `latency` before it completes.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Every send to `chat` fails with `chat not found` from now on.
    pub fn fail_deliveries_to(&self, chat: ChatId) {
        lock(&self.failing_chats).insert(chat);
    }

    /// Successfully sent messages, in completion order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        lock(&self.sent).clone()
    }

    /// Successfully sent messages addressed to `chat`.
    pub fn sent_to(&self, chat: ChatId) -> Vec<OutboundMessage> {
        lock(&self.sent)
            .iter()
            .filter(|m| m.chat_id == chat)
            .cloned()
            .collect()
    }

    /// Sends started so far, failed ones included.
    pub fn attempts(&self) -> usize {
        *lock(&self.attempts)
    }

    /// Most sends to `chat` that were ever in flight at the same time.
    pub fn peak_in_flight(&self, chat: ChatId) -> usize {
        lock(&self.peak_in_flight).get(&chat).copied().unwrap_or(0)
    }

    fn enter(&self, chat: ChatId) {
        *lock(&self.attempts) += 1;
        let mut in_flight = lock(&self.in_flight);
        let now = in_flight.entry(chat).or_insert(0);
        *now += 1;
        let mut peak = lock(&self.peak_in_flight);
        let seen = peak.entry(chat).or_insert(0);
        *seen = (*seen).max(*now);
    }

    fn leave(&self, chat: ChatId) {
        if let Some(now) = lock(&self.in_flight).get_mut(&chat) {
            *now = now.saturating_sub(1);
        }
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send(&self, msg: &OutboundMessage) -> Result<(), RequestError> {
        self.enter(msg.chat_id);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.leave(msg.chat_id);

        if lock(&self.failing_chats).contains(&msg.chat_id) {
            return Err(RequestError::Api(ApiError::ChatNotFound));
        }
        lock(&self.sent).push(msg.clone());
        Ok(())
    }
}
