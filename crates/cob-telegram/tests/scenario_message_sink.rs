//! Scenario: `teloxide::Bot` as a `MessageSink` against a local mock of the
//! Bot API.
//!
//! The bot is pointed at an `httpmock::MockServer` via `set_api_url`; no
//! request leaves the machine. Method names are matched case-insensitively.

use cob_schemas::{ChatId, Markup, OutboundMessage};
use cob_telegram::MessageSink;
use httpmock::prelude::*;
use regex::Regex;
use serde_json::json;
use teloxide::{Bot, RequestError};

const TOKEN: &str = "4242:SENTINEL-TOKEN";

fn bot(server: &MockServer) -> Bot {
    Bot::new(TOKEN).set_api_url(server.base_url().parse().unwrap())
}

fn send_message_path() -> Regex {
    Regex::new(r"(?i)^/bot4242:SENTINEL-TOKEN/sendmessage$").unwrap()
}

fn sent_ok(chat_id: i64) -> serde_json::Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 99,
            "date": 1_700_000_000,
            "chat": { "id": chat_id, "type": "private", "first_name": "Ann" },
            "text": "ok"
        }
    })
}

#[tokio::test]
async fn notification_is_posted_with_html_parse_mode() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path_matches(send_message_path()).json_body_partial(
                json!({
                    "chat_id": -100123,
                    "text": "<b>Имя:</b> Ann",
                    "parse_mode": "HTML"
                })
                .to_string(),
            );
            then.status(200).json_body(sent_ok(-100123));
        })
        .await;

    let msg = OutboundMessage::plain(ChatId(-100123), "<b>Имя:</b> Ann").with_markup(Markup::Html);
    bot(&server).send(&msg).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn welcome_removes_the_keyboard() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path_matches(send_message_path()).json_body_partial(
                json!({
                    "chat_id": 7,
                    "text": "welcome",
                    "reply_markup": { "remove_keyboard": true }
                })
                .to_string(),
            );
            then.status(200).json_body(sent_ok(7));
        })
        .await;

    let msg = OutboundMessage::plain(ChatId(7), "welcome").removing_keyboard();
    bot(&server).send(&msg).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn api_refusal_surfaces_as_api_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path_matches(send_message_path());
            then.status(400).json_body(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            }));
        })
        .await;

    let err = bot(&server)
        .send(&OutboundMessage::plain(ChatId(-1), "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::Api(_)), "got {err:?}");
    assert!(!err.to_string().contains("SENTINEL"));
}
