//! In-process scenario tests for the cob-daemon HTTP surface.
//!
//! The routers are driven via `tower::ServiceExt::oneshot`; no socket is
//! bound and nothing reaches the network.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{Request, StatusCode};
use cob_config::BotConfig;
use cob_conversation::OrderConversation;
use cob_daemon::{routes, state::AppState};
use cob_schemas::{ChatId, Markup};
use cob_testkit::RecordingSink;
use http_body_util::BodyExt;
use serde_json::json;
use teloxide::update_listeners::webhooks;
use tower::ServiceExt; // oneshot

const TOKEN: &str = "4242:SENTINEL-TOKEN";
const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config() -> BotConfig {
    BotConfig::resolve_with(|name| match name {
        "BOT_TOKEN" => Some(TOKEN.to_string()),
        "GROUP_CHAT_ID" => Some("-100500".to_string()),
        "EXTERNAL_URL" => Some("https://cakes.example.com".to_string()),
        _ => None,
    })
    .unwrap()
}

fn state() -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(RecordingSink::new()),
        OrderConversation::new(ChatId(-100500), Markup::Html),
    ))
}

fn options(cfg: &BotConfig) -> webhooks::Options {
    let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
    webhooks::Options::new(addr, cfg.webhook_url().unwrap().parse().unwrap())
        .secret_token(cfg.webhook_secret())
}

async fn call(router: axum::Router, req: Request<axum::body::Body>) -> (StatusCode, bytes::Bytes) {
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (status, body)
}

fn post(uri: &str, secret: Option<&str>) -> Request<axum::body::Body> {
    let body = json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "date": 1_700_000_000,
            "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
            "chat": { "id": 7, "type": "private", "first_name": "Ann" },
            "text": "/start",
            "entities": [{ "type": "bot_command", "offset": 0, "length": 6 }]
        }
    })
    .to_string();
    let mut req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        req = req.header(SECRET_HEADER, secret);
    }
    req.body(body.into()).unwrap()
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_service_and_version() {
    let router = routes::build_router(state());
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, body) = call(router, req).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).expect("body is not valid JSON");
    assert_eq!(json["ok"], true);
    assert_eq!(json["service"], "cob-daemon");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_is_served_next_to_the_webhook() {
    let cfg = config();
    let (_listener, _stopped, router) = routes::webhook_app(state(), options(&cfg));
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, _) = call(router, req).await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// POST /<secret>
// ---------------------------------------------------------------------------

#[tokio::test]
async fn webhook_with_secret_header_is_accepted() {
    let cfg = config();
    let (_listener, _stopped, router) = routes::webhook_app(state(), options(&cfg));

    let (status, _) = call(router, post(&cfg.webhook_path(), Some(&cfg.webhook_secret()))).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn webhook_without_matching_secret_is_unauthorized() {
    let cfg = config();
    let path = cfg.webhook_path();

    for secret in [None, Some("4242_WRONG")] {
        let (_listener, _stopped, router) = routes::webhook_app(state(), options(&cfg));
        let (status, _) = call(router, post(&path, secret)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{secret:?}");
    }
}

#[tokio::test]
async fn webhook_on_another_path_is_not_found() {
    let cfg = config();
    let (_listener, _stopped, router) = routes::webhook_app(state(), options(&cfg));

    let (status, _) = call(router, post("/4242_WRONG", Some(&cfg.webhook_secret()))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_router_serves_no_webhook() {
    let cfg = config();
    let router = routes::build_router(state());

    let (status, _) = call(router, post(&cfg.webhook_path(), Some(&cfg.webhook_secret()))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
