//! Axum routers for cob-daemon.
//!
//! [`build_router`] serves health only. [`webhook_app`] adds the teloxide
//! webhook route on top; `main.rs` attaches middleware layers, so tests can
//! drive the bare routers.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use teloxide::update_listeners::{webhooks, UpdateListener};

use crate::{api_types::HealthResponse, state::AppState};

// ---------------------------------------------------------------------------
// Routers
// ---------------------------------------------------------------------------

/// `GET /health`, wired to `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Webhook route plus health.
///
/// Returns the update listener to hand to the dispatcher, the future that
/// resolves once the listener is stopped (use it as the server's graceful
/// shutdown signal) and the merged router. Requests to the webhook path
/// without the configured secret token header are refused by teloxide.
/// Does not call `setWebhook`.
pub fn webhook_app(
    state: Arc<AppState>,
    options: webhooks::Options,
) -> (
    impl UpdateListener<Err = Infallible>,
    impl Future<Output = ()> + Send,
    Router,
) {
    let (listener, stopped, webhook) = webhooks::axum_no_setup(options);
    (listener, stopped, webhook.merge(build_router(state)))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.to_string(),
            version: st.build.version.to_string(),
        }),
    )
}
