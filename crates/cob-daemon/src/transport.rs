//! Update transports: webhook and long polling.
//!
//! Both feed the same dispatcher. The health route is served in either mode.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cob_config::BotConfig;
use teloxide::dispatching::{DefaultKey, Dispatcher};
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::payloads::SetWebhookSetters;
use teloxide::requests::Requester;
use teloxide::update_listeners::{webhooks, Polling};
use teloxide::Bot;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};
use url::Url;

use crate::routes;
use crate::state::AppState;
use crate::updates::{build_dispatcher, HandlerError};

/// Server-side long-poll timeout for `getUpdates`.
pub const LONG_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Register the webhook, serve it, and dispatch until `shutdown` resolves.
pub async fn run_webhook<S>(bot: Bot, state: Arc<AppState>, cfg: &BotConfig, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let url: Url = cfg
        .webhook_url()
        .context("webhook transport requires an external URL")?
        .parse()
        .context("CONFIG_INVALID: external URL does not form a valid webhook URL")?;
    let secret = cfg.webhook_secret();

    info!(
        url = %cfg.redacted_webhook_url().unwrap_or_default(),
        "registering webhook"
    );
    bot.set_webhook(url.clone())
        .secret_token(secret.clone())
        .await
        .context("setWebhook failed")?;

    let addr = cfg.listen_addr();
    let options = webhooks::Options::new(addr, url).secret_token(secret);
    let (listener, stopped, app) = routes::webhook_app(Arc::clone(&state), options);

    let tcp = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("cob-daemon accepting webhook deliveries on http://{}", addr);
    let server = tokio::spawn(async move {
        axum::serve(tcp, with_tracing(app))
            .with_graceful_shutdown(stopped)
            .await
    });

    let mut dispatcher = build_dispatcher(bot, state);
    stop_on(&dispatcher, shutdown);
    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("webhook listener error"),
        )
        .await;

    server
        .await
        .context("server task panicked")?
        .context("server crashed")?;
    Ok(())
}

/// Serve health, long-poll `getUpdates`, and dispatch until `shutdown`
/// resolves. Any registered webhook is removed first.
pub async fn run_polling<S>(bot: Bot, state: Arc<AppState>, cfg: &BotConfig, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let addr = cfg.listen_addr();
    let tcp = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!("cob-daemon health endpoint on http://{}/health", addr);
    let app = with_tracing(routes::build_router(Arc::clone(&state)));
    tokio::spawn(async move {
        if let Err(err) = axum::serve(tcp, app).await {
            error!(error = %err, "health server stopped");
        }
    });

    let listener = Polling::builder(bot.clone())
        .timeout(LONG_POLL_TIMEOUT)
        .delete_webhook()
        .await
        .build();

    let mut dispatcher = build_dispatcher(bot, state);
    stop_on(&dispatcher, shutdown);
    info!("polling for updates");
    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("getUpdates failed"),
        )
        .await;
    info!("polling stopped");
    Ok(())
}

/// Graceful dispatcher shutdown once `shutdown` resolves: no new updates are
/// taken, updates already handed to workers are processed to the end.
pub fn stop_on<S>(dispatcher: &Dispatcher<Bot, HandlerError, DefaultKey>, shutdown: S)
where
    S: Future<Output = ()> + Send + 'static,
{
    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.await;
        match token.shutdown() {
            Ok(finished) => finished.await,
            Err(err) => warn!(error = ?err, "shutdown requested while dispatcher idle"),
        }
    });
}

pub fn with_tracing(router: axum::Router) -> axum::Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}
