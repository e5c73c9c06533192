//! cob-daemon entry point.
//!
//! Loads configuration, sets up tracing and starts the configured transport.
//! Message handling lives in `dispatch.rs`; transports in `transport.rs`.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use cob_config::{BotConfig, Transport};
use cob_conversation::OrderConversation;
use cob_daemon::{state::AppState, transport};
use teloxide::requests::Requester;
use teloxide::Bot;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cob-daemon")]
#[command(about = "Cake order intake bot", long_about = None)]
struct Cli {
    /// Override BOT_TRANSPORT (webhook | polling)
    #[arg(long, value_parser = parse_transport)]
    transport: Option<Transport>,

    /// Load environment from this file instead of .env.local
    #[arg(long)]
    env_file: Option<PathBuf>,
}

fn parse_transport(s: &str) -> Result<Transport, String> {
    Transport::parse(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("load env file {}", path.display()))?;
        }
        // Silent if the file does not exist; production injects env vars directly.
        None => {
            let _ = dotenvy::from_filename(".env.local");
        }
    }

    init_tracing();

    let mut cfg = BotConfig::from_env().context("resolve configuration")?;
    if let Some(transport) = cli.transport {
        cfg = cfg.with_transport(transport)?;
    }
    info!(
        transport = cfg.transport.as_str(),
        group_chat_id = cfg.group_chat_id.0,
        markup = cfg.markup.parse_mode(),
        port = cfg.port,
        "configuration loaded"
    );

    let bot = Bot::new(cfg.bot_token.clone());
    let me = bot
        .get_me()
        .await
        .context("getMe failed; check BOT_TOKEN")?;
    info!(username = me.username(), "authorized");

    let conversation = OrderConversation::new(cfg.group_chat_id, cfg.markup);
    let state = Arc::new(AppState::new(Arc::new(bot.clone()), conversation));

    match cfg.transport {
        Transport::Webhook => transport::run_webhook(bot, state, &cfg, shutdown_signal()).await,
        Transport::Polling => transport::run_polling(bot, state, &cfg, shutdown_signal()).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Resolves on Ctrl-C, or SIGTERM on Unix (what hosting platforms send).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
