//! cob-config
//!
//! Single source of truth for runtime configuration.
//!
//! # Contract
//! - Configuration comes from the process environment (optionally seeded from
//!   a dotenv file by the binary before this runs).
//! - Callers resolve a [`BotConfig`] **once** at startup and pass it into
//!   constructors; no `std::env::var` calls elsewhere.
//! - `Debug` on [`BotConfig`] redacts the bot token.
//! - Error messages name the **variable**, never its value.
//!
//! | Variable              | Required          | Default                           |
//! |-----------------------|-------------------|-----------------------------------|
//! | `BOT_TOKEN`           | yes               |                                   |
//! | `GROUP_CHAT_ID`       | yes (integer)     |                                   |
//! | `RENDER_EXTERNAL_URL` | webhook mode only | falls back to `EXTERNAL_URL`      |
//! | `PORT`                | no                | `8443`                            |
//! | `BOT_TRANSPORT`       | no                | `webhook` if a URL is set, else `polling` |
//! | `BOT_MARKUP`          | no                | `html`                            |

use std::fmt;
use std::net::SocketAddr;

use anyhow::{anyhow, bail, Context, Result};
use cob_schemas::{ChatId, Markup};

pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_GROUP_CHAT_ID: &str = "GROUP_CHAT_ID";
pub const ENV_EXTERNAL_URL: &str = "RENDER_EXTERNAL_URL";
pub const ENV_EXTERNAL_URL_FALLBACK: &str = "EXTERNAL_URL";
pub const ENV_PORT: &str = "PORT";
pub const ENV_TRANSPORT: &str = "BOT_TRANSPORT";
pub const ENV_MARKUP: &str = "BOT_MARKUP";

pub const DEFAULT_PORT: u16 = 8443;

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// The backend POSTs updates to `<external_url>/<token-derived secret>`.
    Webhook,
    /// The bot long-polls `getUpdates`.
    Polling,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Webhook => "webhook",
            Transport::Polling => "polling",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webhook" => Ok(Transport::Webhook),
            "polling" | "poll" | "long-polling" => Ok(Transport::Polling),
            other => Err(anyhow!(
                "invalid transport '{}'. expected one of: webhook | polling",
                other
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// BotConfig
// ---------------------------------------------------------------------------

/// Resolved runtime configuration. **Token is redacted in `Debug` output.**
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    /// Destination chat for order notifications.
    pub group_chat_id: ChatId,
    /// Public base URL without trailing `/`. Required for webhook transport.
    pub external_url: Option<String>,
    pub port: u16,
    pub transport: Transport,
    pub markup: Markup,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<REDACTED>")
            .field("group_chat_id", &self.group_chat_id)
            .field("external_url", &self.external_url)
            .field("port", &self.port)
            .field("transport", &self.transport)
            .field("markup", &self.markup)
            .finish()
    }
}

impl BotConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve through an arbitrary variable lookup (tests pass a map).
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    /// - `CONFIG_MISSING` when a required variable is absent or blank.
    /// - `CONFIG_INVALID` when a value does not parse.
    pub fn resolve_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get(ENV_BOT_TOKEN).ok_or_else(|| missing(ENV_BOT_TOKEN))?;

        let group_raw = get(ENV_GROUP_CHAT_ID).ok_or_else(|| missing(ENV_GROUP_CHAT_ID))?;
        let group_chat_id = group_raw
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| anyhow!("CONFIG_INVALID: env var '{}' must be an integer chat id", ENV_GROUP_CHAT_ID))?;

        let external_url = get(ENV_EXTERNAL_URL)
            .or_else(|| get(ENV_EXTERNAL_URL_FALLBACK))
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        let port = match get(ENV_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                anyhow!("CONFIG_INVALID: env var '{}' must be a port number (0-65535)", ENV_PORT)
            })?,
            None => DEFAULT_PORT,
        };

        let transport = match get(ENV_TRANSPORT) {
            Some(raw) => Transport::parse(&raw)
                .with_context(|| format!("CONFIG_INVALID: env var '{}'", ENV_TRANSPORT))?,
            None if external_url.is_some() => Transport::Webhook,
            None => Transport::Polling,
        };

        let markup = match get(ENV_MARKUP) {
            Some(raw) => Markup::parse(&raw)
                .with_context(|| format!("CONFIG_INVALID: env var '{}'", ENV_MARKUP))?,
            None => Markup::Html,
        };

        let cfg = Self {
            bot_token,
            group_chat_id,
            external_url,
            port,
            transport,
            markup,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Replace the transport (CLI override) and re-check consistency.
    pub fn with_transport(mut self, transport: Transport) -> Result<Self> {
        self.transport = transport;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.transport == Transport::Webhook && self.external_url.is_none() {
            bail!(
                "CONFIG_MISSING: webhook transport requires env var '{}' (or '{}')",
                ENV_EXTERNAL_URL,
                ENV_EXTERNAL_URL_FALLBACK,
            );
        }
        Ok(())
    }

    /// Token-derived secret, restricted to `A-Z a-z 0-9 _ -`.
    ///
    /// Used both as the webhook path segment (a raw `:` would be read as a
    /// route parameter) and as the `secret_token` the backend echoes in the
    /// `X-Telegram-Bot-Api-Secret-Token` header.
    pub fn webhook_secret(&self) -> String {
        self.bot_token
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }

    /// HTTP path the backend posts updates to.
    pub fn webhook_path(&self) -> String {
        format!("/{}", self.webhook_secret())
    }

    /// Full webhook URL registered with the backend, if an external URL is set.
    pub fn webhook_url(&self) -> Option<String> {
        self.external_url
            .as_ref()
            .map(|base| format!("{}{}", base, self.webhook_path()))
    }

    /// Webhook URL safe for logs.
    pub fn redacted_webhook_url(&self) -> Option<String> {
        self.external_url
            .as_ref()
            .map(|base| format!("{}/<REDACTED>", base))
    }

    /// Bind address for the HTTP listener (all interfaces).
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn missing(var: &str) -> anyhow::Error {
    anyhow!("CONFIG_MISSING: required env var '{}' is not set or empty", var)
}
