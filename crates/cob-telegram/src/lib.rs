//! cob-telegram
//!
//! Telegram boundary built on teloxide.
//!
//! - [`BotCommand`]: the commands the bot answers to, parsed against the
//!   bot's own username so `/cancel@other_bot` is never taken as ours.
//! - [`to_inbound`]: decode a teloxide [`Message`](teloxide::types::Message)
//!   into a transport-neutral [`cob_schemas::InboundEvent`].
//! - [`MessageSink`]: the outbound contract the daemon depends on, implemented
//!   for [`teloxide::Bot`]. Object-safe so callers hold an
//!   `Arc<dyn MessageSink>`; tests swap in a recording double.

mod command;
mod inbound;
mod sink;

pub use command::BotCommand;
pub use inbound::to_inbound;
pub use sink::{parse_mode, MessageSink};
