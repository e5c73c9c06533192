//! cob-conversation
//!
//! The order-intake conversation: a linear name → phone → comment walk with
//! one validation gate (phone format) and one side effect on completion
//! (the rendered order notification, handed back to the caller to deliver).
//!
//! Everything in this crate is pure: no network, no clock, no globals. The
//! caller owns the [`SessionStore`] and passes it in by `&mut` for each
//! inbound event.

mod conversation;
mod phone;
mod render;
mod session;

pub mod texts;

pub use conversation::{OrderConversation, Reaction, SessionStore, Submission};
pub use phone::is_valid_phone;
pub use render::{render_order_notification, OrderNotification};
pub use session::{CompletedOrder, Rejection, Session, SessionState, StepOutcome, TransitionError};
