//! Order session state machine.
//!
//! # Design
//!
//! One [`Session`] per conversation. Inputs are applied through
//! [`Session::apply_text`] and [`Session::cancel`], which enforce:
//!
//! 1. **Linear order.** `name` is set before `phone`, `phone` before
//!    `comment`. A field is never cleared once set.
//! 2. **Phone gate.** `phone` only ever holds a string accepted by
//!    [`is_valid_phone`]. A rejected phone leaves the session untouched.
//! 3. **Terminal DONE.** Any input applied to a `Done` session is a
//!    [`TransitionError`].
//!
//! ```text
//!   new() ──► AwaitingName ──text──► AwaitingPhone ──valid phone──► AwaitingComment ──text──► Done
//!                 │    ▲                 │    ▲                            │
//!                 │    └─ empty text     │    └─ invalid phone             │
//!                 └──────────── cancel ──┴─────────────────────────────────┴──────────────► Done
//! ```

use std::fmt;

use crate::phone::is_valid_phone;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    AwaitingName,
    AwaitingPhone,
    AwaitingComment,
    /// Submitted or cancelled. **Terminal.**
    Done,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::AwaitingName => "awaiting_name",
            SessionState::AwaitingPhone => "awaiting_phone",
            SessionState::AwaitingComment => "awaiting_comment",
            SessionState::Done => "done",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a text input was not accepted at the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Name step received only whitespace.
    EmptyName,
    /// Phone step received a string that fails the phone pattern.
    InvalidPhone,
}

/// The three collected fields of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedOrder {
    pub name: String,
    pub phone: String,
    pub comment: String,
}

/// Result of applying one text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Name stored; the session now awaits the phone.
    NameAccepted,
    /// Phone stored; the session now awaits the comment.
    PhoneAccepted,
    /// Input refused; state and fields unchanged.
    Rejected(Rejection),
    /// Comment stored; the session is `Done` and the order is complete.
    Completed(CompletedOrder),
}

/// Returned when input arrives for a session that is already `Done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: SessionState,
    pub input: &'static str,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "illegal session transition: {} + {}",
            self.from.as_str(),
            self.input
        )
    }
}

impl std::error::Error for TransitionError {}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    name: Option<String>,
    phone: Option<String>,
    comment: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session waiting for the customer's name.
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingName,
            name: None,
            phone: None,
            comment: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Apply a text message to the current step. Input is trimmed first.
    ///
    /// # Errors
    /// [`TransitionError`] if the session is already `Done`.
    pub fn apply_text(&mut self, raw: &str) -> Result<StepOutcome, TransitionError> {
        let text = raw.trim();

        match self.state {
            SessionState::AwaitingName => {
                if text.is_empty() {
                    return Ok(StepOutcome::Rejected(Rejection::EmptyName));
                }
                self.name = Some(text.to_string());
                self.state = SessionState::AwaitingPhone;
                Ok(StepOutcome::NameAccepted)
            }

            SessionState::AwaitingPhone => {
                if !is_valid_phone(text) {
                    return Ok(StepOutcome::Rejected(Rejection::InvalidPhone));
                }
                self.phone = Some(text.to_string());
                self.state = SessionState::AwaitingComment;
                Ok(StepOutcome::PhoneAccepted)
            }

            SessionState::AwaitingComment => {
                self.comment = Some(text.to_string());
                self.state = SessionState::Done;
                Ok(StepOutcome::Completed(self.completed_order()))
            }

            SessionState::Done => Err(TransitionError {
                from: self.state,
                input: "text",
            }),
        }
    }

    /// Abort the session from any awaiting state.
    ///
    /// # Errors
    /// [`TransitionError`] if the session is already `Done`.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError {
                from: self.state,
                input: "cancel",
            });
        }
        self.state = SessionState::Done;
        Ok(())
    }

    // Only reachable once all three fields are set.
    fn completed_order(&self) -> CompletedOrder {
        CompletedOrder {
            name: self.name.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            comment: self.comment.clone().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at_phone_step() -> Session {
        let mut s = Session::new();
        s.apply_text("Ann").unwrap();
        s
    }

    #[test]
    fn new_session_awaits_name() {
        let s = Session::new();
        assert_eq!(s.state(), SessionState::AwaitingName);
        assert!(s.name().is_none());
        assert!(!s.state().is_terminal());
    }

    #[test]
    fn name_is_trimmed_and_not_validated() {
        let mut s = Session::new();
        let out = s.apply_text("  <Ann 42!>  ").unwrap();
        assert_eq!(out, StepOutcome::NameAccepted);
        assert_eq!(s.state(), SessionState::AwaitingPhone);
        assert_eq!(s.name(), Some("<Ann 42!>"));
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let mut s = Session::new();
        let out = s.apply_text("   ").unwrap();
        assert_eq!(out, StepOutcome::Rejected(Rejection::EmptyName));
        assert_eq!(s.state(), SessionState::AwaitingName);
        assert!(s.name().is_none());
    }

    #[test]
    fn invalid_phone_never_sets_phone() {
        let mut s = at_phone_step();
        for bad in ["hello", "123", "+", "(900) 000-0000", "+992900000000abc"] {
            let out = s.apply_text(bad).unwrap();
            assert_eq!(out, StepOutcome::Rejected(Rejection::InvalidPhone));
            assert_eq!(s.state(), SessionState::AwaitingPhone);
            assert!(s.phone().is_none(), "phone must stay unset after {bad:?}");
        }
        assert_eq!(s.name(), Some("Ann"), "earlier fields untouched");
    }

    #[test]
    fn valid_phone_advances_once() {
        for good in ["+992900000000", "900-000-000-0", " +992 900-000-000 "] {
            let mut s = at_phone_step();
            let out = s.apply_text(good).unwrap();
            assert_eq!(out, StepOutcome::PhoneAccepted);
            assert_eq!(s.state(), SessionState::AwaitingComment);
            assert_eq!(s.phone(), Some(good.trim()));
        }
    }

    #[test]
    fn comment_completes_with_all_fields() {
        let mut s = at_phone_step();
        s.apply_text("+992900000000").unwrap();
        let out = s.apply_text(" - ").unwrap();
        assert_eq!(
            out,
            StepOutcome::Completed(CompletedOrder {
                name: "Ann".to_string(),
                phone: "+992900000000".to_string(),
                comment: "-".to_string(),
            })
        );
        assert!(s.state().is_terminal());
    }

    #[test]
    fn cancel_from_each_awaiting_state() {
        let mut a = Session::new();
        a.cancel().unwrap();
        assert_eq!(a.state(), SessionState::Done);

        let mut b = at_phone_step();
        b.cancel().unwrap();
        assert_eq!(b.state(), SessionState::Done);
        assert_eq!(b.name(), Some("Ann"), "cancel does not unset fields");

        let mut c = at_phone_step();
        c.apply_text("+992900000000").unwrap();
        c.cancel().unwrap();
        assert_eq!(c.state(), SessionState::Done);
    }

    #[test]
    fn input_after_done_is_illegal() {
        let mut s = Session::new();
        s.cancel().unwrap();

        let err = s.apply_text("Ann").unwrap_err();
        assert_eq!(err.from, SessionState::Done);
        assert_eq!(err.to_string(), "illegal session transition: done + text");
        assert!(s.cancel().is_err());
        assert!(s.name().is_none());
    }
}
