//! Phone number gate.

use std::sync::OnceLock;

use regex::Regex;

/// Optional `+`, a digit, then at least seven of digit / whitespace / `-` / `(` / `)`.
const PHONE_PATTERN: &str = r"^\+?\d[\d\s\-\(\)]{7,}$";

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("PHONE_PATTERN is a valid regex"))
}

/// Full-string match against the phone pattern.
///
/// The candidate is checked as given; callers trim user input first.
pub fn is_valid_phone(candidate: &str) -> bool {
    phone_re().is_match(candidate)
}
