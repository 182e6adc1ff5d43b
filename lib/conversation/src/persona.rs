//! Name extraction and reply personalization.
//!
//! Pure functions implementing the personalization rules: a user
//! message may declare a name ("my name is ..."), which is answered
//! with a fixed introduction instead of a remote completion; once a
//! name is known, later replies have their first "Hello" rewritten to
//! greet the user by name.

/// Marker phrase that declares the user's name, matched
/// case-insensitively.
const NAME_MARKER: &str = "my name is";

/// Literal greeting word rewritten in replies, matched case-sensitively.
const GREETING_WORD: &str = "Hello";

/// Extracts a declared name from a user message.
///
/// Returns the trimmed remainder after the first occurrence of the
/// marker phrase, or `None` when the message does not declare a name.
/// A declaration with nothing after the marker yields `Some("")`: the
/// name is considered declared-but-empty and still claims the session's
/// single name assignment.
#[must_use]
pub fn declared_name(text: &str) -> Option<String> {
    let marker = NAME_MARKER.as_bytes();
    // Byte-wise ASCII-case-insensitive search keeps offsets valid for
    // non-ASCII input, where str::to_lowercase can shift byte positions.
    let start = text
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker))?;
    let rest = &text[start + marker.len()..];
    Some(rest.trim().to_string())
}

/// Builds the deterministic reply for a name-declaration turn.
#[must_use]
pub fn introduction(name: &str) -> String {
    format!("Nice to meet you, {name}! How can I help you today?")
}

/// Rewrites the first "Hello" in a reply to greet the user by name.
///
/// The match is case-sensitive and only the first occurrence is
/// rewritten; replies without the greeting word pass through unchanged.
#[must_use]
pub fn personalize(reply: &str, name: &str) -> String {
    reply.replacen(GREETING_WORD, &format!("{GREETING_WORD} {name}"), 1)
}
