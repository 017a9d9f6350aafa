//! Fixed mapping from store error codes to short user-facing messages.

pub const NO_DATA_FOUND: &str = "No data found";
pub const RECORD_EXISTS: &str = "This record already exists";
pub const RECORD_IN_USE: &str = "Cannot delete - record is in use";
pub const CONNECTION_LOST: &str = "Connection lost. Please check your internet.";
pub const FALLBACK: &str = "Something went wrong. Please try again.";

const KNOWN: [(&str, &str); 4] = [
    ("PGRST116", NO_DATA_FOUND),
    ("23505", RECORD_EXISTS),
    ("23503", RECORD_IN_USE),
    ("NetworkError", CONNECTION_LOST),
];

fn lookup(key: &str) -> Option<&'static str> {
    KNOWN
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, message)| *message)
}

/// Resolves the message shown to users for a store failure.
///
/// The code is consulted first, then the raw message; anything unknown
/// collapses to [`FALLBACK`].
pub fn user_friendly_message(
    code: Option<&str>,
    message: Option<&str>,
) -> &'static str {
    code.and_then(lookup)
        .or_else(|| message.and_then(lookup))
        .unwrap_or(FALLBACK)
}
