// File: modlink-core/src/modmail/echo.rs
//
// Markers the bot opens its own replies with. A modmail record starting with
// one of them is the bot talking to itself and is never parsed.

pub const VERIFIED_PREFIX: &str = "✅";
pub const FAILURE_PREFIX: &str = "❌";
pub const NOTICE_PREFIX: &str = "⚠️";
pub const LOOKUP_PREFIX: &str = "🔗";
pub const INFO_PREFIX: &str = "ℹ️";

pub const ECHO_PREFIXES: &[&str] = &[
    VERIFIED_PREFIX,
    FAILURE_PREFIX,
    NOTICE_PREFIX,
    LOOKUP_PREFIX,
    INFO_PREFIX,
];
