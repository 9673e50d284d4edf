//! Message variant resolution
//!
//! The nested `message` object names its own variant in a `type` key, but the
//! envelope does not mirror it. The resolver finds that key in the raw bytes
//! without requiring the rest of the payload to parse.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Matches `"type": "<value>"` with any ASCII whitespace around the colon.
/// The key must not be an escaped quote inside some string value. Byte
/// oriented so invalid UTF-8 around the key does not prevent a match.
static TYPE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?-u)(?:^|[^\\])"type"\s*:\s*"([^"\\]*)""#).expect("type key pattern is valid")
});

/// Resolve the message kind named by the first `type` key in `payload`.
///
/// Returns the lower-cased value (`"text"`, `"picture"`, `"contact"`, ...)
/// or an empty string when no `type` key is found. Never fails.
pub fn resolve_message_kind(payload: &[u8]) -> String {
    TYPE_KEY
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_lowercase())
        .unwrap_or_default()
}
