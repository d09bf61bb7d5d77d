//! Result Normalizer: turns raw model output into a caller-usable value.
//!
//! Normalization is all-or-nothing: either a clean, non-empty value comes out
//! or a `Rejection` does. Empty output is retriable; malformed output is not.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::resilience::invoker::{Classify, RetryReason};

const FENCE: &str = "```";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("model returned empty output")]
    Empty,

    #[error("model output could not be used: {0}")]
    Malformed(String),
}

impl Classify for Rejection {
    fn retry_reason(&self) -> Option<RetryReason> {
        match self {
            Rejection::Empty => Some(RetryReason::EmptyOutput),
            Rejection::Malformed(_) => None,
        }
    }
}

/// Strips a surrounding code fence (```` ``` ```` with an optional language
/// tag such as `json` or `html`) and trims the result. Unfenced text is only trimmed.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    // A first line holding only a language tag belongs to the fence.
    let body = match rest.split_once('\n') {
        Some((first_line, remainder)) if is_fence_tag(first_line.trim()) => remainder,
        _ => rest,
    };

    body.trim_end()
        .strip_suffix(FENCE)
        .unwrap_or(body)
        .trim()
}

fn is_fence_tag(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}

/// Cleans text output. Whitespace-only or fence-only output is `Rejection::Empty`.
pub fn normalize_text(raw: &str) -> Result<String, Rejection> {
    let cleaned = strip_fences(raw);
    if cleaned.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(cleaned.to_string())
}

/// Cleans and deserializes JSON output.
pub fn normalize_json<T: DeserializeOwned>(raw: &str) -> Result<T, Rejection> {
    let cleaned = strip_fences(raw);
    if cleaned.is_empty() {
        return Err(Rejection::Empty);
    }
    serde_json::from_str(cleaned).map_err(|e| Rejection::Malformed(e.to_string()))
}

/// Binary output (audio) is usable only when non-empty.
pub fn normalize_bytes(raw: Bytes) -> Result<Bytes, Rejection> {
    if raw.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(raw)
}
