//! Fallback Resolver: chooses which payload shape a generation call gets.
//!
//! Primary content (e.g. a scraped project page) wins when it is usable;
//! otherwise the request falls back to statically known fields. This never
//! fails and never re-fetches the primary source.

use std::fmt;

use tracing::{debug, info};

/// Outcome of trying to obtain primary content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryContent {
    Usable(String),
    Unavailable(String),
}

impl PrimaryContent {
    /// Whitespace is collapsed; content that is empty afterwards is unavailable.
    pub fn from_text(text: &str) -> Self {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            PrimaryContent::Unavailable("primary content was empty".to_string())
        } else {
            PrimaryContent::Usable(collapsed)
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        PrimaryContent::Unavailable(reason.into())
    }
}

impl<E: fmt::Display> From<Result<String, E>> for PrimaryContent {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(text) => PrimaryContent::from_text(&text),
            Err(e) => PrimaryContent::Unavailable(e.to_string()),
        }
    }
}

/// The payload variant selected for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<P, S> {
    Primary(P),
    Secondary(S),
}

impl<P, S> Payload<P, S> {
    pub fn is_primary(&self) -> bool {
        matches!(self, Payload::Primary(_))
    }
}

impl<T> Payload<T, T> {
    /// Both variants carry the same type (e.g. a rendered prompt).
    pub fn into_inner(self) -> T {
        match self {
            Payload::Primary(value) | Payload::Secondary(value) => value,
        }
    }
}

/// Builds the primary payload from usable content, or the secondary one otherwise.
/// Exactly one of the two builders runs.
pub fn resolve<P, S>(
    primary: PrimaryContent,
    build_primary: impl FnOnce(String) -> P,
    build_secondary: impl FnOnce() -> S,
) -> Payload<P, S> {
    match primary {
        PrimaryContent::Usable(content) => {
            debug!("Using primary content ({} chars)", content.len());
            Payload::Primary(build_primary(content))
        }
        PrimaryContent::Unavailable(reason) => {
            info!("Primary content unavailable, using fallback payload: {reason}");
            Payload::Secondary(build_secondary())
        }
    }
}
