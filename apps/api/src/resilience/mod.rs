//! Resilient remote calls: the one place generation calls are retried.
//!
//! Flow: fallback::resolve (pick payload) → Invoker::invoke (bounded retry)
//!       → normalize (clean/validate) → caller gets `T` or a `GenerationFailure`.
//!
//! Flows must not hand-roll their own retry loops; wrap the remote call here.

pub mod fallback;
pub mod invoker;
pub mod normalize;
pub mod policy;

pub use fallback::{resolve, PrimaryContent};
pub use invoker::{Classify, GenerationFailure, Invoker, RetryReason};
pub use normalize::Rejection;
pub use policy::{FailureMode, RetryPolicy};
