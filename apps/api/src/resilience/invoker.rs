//! Resilient Invoker: bounded, sequential retry around one generation call.
//!
//! Per invocation:
//!   Idle → Attempting → Succeeded                       (usable normalized output)
//!                     → RetryScheduled → Attempting     (retriable, attempts left)
//!                     → Failed                          (fatal, or attempts exhausted)
//!
//! Intermediate failures are logged and dropped; exactly one terminal outcome
//! reaches the caller.

use std::fmt;
use std::future::Future;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::resilience::normalize::Rejection;
use crate::resilience::policy::{FailureMode, RetryPolicy};

pub const SERVICE_BUSY_MESSAGE: &str =
    "The AI service is currently busy. Please try again in a moment.";
pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "An unexpected error occurred while generating content. Please try again later.";

/// Why a failed attempt is worth repeating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    /// Upstream signalled transient unavailability (overloaded, rate limited, 5xx).
    ServiceBusy(String),
    /// The call succeeded but produced nothing usable.
    EmptyOutput,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::ServiceBusy(detail) => write!(f, "service busy: {detail}"),
            RetryReason::EmptyOutput => write!(f, "empty output"),
        }
    }
}

/// Retriable-vs-fatal predicate. `None` means the error is fatal.
pub trait Classify {
    fn retry_reason(&self) -> Option<RetryReason>;
}

/// Result of a single attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum AttemptOutcome<T> {
    Success(T),
    RetriableFailure(RetryReason),
    FatalFailure(String),
}

impl<T> AttemptOutcome<T> {
    fn failed<E: Classify + fmt::Display>(error: E) -> Self {
        match error.retry_reason() {
            Some(reason) => AttemptOutcome::RetriableFailure(reason),
            None => AttemptOutcome::FatalFailure(error.to_string()),
        }
    }
}

/// Terminal failure of an invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("generation gave up after {attempts} attempts ({reason})")]
    Exhausted { attempts: u32, reason: RetryReason },

    #[error("generation failed on attempt {attempt}: {message}")]
    Fatal { attempt: u32, message: String },
}

impl GenerationFailure {
    /// True when every attempt failed and the last one was an upstream busy signal.
    pub fn is_service_busy(&self) -> bool {
        matches!(
            self,
            GenerationFailure::Exhausted {
                reason: RetryReason::ServiceBusy(_),
                ..
            }
        )
    }

    /// Message safe to show an end user.
    pub fn user_message(&self) -> &'static str {
        if self.is_service_busy() {
            SERVICE_BUSY_MESSAGE
        } else {
            UNEXPECTED_ERROR_MESSAGE
        }
    }
}

/// Runs a remote generation operation under a `RetryPolicy`.
///
/// Holds no state between calls; one `Invoker` can serve concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct Invoker {
    policy: RetryPolicy,
}

impl Invoker {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Calls `op` until `normalize` accepts its output, a fatal error occurs,
    /// or the policy's attempt bound is reached.
    ///
    /// `label` names the flow in logs.
    pub async fn invoke<R, T, E, F, Fut, N>(
        &self,
        label: &str,
        mut op: F,
        mut normalize: N,
    ) -> Result<T, GenerationFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Classify + fmt::Display,
        N: FnMut(R) -> Result<T, Rejection>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 1;

        loop {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                debug!(
                    flow = label,
                    attempt,
                    max_attempts,
                    "Retrying after {}ms",
                    delay.as_millis()
                );
                sleep(delay).await;
            }

            let outcome = match op().await {
                Ok(raw) => match normalize(raw) {
                    Ok(value) => AttemptOutcome::Success(value),
                    Err(rejection) => AttemptOutcome::failed(rejection),
                },
                Err(e) => AttemptOutcome::failed(e),
            };

            match outcome {
                AttemptOutcome::Success(value) => {
                    if attempt > 1 {
                        info!(flow = label, attempt, max_attempts, "Generation succeeded after retry");
                    }
                    return Ok(value);
                }
                AttemptOutcome::RetriableFailure(reason) => {
                    warn!(
                        flow = label,
                        attempt,
                        max_attempts,
                        "Generation attempt {}/{} failed: {}",
                        attempt,
                        max_attempts,
                        reason
                    );
                    if !self.policy.has_remaining(attempt) {
                        error!(flow = label, "Generation retries exhausted: {reason}");
                        return Err(GenerationFailure::Exhausted {
                            attempts: attempt,
                            reason,
                        });
                    }
                    attempt += 1;
                }
                AttemptOutcome::FatalFailure(message) => {
                    error!(
                        flow = label,
                        attempt,
                        max_attempts,
                        "Generation attempt {}/{} failed fatally: {}",
                        attempt,
                        max_attempts,
                        message
                    );
                    return Err(GenerationFailure::Fatal { attempt, message });
                }
            }
        }
    }

    /// `invoke`, then apply `mode` to a terminal failure. With
    /// `FailureMode::Placeholder` the failure becomes `placeholder(&failure)`.
    pub async fn invoke_settled<R, T, E, F, Fut, N, P>(
        &self,
        label: &str,
        op: F,
        normalize: N,
        mode: FailureMode,
        placeholder: P,
    ) -> Result<T, GenerationFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Classify + fmt::Display,
        N: FnMut(R) -> Result<T, Rejection>,
        P: FnOnce(&GenerationFailure) -> T,
    {
        match self.invoke(label, op, normalize).await {
            Ok(value) => Ok(value),
            Err(failure) => match mode {
                FailureMode::Propagate => Err(failure),
                FailureMode::Placeholder => {
                    warn!(flow = label, "Substituting placeholder for failed generation: {failure}");
                    Ok(placeholder(&failure))
                }
            },
        }
    }
}
