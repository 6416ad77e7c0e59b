//! Retry execution for fallible operations, blocking or async.
//!
//! Attempt accounting and the delay schedule live in one place
//! ([`AttemptState`]); the executors only differ in how they run the
//! operation and how they wait. Retryability is decided by a caller-supplied
//! predicate over the caller's own error type, and diagnostics go to an
//! injected [`RetryObserver`] rather than a global logger.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Configuration for retry behavior. Immutable; shared across invocations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of invocations, including the first. Must be >= 1.
    pub max_attempts: u32,
    /// Delay before the first re-invocation.
    pub delay: Duration,
    /// Growth factor applied to the delay after each retry (1.0 = fixed).
    pub multiplier: f32,
    /// Cap on the grown delay.
    pub max_delay: Duration,
    /// Add random jitter (up to 25%) to each delay.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
            multiplier: 1.0,
            max_delay: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// Fixed-delay policy: `max_attempts` total invocations, a constant
    /// pause between them.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            ..Default::default()
        }
    }

    /// Delay to apply after the `attempts_made`-th failed attempt
    /// (1-based; the first retry waits the base delay).
    fn delay_for(&self, attempts_made: u32) -> Duration {
        let mut millis = self.delay.as_millis() as f64;
        for _ in 1..attempts_made {
            millis *= f64::from(self.multiplier);
        }
        let capped = millis.min(self.max_delay.as_millis() as f64);
        let mut delay = Duration::from_millis(capped as u64);

        if self.jitter && !delay.is_zero() {
            let mut rng = rand::thread_rng();
            let extra = rng.gen_range(0..=(delay.as_millis() / 4).max(1) as u64);
            delay += Duration::from_millis(extra);
        }

        delay
    }
}

/// Failure kind surfaced when a cancellable retry is aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation cancelled")
    }
}

/// Receives retry diagnostics. Purely observational: implementations must
/// not affect control flow.
pub trait RetryObserver {
    /// A retryable failure was recorded and another attempt will follow.
    fn on_retry(&self, _attempt: u32, _max_attempts: u32, _error: &dyn fmt::Display) {}

    /// The failure is terminal: attempts exhausted or not retryable.
    fn on_terminal(&self, _attempt: u32, _max_attempts: u32, _error: &dyn fmt::Display) {}
}

/// Default observer: reports through `tracing`.
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn on_retry(&self, attempt: u32, max_attempts: u32, error: &dyn fmt::Display) {
        warn!("Retrying ({}/{}) after error: {}", attempt, max_attempts, error);
    }

    fn on_terminal(&self, attempt: u32, max_attempts: u32, error: &dyn fmt::Display) {
        warn!(
            "Giving up after attempt {} of {}: {}",
            attempt, max_attempts, error
        );
    }
}

/// Observer that discards everything.
pub struct NoopObserver;

impl RetryObserver for NoopObserver {}

/// Per-invocation attempt counter. Fresh for every wrapped call; the policy
/// itself holds no cross-call state.
#[derive(Debug)]
struct AttemptState {
    made: u32,
}

enum RetryDecision {
    RetryAfter(Duration),
    GiveUp,
}

impl AttemptState {
    fn new() -> Self {
        Self { made: 0 }
    }

    /// Record a retryable failure and decide what happens next.
    fn record_failure(&mut self, policy: &RetryPolicy) -> RetryDecision {
        self.made += 1;
        if self.made >= policy.max_attempts {
            RetryDecision::GiveUp
        } else {
            RetryDecision::RetryAfter(policy.delay_for(self.made))
        }
    }
}

/// Run a blocking operation under the policy. Delays occupy the calling
/// thread; use [`with_retry_async`] inside a runtime.
///
/// The error is always propagated unchanged. A failure the predicate
/// rejects propagates immediately without consuming an attempt. Retrying
/// every failure requires an explicit `|_| true`.
pub fn with_retry<T, E, F>(
    policy: &RetryPolicy,
    retryable: impl Fn(&E) -> bool,
    observer: &dyn RetryObserver,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: fmt::Display,
{
    let mut state = AttemptState::new();
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retryable(&err) {
                    observer.on_terminal(state.made + 1, policy.max_attempts, &err);
                    return Err(err);
                }
                match state.record_failure(policy) {
                    RetryDecision::GiveUp => {
                        observer.on_terminal(state.made, policy.max_attempts, &err);
                        return Err(err);
                    }
                    RetryDecision::RetryAfter(pause) => {
                        observer.on_retry(state.made, policy.max_attempts, &err);
                        std::thread::sleep(pause);
                    }
                }
            }
        }
    }
}

/// Async counterpart of [`with_retry`]. The inter-attempt delay suspends on
/// the runtime and does not block unrelated tasks.
pub async fn with_retry_async<T, E, F, Fut>(
    policy: &RetryPolicy,
    retryable: impl Fn(&E) -> bool,
    observer: &dyn RetryObserver,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut state = AttemptState::new();
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retryable(&err) {
                    observer.on_terminal(state.made + 1, policy.max_attempts, &err);
                    return Err(err);
                }
                match state.record_failure(policy) {
                    RetryDecision::GiveUp => {
                        observer.on_terminal(state.made, policy.max_attempts, &err);
                        return Err(err);
                    }
                    RetryDecision::RetryAfter(pause) => {
                        observer.on_retry(state.made, policy.max_attempts, &err);
                        tokio::time::sleep(pause).await;
                    }
                }
            }
        }
    }
}

/// [`with_retry_async`] with an external cancellation signal. Cancellation
/// aborts before the next invocation or during the inter-attempt delay and
/// surfaces as `E::from(Cancelled)`; remaining attempts are skipped. No
/// other failure kind is ever introduced.
pub async fn with_retry_cancellable<T, E, F, Fut>(
    policy: &RetryPolicy,
    token: &CancellationToken,
    retryable: impl Fn(&E) -> bool,
    observer: &dyn RetryObserver,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display + From<Cancelled>,
{
    let mut state = AttemptState::new();
    loop {
        if token.is_cancelled() {
            return Err(E::from(Cancelled));
        }
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retryable(&err) {
                    observer.on_terminal(state.made + 1, policy.max_attempts, &err);
                    return Err(err);
                }
                match state.record_failure(policy) {
                    RetryDecision::GiveUp => {
                        observer.on_terminal(state.made, policy.max_attempts, &err);
                        return Err(err);
                    }
                    RetryDecision::RetryAfter(pause) => {
                        observer.on_retry(state.made, policy.max_attempts, &err);
                        tokio::select! {
                            _ = token.cancelled() => return Err(E::from(Cancelled)),
                            _ = tokio::time::sleep(pause) => {}
                        }
                    }
                }
            }
        }
    }
}
