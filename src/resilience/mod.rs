//! Resilience layer: generic retry execution for fallible operations.
pub mod retry;

pub use retry::{
    with_retry, with_retry_async, with_retry_cancellable, Cancelled, NoopObserver, RetryObserver,
    RetryPolicy, TracingObserver,
};
