//! Fixed-delay retry combinator
//!
//! A failed attempt is retried after a constant delay for as long as the failure
//! predicate classifies the error as transient. There is no attempt limit and no
//! backoff growth: a remote outage only ever costs latency.

use futures::future::BoxFuture;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Source of delays between attempts
///
/// Production code sleeps on the tokio timer; tests substitute a clock that
/// returns immediately and records what was requested.
pub trait Clock: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Clock backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Retry policy: constant delay, retry while the predicate allows it
#[derive(Debug, Clone)]
pub struct Retry<C = TokioClock> {
    delay: Duration,
    clock: C,
}

impl Retry<TokioClock> {
    /// Retries on the tokio timer with a fixed delay
    pub fn fixed(delay: Duration) -> Self {
        Self::with_clock(delay, TokioClock)
    }
}

impl<C: Clock> Retry<C> {
    pub fn with_clock(delay: Duration, clock: C) -> Self {
        Self { delay, clock }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it succeeds or fails with a non-retryable error
    ///
    /// `op` receives the 1-based attempt number.
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The first successful attempt's value
    /// * `Err(E)` - The first error for which `should_retry` returned false
    pub async fn run<T, E, Op, Fut, P>(&self, mut op: Op, should_retry: P) -> Result<T, E>
    where
        Op: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if should_retry(&e) => {
                    tracing::warn!(
                        "Attempt {} failed: {}; retrying in {:?}",
                        attempt,
                        e,
                        self.delay
                    );
                    self.clock.sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
