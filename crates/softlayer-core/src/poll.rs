//! Completion poller
//!
//! Waits for a remote side effect (an order turning into a provisioned
//! resource, a hook becoming visible) by invoking a probe on a fixed interval.
//!
//! ```text
//!            Complete(v)
//!   Pending ─────────────▶ Succeeded(v)
//!      │  ▲
//!      │  │ Pending, elapsed < timeout (sleep interval)
//!      │  └───────┘
//!      │ Error(e) / Pending with elapsed ≥ timeout
//!      └─────────────────▶ Failed(e | TimeoutExceeded)
//! ```
//!
//! The deadline is measured from the start of the poll, so slow probes count
//! toward it. Probes never overlap. Dropping the returned future abandons the
//! wait; an in-flight probe is dropped with it.

use crate::clock::{Clock, TokioClock};
use crate::error::{Result, SoftLayerError};
use std::future::Future;
use std::time::Duration;

/// Result of a single probe
#[derive(Debug)]
pub enum PollOutcome<T> {
    /// Not there yet, probe again
    Pending,
    /// Terminal success
    Complete(T),
    /// Terminal failure, never retried
    Error(SoftLayerError),
}

impl<T> From<Result<Option<T>>> for PollOutcome<T> {
    fn from(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => PollOutcome::Complete(value),
            Ok(None) => PollOutcome::Pending,
            Err(e) => PollOutcome::Error(e),
        }
    }
}

/// Classify the matches of a lookup that must yield at most one record.
///
/// Zero matches is `Pending`, one is `Complete`, more than one is an
/// [`SoftLayerError::AmbiguousResult`]; the poller never picks among several.
pub fn classify_single<T>(mut matches: Vec<T>, resource: &str) -> PollOutcome<T> {
    match matches.len() {
        0 => PollOutcome::Pending,
        1 => PollOutcome::Complete(matches.remove(0)),
        count => PollOutcome::Error(SoftLayerError::AmbiguousResult {
            resource: resource.to_string(),
            count,
        }),
    }
}

/// Timing of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    timeout: Duration,
    interval: Duration,
    initial_delay: Duration,
}

impl PollConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(5);

    /// Both `timeout` and `interval` must be non-zero. No initial delay.
    pub fn new(timeout: Duration, interval: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(SoftLayerError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if interval.is_zero() {
            return Err(SoftLayerError::InvalidConfig(
                "interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            timeout,
            interval,
            initial_delay: Duration::ZERO,
        })
    }

    /// Wait this long before the first probe (counts toward the timeout)
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }
}

impl Default for PollConfig {
    /// 10 minute timeout, 3 second interval, 5 second initial delay
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            interval: Self::DEFAULT_INTERVAL,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
        }
    }
}

/// Drives a probe until it reports a terminal outcome or the deadline passes
#[derive(Debug, Clone)]
pub struct Poller<C = TokioClock> {
    config: PollConfig,
    clock: C,
}

impl Poller<TokioClock> {
    pub fn new(config: PollConfig) -> Self {
        Self::with_clock(config, TokioClock)
    }
}

impl<C: Clock> Poller<C> {
    pub fn with_clock(config: PollConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub async fn run<T, F, Fut>(&self, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PollOutcome<T>>,
    {
        let start = self.clock.now();
        let mut attempts: u32 = 0;

        if !self.config.initial_delay.is_zero() {
            self.clock.sleep(self.config.initial_delay).await;
        }

        loop {
            attempts += 1;
            let outcome = probe().await;
            let elapsed = self.clock.now().saturating_duration_since(start);

            match outcome {
                PollOutcome::Complete(value) => {
                    tracing::debug!("Probe {} completed after {:?}", attempts, elapsed);
                    return Ok(value);
                }
                PollOutcome::Error(err) => {
                    tracing::debug!("Probe {} failed: {}", attempts, err);
                    return Err(err);
                }
                PollOutcome::Pending if elapsed >= self.config.timeout => {
                    return Err(SoftLayerError::TimeoutExceeded { elapsed, attempts });
                }
                PollOutcome::Pending => {
                    let wait = self.config.interval.min(self.config.timeout - elapsed);
                    tracing::debug!(
                        "Probe {} pending after {:?}, next probe in {:?}",
                        attempts,
                        elapsed,
                        wait
                    );
                    self.clock.sleep(wait).await;
                }
            }
        }
    }
}

/// Poll `probe` on the wall clock until it completes, fails, or `config.timeout` elapses
pub async fn poll_until_complete<T, F, Fut>(probe: F, config: &PollConfig) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PollOutcome<T>>,
{
    Poller::new(*config).run(probe).await
}
