//! Wait mechanisms.
//!
//! Every blocking wait in the harness goes through [`wait_until`]: a bounded
//! polling loop over an async probe. The probe is re-evaluated against the
//! live document each round, so a wait can never observe stale state; expiry
//! fails fast with [`VitrinaError::Timeout`] naming the unsatisfied
//! condition.

use crate::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use crate::result::{VitrinaError, VitrinaResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Options for wait operations
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Polling interval as a [`Duration`]
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Poll an async probe until it reports true or the budget expires.
///
/// The probe is always evaluated at least once, so a zero timeout still
/// observes the current state. Probe errors propagate immediately; they are
/// not retried.
///
/// # Errors
///
/// Returns [`VitrinaError::Timeout`] carrying `waiting_for` if the condition
/// is not satisfied in time, or the probe's own error.
pub async fn wait_until<F, Fut>(
    options: &WaitOptions,
    waiting_for: &str,
    mut probe: F,
) -> VitrinaResult<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VitrinaResult<bool>>,
{
    let start = Instant::now();
    loop {
        if probe().await? {
            let elapsed = start.elapsed();
            tracing::trace!(target: "vitrina::wait", %waiting_for, ?elapsed, "condition met");
            return Ok(elapsed);
        }
        if start.elapsed() >= options.timeout() {
            tracing::debug!(target: "vitrina::wait", %waiting_for, timeout_ms = options.timeout_ms, "wait expired");
            return Err(VitrinaError::Timeout {
                ms: options.timeout_ms,
                waiting_for: waiting_for.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn options_builders() {
        let options = WaitOptions::new().with_timeout(250).with_poll_interval(10);
        assert_eq!(options.timeout(), Duration::from_millis(250));
        assert_eq!(options.poll_interval(), Duration::from_millis(10));
    }

    #[tokio::test]
    async fn immediate_success_does_not_sleep() {
        let options = WaitOptions::new().with_timeout(50).with_poll_interval(10);
        let elapsed = wait_until(&options, "always true", || async { Ok(true) })
            .await
            .unwrap();
        assert!(elapsed < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn succeeds_after_several_polls() {
        let options = WaitOptions::new().with_timeout(1_000).with_poll_interval(5);
        let calls = AtomicU32::new(0);
        wait_until(&options, "third poll", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n >= 2) }
        })
        .await
        .unwrap();
        assert!(calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn expiry_reports_the_condition() {
        let options = WaitOptions::new().with_timeout(30).with_poll_interval(5);
        let err = wait_until(&options, "#totalp non-empty", || async { Ok(false) })
            .await
            .unwrap_err();
        match err {
            VitrinaError::Timeout { ms, waiting_for } => {
                assert_eq!(ms, 30);
                assert_eq!(waiting_for, "#totalp non-empty");
            }
            other => panic!("expected timeout, got {other}"),
        }
    }

    #[tokio::test]
    async fn probe_error_propagates_without_retry() {
        let options = WaitOptions::new().with_timeout(1_000).with_poll_interval(5);
        let calls = AtomicU32::new(0);
        let err = wait_until(&options, "failing probe", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(VitrinaError::Eval {
                    message: "boom".to_string(),
                })
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, VitrinaError::Eval { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_timeout_still_probes_once() {
        let options = WaitOptions::new().with_timeout(0).with_poll_interval(5);
        assert!(wait_until(&options, "probe once", || async { Ok(true) })
            .await
            .is_ok());
    }
}
