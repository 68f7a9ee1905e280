//! Tracing initialization for scenarios.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber once per process.
///
/// Respects `RUST_LOG`; defaults to `vitrina=info`. Safe to call from every
/// scenario — later calls are no-ops, including under the test harness.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vitrina=info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
