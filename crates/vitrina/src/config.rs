//! Harness configuration.
//!
//! Base URL, timeouts, and browser choice live here; everything else in the
//! harness receives a [`HarnessConfig`] instead of reading the environment.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default storefront under test
pub const DEFAULT_BASE_URL: &str = "https://www.demoblaze.com";

/// Default timeout for navigation (30 seconds)
pub const DEFAULT_NAV_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for element waits (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for waits (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Configuration for a verification session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URL of the storefront under test
    pub base_url: String,
    /// Run the browser in headless mode
    pub headless: bool,
    /// Path to a chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers/CI)
    pub sandbox: bool,
    /// Timeout for full navigations
    pub nav_timeout_ms: u64,
    /// Timeout for element and dialog waits
    pub wait_timeout_ms: u64,
    /// Polling interval for waits
    pub poll_interval_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            chromium_path: None,
            sandbox: true,
            nav_timeout_ms: DEFAULT_NAV_TIMEOUT_MS,
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with defaults overridden from the environment.
    ///
    /// Recognized variables: `VITRINA_BASE_URL`, `VITRINA_HEADFUL` (any value
    /// disables headless mode), `CHROMIUM_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("VITRINA_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if std::env::var("VITRINA_HEADFUL").is_ok() {
            config.headless = false;
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            if !path.is_empty() {
                config.chromium_path = Some(path);
            }
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the chromium binary path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable the sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the element/dialog wait timeout
    #[must_use]
    pub const fn with_wait_timeout(mut self, ms: u64) -> Self {
        self.wait_timeout_ms = ms;
        self
    }

    /// Set the navigation timeout
    #[must_use]
    pub const fn with_nav_timeout(mut self, ms: u64) -> Self {
        self.nav_timeout_ms = ms;
        self
    }

    /// Absolute URL for a path on the storefront
    #[must_use]
    pub fn page_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Element/dialog wait timeout as a [`Duration`]
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    /// Polling interval as a [`Duration`]
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_demo_storefront() {
        let config = HarnessConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!(config.wait_timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
    }

    #[test]
    fn builders_override_fields() {
        let config = HarnessConfig::new()
            .with_base_url("http://localhost:8080/")
            .with_headless(false)
            .with_no_sandbox()
            .with_wait_timeout(2_000)
            .with_nav_timeout(5_000);
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.wait_timeout_ms, 2_000);
        assert_eq!(config.nav_timeout_ms, 5_000);
    }

    #[test]
    fn page_url_joins_without_doubled_slashes() {
        let config = HarnessConfig::new().with_base_url("http://localhost:8080/");
        assert_eq!(config.page_url("/cart.html"), "http://localhost:8080/cart.html");
        assert_eq!(config.page_url("cart.html"), "http://localhost:8080/cart.html");
        assert_eq!(config.page_url("/"), "http://localhost:8080/");
        assert_eq!(config.page_url(""), "http://localhost:8080/");
    }

    #[test]
    fn durations_match_millis() {
        let config = HarnessConfig::new().with_wait_timeout(1_500);
        assert_eq!(config.wait_timeout(), Duration::from_millis(1_500));
        assert_eq!(
            config.poll_interval(),
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
        );
    }
}
