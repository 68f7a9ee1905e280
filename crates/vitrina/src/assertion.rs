//! Auto-retrying expectations over element handles.
//!
//! Every expectation polls its predicate against the live document within a
//! bounded budget, so assertions always read post-settle state: there is no
//! way to assert on a stale snapshot, and no caller-side sleeps.

use crate::locator::Handle;
use crate::result::{VitrinaError, VitrinaResult};
use crate::wait::{wait_until, WaitOptions};
use std::time::Duration;

/// Create an expectation for a handle
#[must_use]
pub fn expect<'h, 's>(handle: &'h Handle<'s>) -> Expect<'h, 's> {
    let config = handle.session().config();
    Expect {
        handle,
        options: WaitOptions::new()
            .with_timeout(config.wait_timeout_ms)
            .with_poll_interval(config.poll_interval_ms),
    }
}

/// An expectation bound to a handle, evaluated with retry
#[derive(Debug, Clone, Copy)]
pub struct Expect<'h, 's> {
    handle: &'h Handle<'s>,
    options: WaitOptions,
}

impl Expect<'_, '_> {
    /// Override the retry budget for this expectation
    #[must_use]
    pub fn within(mut self, timeout: Duration) -> Self {
        self.options = self
            .options
            .with_timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Assert the handle eventually resolves to a visible element
    pub async fn to_be_visible(self) -> VitrinaResult<()> {
        let description = format!("{} to be visible", self.handle.selector());
        self.retry(&description, || self.handle.is_visible()).await
    }

    /// Assert the handle eventually resolves to nothing visible
    pub async fn to_be_hidden(self) -> VitrinaResult<()> {
        let description = format!("{} to be hidden", self.handle.selector());
        self.retry(&description, || async {
            Ok(!self.handle.is_visible().await?)
        })
        .await
    }

    /// Assert the match count eventually equals `expected`
    pub async fn to_have_count(self, expected: u64) -> VitrinaResult<()> {
        let description = format!("{} to have count {expected}", self.handle.selector());
        self.retry(&description, || async {
            Ok(self.handle.count().await? == expected)
        })
        .await
    }

    /// Assert the text content eventually contains `needle`
    pub async fn to_contain_text(self, needle: &str) -> VitrinaResult<()> {
        let description = format!("{} to contain {needle:?}", self.handle.selector());
        self.retry(&description, || async {
            Ok(self
                .handle
                .text_content()
                .await?
                .is_some_and(|t| t.contains(needle)))
        })
        .await
    }

    /// Assert the text content eventually matches a case-insensitive pattern
    pub async fn to_match(self, pattern: &str) -> VitrinaResult<()> {
        let regex =
            regex::Regex::new(&format!("(?i){pattern}")).map_err(|e| VitrinaError::Assertion {
                message: format!("invalid pattern {pattern:?}: {e}"),
            })?;
        let description = format!("{} to match /{pattern}/i", self.handle.selector());
        self.retry(&description, || {
            let regex = &regex;
            async move {
                Ok(self
                    .handle
                    .text_content()
                    .await?
                    .is_some_and(|t| regex.is_match(&t)))
            }
        })
        .await
    }

    async fn retry<F, Fut>(&self, description: &str, probe: F) -> VitrinaResult<()>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = VitrinaResult<bool>>,
    {
        match wait_until(&self.options, description, probe).await {
            Ok(_) => Ok(()),
            Err(VitrinaError::Timeout { ms, .. }) => Err(VitrinaError::Assertion {
                message: format!("expected {description} within {ms}ms"),
            }),
            Err(other) => Err(other),
        }
    }
}
