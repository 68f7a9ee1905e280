//! Browser session control.
//!
//! One [`Session`] per scenario: an isolated Chromium instance, a single
//! page, and the dialog watcher armed before any action can run. All
//! navigation flows through [`Session::navigate`] — the one entry point where
//! retry or telemetry policy could later be injected without touching
//! scenarios.

use crate::config::HarnessConfig;
use crate::dialog::DialogWatcher;
use crate::locator::{Handle, Selector};
use crate::result::{VitrinaError, VitrinaResult};
use crate::wait::{wait_until, WaitOptions};
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::cdp::browser_protocol::page::ReloadParams;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Mutex;

/// An isolated browser session driving one scenario.
///
/// The page handle is internally reference-counted and deliberately not
/// wrapped in a lock: dialog resolution must issue CDP commands while an
/// evaluation is suspended by that very dialog.
#[derive(Debug)]
pub struct Session {
    config: HarnessConfig,
    browser: CdpBrowser,
    page: CdpPage,
    dialogs: DialogWatcher,
    current_url: Mutex<String>,
    handler: tokio::task::JoinHandle<()>,
}

impl Session {
    /// Launch a browser and arm the dialog watcher.
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::BrowserLaunch`] if Chromium cannot be started.
    pub async fn launch(config: HarnessConfig) -> VitrinaResult<Self> {
        let mut builder = CdpConfig::builder();

        // chromiumoxide launches headless by default; with_head() opts out.
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(|e| VitrinaError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| VitrinaError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| VitrinaError::Session {
                message: e.to_string(),
            })?;

        // Armed before any navigation or click can be issued, so no dialog
        // can ever fire without a subscriber.
        let dialogs = DialogWatcher::arm(page.clone(), config.poll_interval_ms).await?;

        tracing::info!(target: "vitrina::session", headless = config.headless, "browser session started");

        Ok(Self {
            config,
            browser,
            page,
            dialogs,
            current_url: Mutex::new(String::from("about:blank")),
            handler,
        })
    }

    /// The harness configuration this session runs with
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The dialog watcher for this session
    #[must_use]
    pub const fn dialogs(&self) -> &DialogWatcher {
        &self.dialogs
    }

    /// Bind a selector to this session as a re-resolving handle
    #[must_use]
    pub const fn handle(&self, selector: Selector) -> Handle<'_> {
        Handle::new(self, selector)
    }

    /// Last URL passed through [`Session::navigate`]
    #[must_use]
    pub fn current_url(&self) -> String {
        self.current_url
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }

    /// Perform a full navigation. The single navigation entry point.
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::Navigation`] on transport failure or when the
    /// navigation budget expires.
    pub async fn navigate(&self, url: &str) -> VitrinaResult<()> {
        tracing::info!(target: "vitrina::session", %url, "navigating");
        let nav = self.page.goto(url);
        match tokio::time::timeout(std::time::Duration::from_millis(self.config.nav_timeout_ms), nav)
            .await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(VitrinaError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(VitrinaError::Navigation {
                    url: url.to_string(),
                    message: format!("no load signal within {}ms", self.config.nav_timeout_ms),
                })
            }
        }
        if let Ok(mut current) = self.current_url.lock() {
            *current = url.to_string();
        }
        Ok(())
    }

    /// Reload the current document and wait for it to settle
    pub async fn reload(&self) -> VitrinaResult<()> {
        tracing::debug!(target: "vitrina::session", "reloading");
        self.page
            .execute(ReloadParams::default())
            .await
            .map_err(|e| VitrinaError::Session {
                message: e.to_string(),
            })?;
        // Give the old document a beat to tear down before probing the new one.
        tokio::time::sleep(self.config.poll_interval()).await;
        let options = WaitOptions::new()
            .with_timeout(self.config.nav_timeout_ms)
            .with_poll_interval(self.config.poll_interval_ms);
        wait_until(&options, "document ready after reload", || async {
            let state: String = self.evaluate("document.readyState").await?;
            Ok(state == "complete")
        })
        .await?;
        Ok(())
    }

    /// Evaluate a JavaScript expression and deserialize its result
    pub async fn evaluate<T: DeserializeOwned>(&self, js: &str) -> VitrinaResult<T> {
        let result = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| VitrinaError::Eval {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| VitrinaError::Eval {
            message: e.to_string(),
        })
    }

    /// Evaluate a JavaScript expression without awaiting its completion.
    ///
    /// Used for actions whose synchronous script raises a blocking dialog:
    /// the evaluation cannot return until the dialog is resolved, so the
    /// caller must be free to run the dialog rendezvous meanwhile.
    pub(crate) fn evaluate_detached(&self, js: String) {
        let page = self.page.clone();
        tokio::spawn(async move {
            if let Err(e) = page.evaluate(js).await {
                tracing::debug!(target: "vitrina::session", error = %e, "detached evaluation failed");
            }
        });
    }

    /// Clear cookies and, when a document is loaded, web storage.
    ///
    /// Runs before each scenario body; the isolation backstop is that every
    /// session is a fresh browser instance torn down on drop.
    pub async fn clear_state(&self) -> VitrinaResult<()> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(|e| VitrinaError::Session {
                message: e.to_string(),
            })?;
        // Web storage is origin-scoped and only reachable from a document.
        if self.current_url().starts_with("http") {
            let _: bool = self
                .evaluate(
                    "(() => { try { localStorage.clear(); sessionStorage.clear(); } catch (e) {} return true; })()",
                )
                .await?;
        }
        tracing::debug!(target: "vitrina::session", "session state cleared");
        Ok(())
    }

    /// Close the browser
    pub async fn close(mut self) -> VitrinaResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| VitrinaError::Session {
                message: e.to_string(),
            })?;
        self.handler.abort();
        Ok(())
    }
}
