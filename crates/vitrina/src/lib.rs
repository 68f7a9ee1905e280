//! Vitrina: browser-driven verification harness for the demo storefront.
//!
//! Vitrina drives a real Chromium instance over the Chrome DevTools Protocol
//! and asserts the storefront's business behavior: authentication, catalog
//! browsing, cart arithmetic, checkout and session lifecycle. The hard part
//! is synchronization — modals fade in, native dialogs suspend script
//! execution, listings re-render, totals recompute after network round-trips
//! — so the harness makes every wait contract a structural property of the
//! page abstractions instead of a caller convention.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Scenario (cargo test)                                       │
//! │     │                                                        │
//! │     ▼                                                        │
//! │  Page abstractions ──► Handles ──► Session ──► Chromium/CDP  │
//! │     │                                 ▲                      │
//! │     └── DialogWatcher ────────────────┘                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scenarios construct the page abstractions they need, invoke composite
//! actions, and assert through auto-retrying expectations. Data flows from
//! the storefront's DOM and dialog events into scenario assertions — never
//! the reverse.
//!
//! # Example
//!
//! ```ignore
//! use vitrina::{expect, HarnessConfig, HomePage, LoginModal, Navigable, Session};
//!
//! #[tokio::main]
//! async fn main() -> vitrina::VitrinaResult<()> {
//!     let session = Session::launch(HarnessConfig::from_env()).await?;
//!     let home = HomePage::new(&session);
//!
//!     home.open().await?;
//!     home.open_login_modal().await?;
//!     LoginModal::new(&session).login("username", "password").await?;
//!     expect(&home.welcome_marker()).to_contain_text("username").await?;
//!
//!     session.close().await
//! }
//! ```

#![warn(missing_docs)]

mod assertion;
mod config;
mod dialog;
mod locator;
mod result;
mod session;
mod trace;
mod wait;

/// Page abstractions for the storefront screens
pub mod page;

/// Verification utilities built on the page abstractions
pub mod verify;

pub use assertion::{expect, Expect};
pub use config::{
    HarnessConfig, DEFAULT_BASE_URL, DEFAULT_NAV_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
pub use dialog::{
    CapturedDialog, DialogAction, DialogEvent, DialogKind, DialogPolicy, DialogWatcher,
};
pub use locator::{Handle, Selector};
pub use page::{
    CartPage, HomePage, LineItem, LoginModal, Navigable, OrderDetails, ProductPage, SignupModal,
};
pub use result::{VitrinaError, VitrinaResult};
pub use session::Session;
pub use trace::init as init_tracing;
pub use verify::{expect_defect, logged_out_everywhere, parse_price, CartTotals, OrderConfirmation};
pub use wait::{wait_until, WaitOptions};
