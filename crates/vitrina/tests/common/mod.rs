//! Shared scenario support.
//!
//! Every scenario owns an isolated browser session with its own
//! cookies/storage, cleared before the scenario body runs. Teardown is the
//! browser process teardown on drop, which runs unconditionally — including
//! when a scenario panics mid-flight.

// Each integration test binary compiles this module independently, so not
// every helper is referenced from every binary.
#![allow(dead_code)]

use vitrina::{HarnessConfig, HomePage, Navigable, Session, VitrinaResult};

/// Pre-provisioned storefront account reused across login scenarios.
///
/// This is the one intentional cross-scenario fixture: the account lives in
/// the shared remote application, so these scenarios assume it exists rather
/// than trying to own it.
pub const KNOWN_USERNAME: &str = "username";

/// Password of the pre-provisioned account
pub const KNOWN_PASSWORD: &str = "password";

/// Launch an isolated session and open the storefront with a clean slate
pub async fn start() -> VitrinaResult<Session> {
    vitrina::init_tracing();
    let session = Session::launch(HarnessConfig::from_env()).await?;
    session.clear_state().await?;
    HomePage::new(&session).open().await?;
    // Web storage is origin-scoped; clearing it needs the loaded document.
    session.clear_state().await?;
    Ok(session)
}

/// A username no previous run can have registered
pub fn unique_username() -> String {
    format!("user-{}", uuid::Uuid::new_v4().simple())
}
