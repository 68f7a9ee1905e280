//! Dialog interception protocol.
//!
//! The storefront raises blocking native dialogs (login failure, signup
//! result, cart-add confirmation, contact-form submission). An unhandled
//! dialog suspends every further automation command, so the CDP listener is
//! armed once at session launch — before any action can possibly trigger one
//! — and every captured dialog must be resolved exactly once.
//!
//! Two consumption modes:
//!
//! - **awaited one-shot** ([`DialogWatcher::next`]): the caller issues a
//!   detached triggering action, awaits the next event, inspects the message
//!   and resolves it. Used when the triggering call site is known.
//! - **persistent policy** ([`DialogWatcher::set_policy`]): the listener
//!   resolves each dialog immediately and records it; the caller awaits the
//!   capture with [`DialogWatcher::wait_for_message`]. Used for validation
//!   dialogs with less predictable call paths.

use crate::result::{VitrinaError, VitrinaResult};
use crate::wait::{wait_until, WaitOptions};
use chromiumoxide::cdp::browser_protocol::page::{
    DialogType, EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Capacity of the pending-dialog buffer.
///
/// The storefront raises at most one dialog per user action; the buffer only
/// needs to absorb the window between the event firing and the scenario
/// awaiting it.
const DIALOG_BUFFER: usize = 8;

/// Kind of native dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogKind {
    /// Alert dialog (OK button only)
    Alert,
    /// Confirm dialog (OK/Cancel buttons)
    Confirm,
    /// Prompt dialog (text input + OK/Cancel)
    Prompt,
    /// Before-unload dialog (Leave/Stay buttons)
    BeforeUnload,
}

impl std::fmt::Display for DialogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Confirm => write!(f, "confirm"),
            Self::Prompt => write!(f, "prompt"),
            Self::BeforeUnload => write!(f, "beforeunload"),
        }
    }
}

impl From<&DialogType> for DialogKind {
    fn from(kind: &DialogType) -> Self {
        match kind {
            DialogType::Alert => Self::Alert,
            DialogType::Confirm => Self::Confirm,
            DialogType::Prompt => Self::Prompt,
            DialogType::Beforeunload => Self::BeforeUnload,
        }
    }
}

/// How a dialog was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Dialog was accepted (OK)
    Accepted,
    /// Dialog was dismissed (Cancel)
    Dismissed,
}

/// Automatic resolution policy for the persistent handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialogPolicy {
    /// Queue dialogs for one-shot consumption (default)
    #[default]
    Manual,
    /// Accept every dialog and record its message
    AcceptAll,
    /// Dismiss every dialog and record its message
    DismissAll,
}

impl DialogPolicy {
    /// The resolution this policy applies, if any
    #[must_use]
    pub const fn resolution(&self) -> Option<DialogAction> {
        match self {
            Self::Manual => None,
            Self::AcceptAll => Some(DialogAction::Accepted),
            Self::DismissAll => Some(DialogAction::Dismissed),
        }
    }
}

/// A dialog resolved by the persistent handler, kept in scenario history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedDialog {
    /// Kind of dialog
    pub kind: DialogKind,
    /// Message displayed in the dialog
    pub message: String,
    /// How it was resolved
    pub action: DialogAction,
}

impl CapturedDialog {
    /// Exact substring match on the message
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }

    /// Case-insensitive pattern match on the message
    pub fn matches(&self, pattern: &str) -> VitrinaResult<bool> {
        message_matches(&self.message, pattern)
    }
}

/// An ephemeral, at-most-once-observed dialog event.
///
/// Resolution consumes the event, so accepting or dismissing twice is
/// unrepresentable. A manual event that is dropped unresolved leaves the
/// session wedged; the drop is logged to make the stall diagnosable.
#[derive(Debug)]
pub struct DialogEvent {
    kind: DialogKind,
    message: String,
    page: Option<CdpPage>,
}

impl DialogEvent {
    pub(crate) const fn pending(kind: DialogKind, message: String, page: Option<CdpPage>) -> Self {
        Self {
            kind,
            message,
            page,
        }
    }

    /// Kind of dialog
    #[must_use]
    pub const fn kind(&self) -> DialogKind {
        self.kind
    }

    /// Message displayed in the dialog
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Exact substring match on the message
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }

    /// Case-insensitive pattern match on the message
    pub fn matches(&self, pattern: &str) -> VitrinaResult<bool> {
        message_matches(&self.message, pattern)
    }

    /// Accept the dialog (OK), unblocking the session
    pub async fn accept(mut self) -> VitrinaResult<()> {
        self.resolve(true).await
    }

    /// Dismiss the dialog (Cancel), unblocking the session
    pub async fn dismiss(mut self) -> VitrinaResult<()> {
        self.resolve(false).await
    }

    async fn resolve(&mut self, accept: bool) -> VitrinaResult<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };
        tracing::debug!(target: "vitrina::dialog", kind = %self.kind, accept, "resolving dialog");
        resolve_on_page(&page, accept).await
    }
}

impl Drop for DialogEvent {
    fn drop(&mut self) {
        if self.page.is_some() {
            tracing::warn!(
                target: "vitrina::dialog",
                kind = %self.kind,
                message = %self.message,
                "dialog event dropped unresolved; the session will stall until it is handled"
            );
        }
    }
}

/// Persistent dialog subscription for one session.
///
/// Armed during session launch, so the subscribe-before-trigger ordering is
/// structural: no action issued through the session can precede the
/// listener.
#[derive(Debug)]
pub struct DialogWatcher {
    pending: tokio::sync::Mutex<mpsc::Receiver<DialogEvent>>,
    policy: Arc<Mutex<DialogPolicy>>,
    captured: Arc<Mutex<Vec<CapturedDialog>>>,
    poll_interval_ms: u64,
}

impl DialogWatcher {
    /// Arm the watcher on a page, spawning the listener task
    pub(crate) async fn arm(page: CdpPage, poll_interval_ms: u64) -> VitrinaResult<Self> {
        let mut events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(|e| VitrinaError::Session {
                message: format!("failed to subscribe to dialog events: {e}"),
            })?;

        let policy = Arc::new(Mutex::new(DialogPolicy::default()));
        let captured = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::channel(DIALOG_BUFFER);

        let task_policy = Arc::clone(&policy);
        let task_captured = Arc::clone(&captured);
        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let kind = DialogKind::from(&event.r#type);
                let message = event.message.clone();
                tracing::debug!(target: "vitrina::dialog", %kind, %message, "dialog opened");

                let policy = task_policy.lock().map(|p| *p).unwrap_or_default();
                match policy.resolution() {
                    None => {
                        let pending = DialogEvent::pending(kind, message, Some(page.clone()));
                        if tx.send(pending).await.is_err() {
                            break;
                        }
                    }
                    Some(action) => {
                        let accept = action == DialogAction::Accepted;
                        if let Err(e) = resolve_on_page(&page, accept).await {
                            tracing::warn!(target: "vitrina::dialog", error = %e, "auto-resolution failed");
                        }
                        if let Ok(mut history) = task_captured.lock() {
                            history.push(CapturedDialog {
                                kind,
                                message,
                                action,
                            });
                        }
                    }
                }
            }
            tracing::trace!(target: "vitrina::dialog", "dialog listener finished");
        });

        Ok(Self {
            pending: tokio::sync::Mutex::new(rx),
            policy,
            captured,
            poll_interval_ms,
        })
    }

    /// Await the next queued dialog event (one-shot consumption).
    ///
    /// The returned event must be resolved with [`DialogEvent::accept`] or
    /// [`DialogEvent::dismiss`] before further automation commands can run.
    ///
    /// # Errors
    ///
    /// [`VitrinaError::Timeout`] if no dialog fires in time;
    /// [`VitrinaError::UnresolvedDialog`] if the listener has shut down.
    pub async fn next(&self, timeout: Duration) -> VitrinaResult<DialogEvent> {
        let mut pending = self.pending.lock().await;
        match tokio::time::timeout(timeout, pending.recv()).await {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(VitrinaError::UnresolvedDialog {
                message: "dialog listener is no longer running".to_string(),
            }),
            Err(_) => Err(VitrinaError::Timeout {
                ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                waiting_for: "next dialog".to_string(),
            }),
        }
    }

    /// Set the persistent resolution policy
    pub fn set_policy(&self, policy: DialogPolicy) {
        if let Ok(mut current) = self.policy.lock() {
            *current = policy;
        }
    }

    /// Current resolution policy
    #[must_use]
    pub fn policy(&self) -> DialogPolicy {
        self.policy.lock().map(|p| *p).unwrap_or_default()
    }

    /// Dialogs resolved by the persistent handler so far
    #[must_use]
    pub fn captured(&self) -> Vec<CapturedDialog> {
        self.captured.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Message of the most recently captured dialog
    #[must_use]
    pub fn last_message(&self) -> Option<String> {
        self.captured
            .lock()
            .ok()
            .and_then(|c| c.last().map(|d| d.message.clone()))
    }

    /// Clear the captured-dialog history
    pub fn clear_captured(&self) {
        if let Ok(mut history) = self.captured.lock() {
            history.clear();
        }
    }

    /// Await the next dialog captured by the persistent handler, returning
    /// its message.
    ///
    /// Only captures recorded after this call starts are considered, so
    /// history from earlier steps cannot satisfy the wait.
    pub async fn wait_for_message(&self, timeout: Duration) -> VitrinaResult<String> {
        let baseline = self.captured.lock().map(|c| c.len()).unwrap_or(0);
        let options = WaitOptions::new()
            .with_timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
            .with_poll_interval(self.poll_interval_ms);
        wait_until(&options, "captured dialog", || async {
            Ok(self.captured.lock().map(|c| c.len()).unwrap_or(0) > baseline)
        })
        .await?;
        self.last_message().ok_or_else(|| VitrinaError::UnresolvedDialog {
            message: "captured dialog disappeared from history".to_string(),
        })
    }

    #[cfg(test)]
    fn for_tests() -> (Self, mpsc::Sender<DialogEvent>) {
        let (tx, rx) = mpsc::channel(DIALOG_BUFFER);
        let watcher = Self {
            pending: tokio::sync::Mutex::new(rx),
            policy: Arc::new(Mutex::new(DialogPolicy::default())),
            captured: Arc::new(Mutex::new(Vec::new())),
            poll_interval_ms: 5,
        };
        (watcher, tx)
    }

    #[cfg(test)]
    fn record_for_tests(&self, dialog: CapturedDialog) {
        if let Ok(mut history) = self.captured.lock() {
            history.push(dialog);
        }
    }
}

async fn resolve_on_page(page: &CdpPage, accept: bool) -> VitrinaResult<()> {
    let params = HandleJavaScriptDialogParams::builder()
        .accept(accept)
        .build()
        .map_err(|e| VitrinaError::Session {
            message: e.to_string(),
        })?;
    page.execute(params)
        .await
        .map_err(|e| VitrinaError::Session {
            message: format!("failed to resolve dialog: {e}"),
        })?;
    Ok(())
}

fn message_matches(message: &str, pattern: &str) -> VitrinaResult<bool> {
    let regex = regex::Regex::new(&format!("(?i){pattern}")).map_err(|e| {
        VitrinaError::Assertion {
            message: format!("invalid dialog pattern {pattern:?}: {e}"),
        }
    })?;
    Ok(regex.is_match(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(message: &str) -> DialogEvent {
        DialogEvent::pending(DialogKind::Alert, message.to_string(), None)
    }

    mod kind_tests {
        use super::*;

        #[test]
        fn display_names() {
            assert_eq!(DialogKind::Alert.to_string(), "alert");
            assert_eq!(DialogKind::Confirm.to_string(), "confirm");
            assert_eq!(DialogKind::Prompt.to_string(), "prompt");
            assert_eq!(DialogKind::BeforeUnload.to_string(), "beforeunload");
        }

        #[test]
        fn cdp_kinds_map_across() {
            assert_eq!(DialogKind::from(&DialogType::Alert), DialogKind::Alert);
            assert_eq!(DialogKind::from(&DialogType::Confirm), DialogKind::Confirm);
            assert_eq!(DialogKind::from(&DialogType::Prompt), DialogKind::Prompt);
            assert_eq!(
                DialogKind::from(&DialogType::Beforeunload),
                DialogKind::BeforeUnload
            );
        }
    }

    mod message_tests {
        use super::*;

        #[test]
        fn contains_is_exact_substring() {
            let event = alert("User does not exist.");
            assert!(event.contains("User does not exist."));
            assert!(!event.contains("user does not exist."));
        }

        #[test]
        fn matches_is_case_insensitive() {
            let event = alert("Product added");
            assert!(event.matches("product added").unwrap());
            assert!(event.matches(r"Product\s+added").unwrap());
            assert!(!event.matches("removed").unwrap());
        }

        #[test]
        fn invalid_pattern_is_an_error() {
            let event = alert("whatever");
            assert!(event.matches("(unclosed").is_err());
        }

        #[test]
        fn captured_dialog_matching() {
            let captured = CapturedDialog {
                kind: DialogKind::Alert,
                message: "Sign up successful.".to_string(),
                action: DialogAction::Dismissed,
            };
            assert!(captured.contains("Sign up successful."));
            assert!(captured.matches("sign up").unwrap());
        }
    }

    mod policy_tests {
        use super::*;

        #[test]
        fn default_policy_is_manual() {
            assert_eq!(DialogPolicy::default(), DialogPolicy::Manual);
            assert_eq!(DialogPolicy::Manual.resolution(), None);
        }

        #[test]
        fn auto_policies_resolve() {
            assert_eq!(
                DialogPolicy::AcceptAll.resolution(),
                Some(DialogAction::Accepted)
            );
            assert_eq!(
                DialogPolicy::DismissAll.resolution(),
                Some(DialogAction::Dismissed)
            );
        }
    }

    mod watcher_tests {
        use super::*;

        #[tokio::test]
        async fn next_delivers_queued_events_in_order() {
            let (watcher, tx) = DialogWatcher::for_tests();
            tx.send(alert("first")).await.unwrap();
            tx.send(alert("second")).await.unwrap();

            let first = watcher.next(Duration::from_millis(100)).await.unwrap();
            assert_eq!(first.message(), "first");
            let second = watcher.next(Duration::from_millis(100)).await.unwrap();
            assert_eq!(second.message(), "second");
        }

        #[tokio::test]
        async fn next_times_out_when_no_dialog_fires() {
            let (watcher, _tx) = DialogWatcher::for_tests();
            let err = watcher.next(Duration::from_millis(20)).await.unwrap_err();
            assert!(err.is_timeout());
        }

        #[tokio::test]
        async fn next_reports_closed_listener() {
            let (watcher, tx) = DialogWatcher::for_tests();
            drop(tx);
            let err = watcher.next(Duration::from_millis(20)).await.unwrap_err();
            assert!(matches!(err, VitrinaError::UnresolvedDialog { .. }));
        }

        #[tokio::test]
        async fn resolution_without_a_page_consumes_the_event() {
            let (watcher, tx) = DialogWatcher::for_tests();
            tx.send(alert("done")).await.unwrap();
            let event = watcher.next(Duration::from_millis(100)).await.unwrap();
            event.accept().await.unwrap();
        }

        #[test]
        fn set_policy_round_trips() {
            let (watcher, _tx) = DialogWatcher::for_tests();
            watcher.set_policy(DialogPolicy::AcceptAll);
            assert_eq!(watcher.policy(), DialogPolicy::AcceptAll);
        }

        #[tokio::test]
        async fn wait_for_message_ignores_earlier_captures() {
            let (watcher, _tx) = DialogWatcher::for_tests();
            watcher.record_for_tests(CapturedDialog {
                kind: DialogKind::Alert,
                message: "stale".to_string(),
                action: DialogAction::Accepted,
            });

            let err = watcher
                .wait_for_message(Duration::from_millis(20))
                .await
                .unwrap_err();
            assert!(err.is_timeout());

            let (message, ()) = tokio::join!(
                watcher.wait_for_message(Duration::from_millis(500)),
                async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    watcher.record_for_tests(CapturedDialog {
                        kind: DialogKind::Alert,
                        message: "Thanks for the message!!".to_string(),
                        action: DialogAction::Dismissed,
                    });
                }
            );
            assert_eq!(message.unwrap(), "Thanks for the message!!");
        }

        #[test]
        fn captured_history_accessors() {
            let (watcher, _tx) = DialogWatcher::for_tests();
            assert!(watcher.captured().is_empty());
            assert!(watcher.last_message().is_none());

            watcher.record_for_tests(CapturedDialog {
                kind: DialogKind::Confirm,
                message: "Please fill out Username and Password.".to_string(),
                action: DialogAction::Dismissed,
            });
            assert_eq!(watcher.captured().len(), 1);
            assert_eq!(
                watcher.last_message().as_deref(),
                Some("Please fill out Username and Password.")
            );

            watcher.clear_captured();
            assert!(watcher.captured().is_empty());
        }
    }
}
