//! Result and error types for Vitrina.

use thiserror::Error;

/// Result type for Vitrina operations
pub type VitrinaResult<T> = Result<T, VitrinaError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum VitrinaError {
    /// Browser executable not found or failed to start
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// A CDP command against the session failed
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Navigation failed at the transport level
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A wait contract was not satisfied within its budget
    #[error("Timed out after {ms}ms waiting for {waiting_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waiting_for: String,
    },

    /// A handle resolved to zero nodes or a non-interactable node
    #[error("Element {selector} is not interactable: {message}")]
    NotInteractable {
        /// Selector that failed to resolve
        selector: String,
        /// Error message
        message: String,
    },

    /// A dialog fired with no armed subscriber, or was never resolved
    #[error("Unresolved dialog: {message}")]
    UnresolvedDialog {
        /// Error message
        message: String,
    },

    /// JavaScript evaluation failed
    #[error("Evaluation failed: {message}")]
    Eval {
        /// Error message
        message: String,
    },

    /// A verification utility found a mismatch
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VitrinaError {
    /// True if this error is a wait-contract timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True if this error is fatal to the whole session (not just the step)
    #[must_use]
    pub const fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            Self::BrowserLaunch { .. } | Self::Session { .. } | Self::UnresolvedDialog { .. }
        )
    }
}
