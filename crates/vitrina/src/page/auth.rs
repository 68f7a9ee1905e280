//! Login and signup modals.
//!
//! Both modals are regions of the home document, reached through
//! [`HomePage::open_login_modal`]/[`HomePage::open_signup_modal`] which
//! guarantee the container is visible before these abstractions touch the
//! fields.
//!
//! [`HomePage::open_login_modal`]: super::HomePage::open_login_modal
//! [`HomePage::open_signup_modal`]: super::HomePage::open_signup_modal

use crate::locator::{Handle, Selector};
use crate::result::VitrinaResult;
use crate::session::Session;

/// The login modal
#[derive(Debug, Clone, Copy)]
pub struct LoginModal<'s> {
    session: &'s Session,
}

impl<'s> LoginModal<'s> {
    /// Create the modal abstraction over a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Username field
    #[must_use]
    pub fn username_input(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css("#loginusername"))
    }

    /// Password field
    #[must_use]
    pub fn password_input(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css("#loginpassword"))
    }

    /// Submit button
    #[must_use]
    pub fn submit_button(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css_with_text("button", "Log in"))
    }

    /// Fill the credentials and submit.
    ///
    /// The submit is detached: empty fields raise a validation alert
    /// synchronously from the click handler, and a bad login raises one from
    /// the response callback. Arrange dialog handling before calling; on
    /// success no dialog fires and the caller waits for the welcome marker.
    pub async fn login(&self, username: &str, password: &str) -> VitrinaResult<()> {
        self.username_input().fill(username).await?;
        self.password_input().fill(password).await?;
        self.submit_button().click_no_wait().await
    }
}

/// The signup modal
#[derive(Debug, Clone, Copy)]
pub struct SignupModal<'s> {
    session: &'s Session,
}

impl<'s> SignupModal<'s> {
    /// Create the modal abstraction over a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Username field
    #[must_use]
    pub fn username_input(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css("#sign-username"))
    }

    /// Password field
    #[must_use]
    pub fn password_input(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css("#sign-password"))
    }

    /// Submit button
    #[must_use]
    pub fn submit_button(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css_with_text("button", "Sign up"))
    }

    /// Fill the credentials and submit. Every outcome raises a dialog, so
    /// the click is detached; arrange dialog handling before calling.
    pub async fn sign_up(&self, username: &str, password: &str) -> VitrinaResult<()> {
        self.username_input().fill(username).await?;
        self.password_input().fill(password).await?;
        self.submit_button().click_no_wait().await
    }
}
