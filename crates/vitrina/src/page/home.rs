//! Home/catalog page.

use super::product;
use super::Navigable;
use crate::locator::{Handle, Selector};
use crate::result::VitrinaResult;
use crate::session::Session;
use async_trait::async_trait;

/// The storefront landing page: navbar triggers, category list, catalog grid
/// and the contact modal.
#[derive(Debug, Clone, Copy)]
pub struct HomePage<'s> {
    session: &'s Session,
}

impl<'s> HomePage<'s> {
    /// Create the page abstraction over a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Navbar trigger that opens the login modal
    #[must_use]
    pub fn login_trigger(&self) -> Handle<'s> {
        self.handle(Selector::css("#login2"))
    }

    /// Navbar trigger that opens the signup modal
    #[must_use]
    pub fn signup_trigger(&self) -> Handle<'s> {
        self.handle(Selector::css("#signin2"))
    }

    /// Navbar trigger that logs the current user out
    #[must_use]
    pub fn logout_trigger(&self) -> Handle<'s> {
        self.handle(Selector::css("#logout2"))
    }

    /// Logged-in marker (`Welcome username`)
    #[must_use]
    pub fn welcome_marker(&self) -> Handle<'s> {
        self.handle(Selector::css("#nameofuser"))
    }

    /// Every product title link in the catalog grid
    #[must_use]
    pub fn product_titles(&self) -> Handle<'s> {
        self.handle(Selector::css(".card-title a"))
    }

    /// The title link of one product
    #[must_use]
    pub fn product_link(&self, name: &str) -> Handle<'s> {
        self.handle(Selector::css_with_text(".card-title a", name))
    }

    /// One category entry in the sidebar
    #[must_use]
    pub fn category_link(&self, name: &str) -> Handle<'s> {
        self.handle(Selector::css_with_text("a.list-group-item", name))
    }

    /// Navbar trigger that opens the contact modal
    #[must_use]
    pub fn contact_trigger(&self) -> Handle<'s> {
        self.handle(Selector::css_with_text("a.nav-link", "Contact"))
    }

    /// Contact modal container
    #[must_use]
    pub fn contact_modal(&self) -> Handle<'s> {
        self.handle(Selector::css("#exampleModal"))
    }

    /// Open the login modal and block until it is visible.
    ///
    /// The trigger animation is asynchronous; interacting with the modal
    /// fields before the container reports visible hits detached nodes.
    pub async fn open_login_modal(&self) -> VitrinaResult<()> {
        self.login_trigger().click().await?;
        self.handle(Selector::css("#logInModal"))
            .wait_until_visible()
            .await
    }

    /// Open the signup modal and block until it is visible
    pub async fn open_signup_modal(&self) -> VitrinaResult<()> {
        self.signup_trigger().click().await?;
        self.handle(Selector::css("#signInModal"))
            .wait_until_visible()
            .await
    }

    /// Select a category and block until the re-rendered listing shows at
    /// least one catalog entry
    pub async fn select_category(&self, name: &str) -> VitrinaResult<()> {
        self.category_link(name).click().await?;
        self.product_titles().wait_until_visible().await
    }

    /// Open a product's detail page by its catalog title and block until the
    /// detail name renders
    pub async fn select_product(&self, name: &str) -> VitrinaResult<()> {
        self.product_link(name).click().await?;
        self.handle(Selector::css(product::NAME_SELECTOR))
            .wait_until_visible()
            .await
    }

    /// Log out and block until the login trigger is back
    pub async fn log_out(&self) -> VitrinaResult<()> {
        self.logout_trigger().click().await?;
        self.login_trigger().wait_until_visible().await
    }

    /// Send a contact message. The send raises an acknowledgement dialog, so
    /// the final click is detached; arrange dialog handling before calling.
    pub async fn send_contact_message(
        &self,
        email: &str,
        name: &str,
        message: &str,
    ) -> VitrinaResult<()> {
        self.contact_trigger().click().await?;
        self.contact_modal().wait_until_visible().await?;
        self.handle(Selector::css("#recipient-email")).fill(email).await?;
        self.handle(Selector::css("#recipient-name")).fill(name).await?;
        self.handle(Selector::css("#message-text")).fill(message).await?;
        self.handle(Selector::css_with_text("button", "Send message"))
            .click_no_wait()
            .await
    }

    fn handle(&self, selector: Selector) -> Handle<'s> {
        Handle::new(self.session, selector)
    }
}

#[async_trait]
impl Navigable for HomePage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> &'static str {
        "/"
    }
}
