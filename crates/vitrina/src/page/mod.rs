//! Page abstractions for the storefront.
//!
//! Each page type encapsulates the element handles and composite actions of
//! one logical screen. Scenarios never touch raw selectors — every lookup
//! flows through a declared handle, and every composite action carries its
//! own wait contract, so scenario code reads as a plain sequence of user
//! intentions.
//!
//! Navigation is a capability, not a base class: [`Navigable`] is implemented
//! by the URL-addressable screens (home, cart) and routes through the single
//! [`Session::navigate`] entry point. Screens reached by interaction (product
//! detail, modals) do not claim it.

use crate::result::VitrinaResult;
use crate::session::Session;
use async_trait::async_trait;

mod auth;
mod cart;
mod home;
mod product;

pub use auth::{LoginModal, SignupModal};
pub use cart::{CartPage, LineItem, OrderDetails};
pub use home::HomePage;
pub use product::ProductPage;

/// Capability of screens that can be opened by URL
#[async_trait]
pub trait Navigable {
    /// The session this page drives
    fn session(&self) -> &Session;

    /// Path of this screen relative to the storefront base URL
    fn path(&self) -> &'static str;

    /// Navigate to this screen through the session's navigation entry point
    async fn open(&self) -> VitrinaResult<()> {
        let url = self.session().config().page_url(self.path());
        self.session().navigate(&url).await
    }
}
