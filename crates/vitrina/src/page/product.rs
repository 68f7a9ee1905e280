//! Product detail page.

use crate::locator::{Handle, Selector};
use crate::result::VitrinaResult;
use crate::session::Session;

/// Selector of the product name heading; shared with the catalog's
/// select-product wait contract.
pub(crate) const NAME_SELECTOR: &str = ".name";

/// A product detail page, reached by selecting a product in the catalog.
///
/// Product URLs carry opaque ids, so this screen is not URL-addressable.
#[derive(Debug, Clone, Copy)]
pub struct ProductPage<'s> {
    session: &'s Session,
}

impl<'s> ProductPage<'s> {
    /// Create the page abstraction over a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Product name heading
    #[must_use]
    pub fn name(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css(NAME_SELECTOR))
    }

    /// Price display
    #[must_use]
    pub fn price(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css(".price-container"))
    }

    /// Product image
    #[must_use]
    pub fn image(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css("#imgp img"))
    }

    /// Add-to-cart action link
    #[must_use]
    pub fn add_to_cart_link(&self) -> Handle<'s> {
        Handle::new(self.session, Selector::css_with_text("a", "Add to cart"))
    }

    /// Block until the detail page has rendered its product name
    pub async fn wait_loaded(&self) -> VitrinaResult<()> {
        self.name().wait_until_visible().await
    }

    /// The rendered product name, trimmed
    pub async fn product_name(&self) -> VitrinaResult<String> {
        Ok(self
            .name()
            .text_content()
            .await?
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Add the product to the cart. The storefront acknowledges with an
    /// alert, so the click is detached; arrange dialog handling before
    /// calling.
    pub async fn add_to_cart(&self) -> VitrinaResult<()> {
        self.add_to_cart_link().click_no_wait().await
    }
}
