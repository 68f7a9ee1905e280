//! Cart and checkout page.

use super::Navigable;
use crate::locator::{Handle, Selector};
use crate::result::VitrinaResult;
use crate::session::Session;
use crate::verify::parse_price;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One rendered cart row, read fresh from the table — never cached across a
/// reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name as displayed
    pub name: String,
    /// Unit price parsed from the display text (minor-unit-free)
    pub unit_price: u64,
}

/// Checkout form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Buyer name
    pub name: String,
    /// Country
    pub country: String,
    /// City
    pub city: String,
    /// Credit card number
    pub card: String,
    /// Expiry month
    pub month: String,
    /// Expiry year
    pub year: String,
}

/// The cart page: line-item table, total, order modal and confirmation
/// panel.
#[derive(Debug, Clone, Copy)]
pub struct CartPage<'s> {
    session: &'s Session,
}

impl<'s> CartPage<'s> {
    /// Create the page abstraction over a session
    #[must_use]
    pub const fn new(session: &'s Session) -> Self {
        Self { session }
    }

    /// Product-name cells of every cart row
    #[must_use]
    pub fn item_name_cells(&self) -> Handle<'s> {
        self.handle(Selector::css(".success td:nth-child(2)"))
    }

    /// Price cells of every cart row
    #[must_use]
    pub fn price_cells(&self) -> Handle<'s> {
        self.handle(Selector::css(".success td:nth-child(3)"))
    }

    /// Displayed total cell. Empty immediately post-navigation until the
    /// cart recomputes.
    #[must_use]
    pub fn total_cell(&self) -> Handle<'s> {
        self.handle(Selector::css("#totalp"))
    }

    /// The cart row naming a product
    #[must_use]
    pub fn row(&self, product_name: &str) -> Handle<'s> {
        self.handle(Selector::css_with_text("tr.success", product_name))
    }

    /// Place Order button
    #[must_use]
    pub fn place_order_button(&self) -> Handle<'s> {
        self.handle(Selector::css_with_text("button", "Place Order"))
    }

    /// Notice the storefront is expected to show when checkout is attempted
    /// on an empty cart
    #[must_use]
    pub fn empty_cart_notice(&self) -> Handle<'s> {
        self.handle(Selector::css_with_text(".modal-title", "No items in cart"))
    }

    /// Order modal container
    #[must_use]
    pub fn order_modal(&self) -> Handle<'s> {
        self.handle(Selector::css("#orderModal"))
    }

    /// Confirmation panel shown after a successful purchase
    #[must_use]
    pub fn confirmation_panel(&self) -> Handle<'s> {
        self.handle(Selector::css(".sweet-alert"))
    }

    /// Confirmation panel heading
    #[must_use]
    pub fn confirmation_heading(&self) -> Handle<'s> {
        self.handle(Selector::css(".sweet-alert h2"))
    }

    /// Confirmation panel body text
    #[must_use]
    pub fn confirmation_body(&self) -> Handle<'s> {
        self.handle(Selector::css(".sweet-alert p"))
    }

    /// Structural dismiss button of the confirmation panel
    #[must_use]
    pub fn confirmation_confirm_button(&self) -> Handle<'s> {
        self.handle(Selector::css("button.confirm"))
    }

    /// Number of line items currently rendered
    pub async fn items_count(&self) -> VitrinaResult<u64> {
        self.item_name_cells().count().await
    }

    /// Read every rendered line item
    pub async fn line_items(&self) -> VitrinaResult<Vec<LineItem>> {
        let names = self.item_name_cells().text_contents().await?;
        let prices = self.price_cells().text_contents().await?;
        Ok(names
            .into_iter()
            .zip(prices)
            .map(|(name, price)| LineItem {
                name: name.trim().to_string(),
                unit_price: parse_price(&price),
            })
            .collect())
    }

    /// Remove a product's row and block until it is gone from the table
    pub async fn remove_item(&self, product_name: &str) -> VitrinaResult<()> {
        self.handle(Selector::scoped("tr.success", product_name, "a"))
            .click()
            .await?;
        self.row(product_name).wait_until_hidden().await
    }

    /// Open the order modal and block until it is visible before any field
    /// is touched
    pub async fn open_order_modal(&self) -> VitrinaResult<()> {
        self.place_order_button().click().await?;
        self.order_modal().wait_until_visible().await
    }

    /// Fill the order form and submit the purchase.
    ///
    /// The purchase click repaints without a conventional load signal (and
    /// raises a validation alert when the form is incomplete), so it is
    /// detached; subsequent assertions must independently wait for the
    /// confirmation panel.
    pub async fn submit_order(&self, details: &OrderDetails) -> VitrinaResult<()> {
        self.handle(Selector::css("#name")).fill(&details.name).await?;
        self.handle(Selector::css("#country")).fill(&details.country).await?;
        self.handle(Selector::css("#city")).fill(&details.city).await?;
        self.handle(Selector::css("#card")).fill(&details.card).await?;
        self.handle(Selector::css("#month")).fill(&details.month).await?;
        self.handle(Selector::css("#year")).fill(&details.year).await?;
        self.handle(Selector::css_with_text("button", "Purchase"))
            .click_no_wait()
            .await
    }

    /// Dismiss the confirmation panel and block until it is gone
    pub async fn dismiss_confirmation(&self) -> VitrinaResult<()> {
        self.confirmation_confirm_button().click().await?;
        self.confirmation_panel().wait_until_hidden().await
    }

    fn handle(&self, selector: Selector) -> Handle<'s> {
        Handle::new(self.session, selector)
    }
}

#[async_trait]
impl Navigable for CartPage<'_> {
    fn session(&self) -> &Session {
        self.session
    }

    fn path(&self) -> &'static str {
        "/cart.html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_details_default_is_empty() {
        let details = OrderDetails::default();
        assert!(details.name.is_empty());
        assert!(details.card.is_empty());
    }

    #[test]
    fn line_item_equality_is_structural() {
        let a = LineItem {
            name: "Nexus 6".to_string(),
            unit_price: 650,
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
