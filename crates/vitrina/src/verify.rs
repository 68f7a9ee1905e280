//! Verification utilities built on the page abstractions.
//!
//! Price aggregation, session-reset checks, order-confirmation parsing and
//! the known-defect marker. Everything here reads post-settle state through
//! the page abstractions' wait contracts.

use crate::assertion::expect;
use crate::page::{CartPage, HomePage, Navigable};
use crate::result::{VitrinaError, VitrinaResult};
use std::sync::OnceLock;
use std::time::Duration;

/// Parse a displayed price into a minor-unit-free integer.
///
/// The rule is: strip every non-digit character, and an empty remainder is
/// zero — never a parse failure. `"360 *"` parses to `360`, `""` to `0`.
#[must_use]
pub fn parse_price(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Expected-vs-displayed cart total, read post-settle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of the parsed line-item prices
    pub expected: u64,
    /// Parsed value of the displayed total cell
    pub displayed: u64,
}

impl CartTotals {
    /// Aggregate the price cells and read the displayed total.
    ///
    /// The total cell is empty immediately post-navigation while the cart
    /// recomputes, so the read waits (bounded by the session's wait budget)
    /// for it to become non-empty.
    pub async fn read(cart: &CartPage<'_>) -> VitrinaResult<Self> {
        let expected = cart
            .line_items()
            .await?
            .iter()
            .map(|item| item.unit_price)
            .sum();
        let total_text = cart
            .total_cell()
            .wait_for_text(cart.session().config().wait_timeout())
            .await?;
        Ok(Self {
            expected,
            displayed: parse_price(&total_text),
        })
    }

    /// Whether the displayed total matches the aggregated one
    #[must_use]
    pub const fn matches(&self) -> bool {
        self.expected == self.displayed
    }

    /// Fail with an [`VitrinaError::Assertion`] unless the totals match
    pub fn verify(&self) -> VitrinaResult<()> {
        if self.matches() {
            Ok(())
        } else {
            Err(VitrinaError::Assertion {
                message: format!(
                    "cart total mismatch: line items sum to {} but the total cell shows {}",
                    self.expected, self.displayed
                ),
            })
        }
    }
}

/// Assert the logged-out projection at three independent persistence
/// boundaries: the live UI, after a document reload, and after a fresh
/// navigation.
pub async fn logged_out_everywhere(home: &HomePage<'_>) -> VitrinaResult<()> {
    assert_logged_out(home, "after logout").await?;

    home.session().reload().await?;
    assert_logged_out(home, "after reload").await?;

    home.open().await?;
    assert_logged_out(home, "after fresh navigation").await?;

    Ok(())
}

async fn assert_logged_out(home: &HomePage<'_>, boundary: &str) -> VitrinaResult<()> {
    expect(&home.welcome_marker())
        .to_be_hidden()
        .await
        .map_err(|e| annotate(e, boundary))?;
    expect(&home.login_trigger())
        .to_be_visible()
        .await
        .map_err(|e| annotate(e, boundary))?;
    Ok(())
}

fn annotate(err: VitrinaError, boundary: &str) -> VitrinaError {
    match err {
        VitrinaError::Assertion { message } => VitrinaError::Assertion {
            message: format!("{message} ({boundary})"),
        },
        other => other,
    }
}

fn amount_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"(?i)Amount:\s*(\d+)(?:\.\d+)?\s*USD").expect("amount pattern")
    })
}

/// Parsed order confirmation panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Panel heading text
    pub heading: String,
    /// Panel body text
    pub body: String,
}

impl OrderConfirmation {
    /// Build a confirmation from already-captured texts
    #[must_use]
    pub const fn from_parts(heading: String, body: String) -> Self {
        Self { heading, body }
    }

    /// Wait for the confirmation panel and capture its heading and body.
    ///
    /// The purchase click repaints without a load signal, so this wait is
    /// the only synchronization point between submission and confirmation.
    pub async fn read(cart: &CartPage<'_>, timeout: Duration) -> VitrinaResult<Self> {
        cart.confirmation_panel()
            .wait_until_visible_for(
                &crate::wait::WaitOptions::new()
                    .with_timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
                    .with_poll_interval(cart.session().config().poll_interval_ms),
            )
            .await?;
        let heading = cart
            .confirmation_heading()
            .text_content()
            .await?
            .unwrap_or_default();
        let body = cart.confirmation_body().text_content().await?.unwrap_or_default();
        Ok(Self::from_parts(heading, body))
    }

    /// Whether the body names an amount with a USD suffix
    #[must_use]
    pub fn mentions_amount_usd(&self) -> bool {
        amount_regex().is_match(&self.body)
    }

    /// The integer amount named in the body, if any
    #[must_use]
    pub fn amount(&self) -> Option<u64> {
        amount_regex()
            .captures(&self.body)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Whether the body names the submitted buyer
    #[must_use]
    pub fn names(&self, buyer: &str) -> bool {
        let pattern = format!(r"(?i)Name:\s*{}", regex::escape(buyer));
        regex::Regex::new(&pattern).is_ok_and(|re| re.is_match(&self.body))
    }

    /// Case-insensitive pattern match on the heading
    #[must_use]
    pub fn heading_matches(&self, pattern: &str) -> bool {
        regex::Regex::new(&format!("(?i){pattern}")).is_ok_and(|re| re.is_match(&self.heading))
    }
}

/// Expected-failure marker for scenarios documenting a known application
/// defect.
///
/// The scenario stays green while the defect persists and fails loudly the
/// moment the application starts honoring the intended behavior, so the
/// discrepancy is never silently skipped.
pub fn expect_defect(label: &str, outcome: VitrinaResult<()>) -> VitrinaResult<()> {
    match outcome {
        Err(err) => {
            tracing::info!(target: "vitrina::verify", %label, %err, "known defect still present");
            Ok(())
        }
        Ok(()) => Err(VitrinaError::Assertion {
            message: format!("known defect {label:?} appears fixed; update the scenario"),
        }),
    }
}
