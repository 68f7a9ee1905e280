//! Locator abstraction: declarative selectors and re-resolving handles.
//!
//! A [`Selector`] describes *how* to find elements; a [`Handle`] binds one to
//! a live session. Handles never snapshot node identity — every operation
//! compiles the selector to a JavaScript query and evaluates it against the
//! current document, so a handle stays valid across re-renders and reloads.

use crate::result::{VitrinaError, VitrinaResult};
use crate::session::Session;
use crate::wait::{wait_until, WaitOptions};
use std::time::Duration;

/// Declarative locator for elements in the storefront DOM.
///
/// Semantic selectors (ids, text content) are preferred over positional ones:
/// the storefront's stable attributes and button copy are the interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g. `#login2`, `.card-title a`)
    Css(String),
    /// Any element whose text content contains the given string
    Text(String),
    /// CSS selector narrowed to elements whose text contains the given string
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
    /// Descendant lookup inside the first text-matching container.
    ///
    /// Used for per-row actions in tables, e.g. the Delete link of the cart
    /// row that names a product.
    Scoped {
        /// CSS selector for the containers
        scope_css: String,
        /// Text content the container must include
        scope_text: String,
        /// CSS selector resolved inside the matched container
        inner_css: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a CSS selector for an element id
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Css(format!("#{}", id.into()))
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a CSS selector filtered by text content
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Create a scoped descendant selector
    #[must_use]
    pub fn scoped(
        scope_css: impl Into<String>,
        scope_text: impl Into<String>,
        inner_css: impl Into<String>,
    ) -> Self {
        Self::Scoped {
            scope_css: scope_css.into(),
            scope_text: scope_text.into(),
            inner_css: inner_css.into(),
        }
    }

    /// Compile to a JavaScript expression yielding the first match (or a
    /// falsy value when nothing matches)
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).find(el => el.textContent.includes({t:?}))"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).find(el => el.textContent.includes({text:?}))"
            ),
            Self::Scoped {
                scope_css,
                scope_text,
                inner_css,
            } => format!(
                "(() => {{ const scope = Array.from(document.querySelectorAll({scope_css:?})).find(el => el.textContent.includes({scope_text:?})); return scope ? scope.querySelector({inner_css:?}) : null; }})()"
            ),
        }
    }

    /// Compile to a JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).filter(el => el.textContent.includes({t:?})).length"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).length"
            ),
            Self::Scoped {
                scope_css,
                scope_text,
                inner_css,
            } => format!(
                "(() => {{ const scope = Array.from(document.querySelectorAll({scope_css:?})).find(el => el.textContent.includes({scope_text:?})); return scope ? scope.querySelectorAll({inner_css:?}).length : 0; }})()"
            ),
        }
    }

    /// Compile to a JavaScript expression yielding every match's text content
    #[must_use]
    pub fn to_texts_query(&self) -> String {
        match self {
            Self::Css(s) => format!(
                "Array.from(document.querySelectorAll({s:?})).map(el => el.textContent)"
            ),
            Self::Text(t) => format!(
                "Array.from(document.querySelectorAll('*')).filter(el => el.textContent.includes({t:?})).map(el => el.textContent)"
            ),
            Self::CssWithText { css, text } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).map(el => el.textContent)"
            ),
            Self::Scoped {
                scope_css,
                scope_text,
                inner_css,
            } => format!(
                "(() => {{ const scope = Array.from(document.querySelectorAll({scope_css:?})).find(el => el.textContent.includes({scope_text:?})); return scope ? Array.from(scope.querySelectorAll({inner_css:?})).map(el => el.textContent) : []; }})()"
            ),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::Text(t) => write!(f, "text={t}"),
            Self::CssWithText { css, text } => write!(f, "{css}:has-text({text:?})"),
            Self::Scoped {
                scope_css,
                scope_text,
                inner_css,
            } => write!(f, "{scope_css}:has-text({scope_text:?}) >> {inner_css}"),
        }
    }
}

/// A live, re-resolving reference to the elements a selector matches.
///
/// Owned by the page abstraction that declares it; re-resolves on every
/// interaction, so two reads without intervening mutations agree.
#[derive(Debug, Clone)]
pub struct Handle<'s> {
    session: &'s Session,
    selector: Selector,
}

impl<'s> Handle<'s> {
    pub(crate) const fn new(session: &'s Session, selector: Selector) -> Self {
        Self { session, selector }
    }

    /// The selector this handle resolves
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    pub(crate) const fn session(&self) -> &'s Session {
        self.session
    }

    /// Number of elements currently matching
    pub async fn count(&self) -> VitrinaResult<u64> {
        self.session.evaluate(&self.selector.to_count_query()).await
    }

    /// Whether at least one element currently matches
    pub async fn exists(&self) -> VitrinaResult<bool> {
        let js = format!("Boolean({})", self.selector.to_query());
        self.session.evaluate(&js).await
    }

    /// Whether the first match is attached and rendered.
    ///
    /// Present, not `display: none`/`visibility: hidden`, and with a
    /// non-empty box — an attached but empty inline element (the logged-out
    /// welcome marker) counts as hidden.
    pub async fn is_visible(&self) -> VitrinaResult<bool> {
        let js = format!(
            "(() => {{ const el = {}; if (!el) return false; const cs = window.getComputedStyle(el); if (cs.display === 'none' || cs.visibility === 'hidden') return false; const box = el.getBoundingClientRect(); return box.width > 0 && box.height > 0; }})()",
            self.selector.to_query()
        );
        self.session.evaluate(&js).await
    }

    /// Text content of the first match, if any
    pub async fn text_content(&self) -> VitrinaResult<Option<String>> {
        let js = format!(
            "(() => {{ const el = {}; return el ? el.textContent : null; }})()",
            self.selector.to_query()
        );
        self.session.evaluate(&js).await
    }

    /// Text content of every match
    pub async fn text_contents(&self) -> VitrinaResult<Vec<String>> {
        self.session.evaluate(&self.selector.to_texts_query()).await
    }

    /// Click the first match.
    ///
    /// The click is dispatched in the page and awaited; use
    /// [`Handle::click_no_wait`] for actions that raise a blocking dialog.
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::NotInteractable`] if nothing matches.
    pub async fn click(&self) -> VitrinaResult<()> {
        let js = format!(
            "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
            self.selector.to_query()
        );
        let clicked: bool = self.session.evaluate(&js).await?;
        if clicked {
            tracing::debug!(target: "vitrina::locator", selector = %self.selector, "clicked");
            Ok(())
        } else {
            Err(self.not_interactable("no matching element to click"))
        }
    }

    /// Click the first match without awaiting script completion.
    ///
    /// A dialog raised synchronously from the click handler suspends the
    /// page's script, which would also suspend an awaited click. The
    /// interactability probe runs attached; the click itself is issued
    /// detached so the caller can proceed to the dialog rendezvous.
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::NotInteractable`] if nothing matches at the
    /// time of the probe.
    pub async fn click_no_wait(&self) -> VitrinaResult<()> {
        if !self.exists().await? {
            return Err(self.not_interactable("no matching element to click"));
        }
        let js = format!(
            "(() => {{ const el = {}; if (el) el.click(); }})()",
            self.selector.to_query()
        );
        tracing::debug!(target: "vitrina::locator", selector = %self.selector, "clicking detached");
        self.session.evaluate_detached(js);
        Ok(())
    }

    /// Fill the first match with a value, firing `input`/`change` events
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::NotInteractable`] if nothing matches.
    pub async fn fill(&self, value: &str) -> VitrinaResult<()> {
        let js = format!(
            "(() => {{ const el = {}; if (!el) return false; el.focus(); el.value = {value:?}; el.dispatchEvent(new Event('input', {{ bubbles: true }})); el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()",
            self.selector.to_query()
        );
        let filled: bool = self.session.evaluate(&js).await?;
        if filled {
            Ok(())
        } else {
            Err(self.not_interactable("no matching element to fill"))
        }
    }

    /// Block until the first match is visible, with the session's default
    /// wait budget
    pub async fn wait_until_visible(&self) -> VitrinaResult<()> {
        self.wait_until_visible_for(&self.default_wait()).await
    }

    /// Block until the first match is visible, with an explicit budget
    pub async fn wait_until_visible_for(&self, options: &WaitOptions) -> VitrinaResult<()> {
        let waiting_for = format!("{} visible", self.selector);
        wait_until(options, &waiting_for, || self.is_visible()).await?;
        Ok(())
    }

    /// Block until no match is visible (hidden or absent)
    pub async fn wait_until_hidden(&self) -> VitrinaResult<()> {
        let waiting_for = format!("{} hidden", self.selector);
        wait_until(&self.default_wait(), &waiting_for, || async {
            Ok(!self.is_visible().await?)
        })
        .await?;
        Ok(())
    }

    /// Block until the first match's text content is non-empty, returning it
    pub async fn wait_for_text(&self, timeout: Duration) -> VitrinaResult<String> {
        let options = self
            .default_wait()
            .with_timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        let waiting_for = format!("{} non-empty text", self.selector);
        wait_until(&options, &waiting_for, || async {
            Ok(self
                .text_content()
                .await?
                .is_some_and(|t| !t.trim().is_empty()))
        })
        .await?;
        Ok(self.text_content().await?.unwrap_or_default())
    }

    fn default_wait(&self) -> WaitOptions {
        let config = self.session.config();
        WaitOptions::new()
            .with_timeout(config.wait_timeout_ms)
            .with_poll_interval(config.poll_interval_ms)
    }

    fn not_interactable(&self, message: &str) -> VitrinaError {
        VitrinaError::NotInteractable {
            selector: self.selector.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn css_query() {
            let query = Selector::css("#login2").to_query();
            assert!(query.contains("querySelector"));
            assert!(query.contains("#login2"));
        }

        #[test]
        fn id_is_css_sugar() {
            assert_eq!(Selector::id("totalp"), Selector::css("#totalp"));
        }

        #[test]
        fn text_query_scans_text_content() {
            let query = Selector::text("Phones").to_query();
            assert!(query.contains("textContent"));
            assert!(query.contains("Phones"));
        }

        #[test]
        fn css_with_text_narrows_by_text() {
            let query = Selector::css_with_text("a.list-group-item", "Laptops").to_query();
            assert!(query.contains("a.list-group-item"));
            assert!(query.contains("Laptops"));
            assert!(query.contains("find"));
        }

        #[test]
        fn scoped_query_resolves_inside_the_container() {
            let query = Selector::scoped("tr.success", "Nexus 6", "a").to_query();
            assert!(query.contains("tr.success"));
            assert!(query.contains("Nexus 6"));
            assert!(query.contains("scope.querySelector"));
            assert!(query.contains("null"));
        }

        #[test]
        fn count_queries_return_lengths() {
            assert!(Selector::css(".card-title a")
                .to_count_query()
                .contains(".length"));
            assert!(Selector::css_with_text("tr", "Nexus 6")
                .to_count_query()
                .contains("filter"));
            assert!(Selector::scoped(".success", "x", "td")
                .to_count_query()
                .contains("querySelectorAll"));
        }

        #[test]
        fn texts_queries_map_text_content() {
            let query = Selector::css(".success td:nth-child(3)").to_texts_query();
            assert!(query.contains("map(el => el.textContent)"));
        }

        #[test]
        fn quotes_in_text_filters_are_escaped() {
            let query = Selector::text("it's \"quoted\"").to_query();
            assert!(query.contains("\\\"quoted\\\""));
        }

        #[test]
        fn display_is_reader_friendly() {
            assert_eq!(Selector::css("#cartur").to_string(), "#cartur");
            assert_eq!(Selector::text("Log in").to_string(), "text=Log in");
            assert_eq!(
                Selector::css_with_text("button", "Place Order").to_string(),
                "button:has-text(\"Place Order\")"
            );
            assert_eq!(
                Selector::scoped("tr.success", "Nexus 6", "a").to_string(),
                "tr.success:has-text(\"Nexus 6\") >> a"
            );
        }
    }
}
