//! Browser session capability used by the scraper.
//!
//! The pipeline never talks to a concrete driver. It drives a
//! [`BrowserSession`], which exposes navigation, bounded waits for elements,
//! and element interaction. [`webdriver::WebDriverSession`] implements it over
//! a WebDriver endpoint; tests use an in-memory page.
//!
//! # Element lookups
//!
//! Elements are addressed with a [`Locator`]. Lookups come in two flavours:
//!
//! | Method | Behaviour when nothing matches |
//! |--------|--------------------------------|
//! | [`BrowserSession::wait_until_clickable`] | polls until the timeout, then [`BrowserError::Timeout`] |
//! | [`BrowserSession::wait_until_present`] | polls until the timeout, then [`BrowserError::Timeout`] |
//! | [`BrowserSession::find_in`] | fails at once with [`BrowserError::NoSuchElement`] |
//! | [`BrowserSession::find_all_in`] | returns an empty list |

use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[cfg(test)]
pub mod fake;
pub mod webdriver;

/// How to find an element on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    ClassName(String),
    Tag(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    pub fn class_name(name: &str) -> Self {
        Locator::ClassName(name.to_string())
    }

    pub fn tag(name: &str) -> Self {
        Locator::Tag(name.to_string())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::ClassName(s) => write!(f, "class `{s}`"),
            Locator::Tag(s) => write!(f, "tag `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// Errors that can occur while driving the browser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrowserError {
    #[error("timed out after {timeout:?} waiting for {locator}")]
    Timeout { locator: String, timeout: Duration },

    #[error("element not found: {0}")]
    NoSuchElement(String),

    /// A previously located element no longer belongs to the page.
    #[error("stale element reference: the page changed while it was being read")]
    StaleElement,

    #[error("browser driver error: {0}")]
    Driver(String),
}

/// A controllable browser tab.
///
/// All methods take `&self`; a session is owned by exactly one pipeline run
/// and is released with [`BrowserSession::close`].
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    /// Handle to an element on the current page.
    type Element;

    /// Load `url` in the tab.
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Wait up to `timeout` for an element that is displayed and enabled.
    async fn wait_until_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Self::Element, BrowserError>;

    /// Wait up to `timeout` for an element to exist in the DOM.
    async fn wait_until_present(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Self::Element, BrowserError>;

    /// Find the first descendant of `parent` matching `locator`.
    async fn find_in(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Self::Element, BrowserError>;

    /// Find every descendant of `parent` matching `locator`, in document order.
    async fn find_all_in(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>, BrowserError>;

    async fn click(&self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Type `text` into the element.
    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<(), BrowserError>;

    /// Submit the form the element belongs to (the Enter key).
    async fn submit(&self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Rendered text of the element.
    async fn text(&self, element: &Self::Element) -> Result<String, BrowserError>;

    /// Value of an attribute or property, `None` when it is not set.
    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Reload the current page.
    async fn refresh(&self) -> Result<(), BrowserError>;

    /// End the session and release the browser.
    async fn close(self) -> Result<(), BrowserError>
    where
        Self: Sized;
}
