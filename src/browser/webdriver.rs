//! [`BrowserSession`] over a WebDriver endpoint (chromedriver or Selenium).
//!
//! Waits are implemented with `thirtyfour` element queries, which poll the
//! page until the condition holds or the timeout elapses.

use super::{BrowserError, BrowserSession, Locator};
use std::time::Duration;
use thirtyfour::ChromiumLikeCapabilities;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::{info, instrument};

/// How often a bounded wait re-checks the page.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A Chrome tab driven through WebDriver.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Start a Chrome session on `server_url` and maximize its window.
    #[instrument(level = "info")]
    pub async fn connect(server_url: &str, headless: bool) -> Result<Self, BrowserError> {
        let mut caps = DesiredCapabilities::chrome();
        if headless {
            caps.set_headless().map_err(driver_error)?;
        }
        let driver = WebDriver::new(server_url, caps).await.map_err(driver_error)?;
        driver.maximize_window().await.map_err(driver_error)?;
        info!("Browser session started");
        Ok(Self { driver })
    }
}

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(s) => By::Css(s.clone()),
        Locator::ClassName(s) => By::ClassName(s.clone()),
        Locator::Tag(s) => By::Tag(s.clone()),
        Locator::XPath(s) => By::XPath(s.clone()),
    }
}

fn driver_error(err: WebDriverError) -> BrowserError {
    match err {
        WebDriverError::StaleElementReference(..) => BrowserError::StaleElement,
        other => BrowserError::Driver(other.to_string()),
    }
}

/// Map an error from a direct lookup.
fn lookup_error(locator: &Locator, err: WebDriverError) -> BrowserError {
    match err {
        WebDriverError::NoSuchElement(..) => BrowserError::NoSuchElement(locator.to_string()),
        other => driver_error(other),
    }
}

/// Map an error from a bounded wait. An exhausted query reports "no such
/// element", which for a wait means the timeout elapsed.
fn wait_error(locator: &Locator, timeout: Duration, err: WebDriverError) -> BrowserError {
    match err {
        WebDriverError::NoSuchElement(..) | WebDriverError::Timeout(..) => BrowserError::Timeout {
            locator: locator.to_string(),
            timeout,
        },
        other => driver_error(other),
    }
}

impl BrowserSession for WebDriverSession {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.driver.goto(url).await.map_err(driver_error)
    }

    async fn wait_until_clickable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<WebElement, BrowserError> {
        self.driver
            .query(by(locator))
            .wait(timeout, POLL_INTERVAL)
            .and_clickable()
            .first()
            .await
            .map_err(|e| wait_error(locator, timeout, e))
    }

    async fn wait_until_present(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<WebElement, BrowserError> {
        self.driver
            .query(by(locator))
            .wait(timeout, POLL_INTERVAL)
            .first()
            .await
            .map_err(|e| wait_error(locator, timeout, e))
    }

    async fn find_in(
        &self,
        parent: &WebElement,
        locator: &Locator,
    ) -> Result<WebElement, BrowserError> {
        parent
            .find(by(locator))
            .await
            .map_err(|e| lookup_error(locator, e))
    }

    async fn find_all_in(
        &self,
        parent: &WebElement,
        locator: &Locator,
    ) -> Result<Vec<WebElement>, BrowserError> {
        parent
            .find_all(by(locator))
            .await
            .map_err(|e| lookup_error(locator, e))
    }

    async fn click(&self, element: &WebElement) -> Result<(), BrowserError> {
        element.click().await.map_err(driver_error)
    }

    async fn send_keys(&self, element: &WebElement, text: &str) -> Result<(), BrowserError> {
        element.send_keys(text).await.map_err(driver_error)
    }

    async fn submit(&self, element: &WebElement) -> Result<(), BrowserError> {
        element.send_keys(Key::Enter).await.map_err(driver_error)
    }

    async fn text(&self, element: &WebElement) -> Result<String, BrowserError> {
        element.text().await.map_err(driver_error)
    }

    async fn attribute(
        &self,
        element: &WebElement,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        element.attr(name).await.map_err(driver_error)
    }

    async fn refresh(&self) -> Result<(), BrowserError> {
        self.driver.refresh().await.map_err(driver_error)
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.driver.quit().await.map_err(driver_error)
    }
}
