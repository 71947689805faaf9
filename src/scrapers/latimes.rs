//! Los Angeles Times search page: locators and the search & filter steps.
//!
//! The search flow is:
//!
//! 1. Click the magnifier button in the header (`[data-element='search-button']`)
//! 2. Type the phrase into the revealed input and press Enter
//! 3. On the results page, open the topic filter group and click the label
//!    whose text is exactly the requested topic
//!
//! Each wait is bounded. A timeout means the step failed; it is logged and
//! reported as `Ok(false)` so the caller can stop the run.

use crate::browser::{BrowserError, BrowserSession, Locator};
use crate::utils::xpath_literal;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Every locator the scraper needs on the target site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub search_button: Locator,
    pub search_input: Locator,
    pub topic_checkbox: Locator,
    pub results_list: Locator,
    /// Relative to `results_list`.
    pub result_item: Locator,
    /// The per-item locators below are relative to a `result_item`.
    pub title: Locator,
    pub date: Locator,
    pub description: Locator,
    pub image: Locator,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            search_button: Locator::css("[data-element='search-button']"),
            search_input: Locator::css("[data-element='search-form-input']"),
            topic_checkbox: Locator::class_name("checkbox-input-element"),
            results_list: Locator::class_name("search-results-module-results-menu"),
            result_item: Locator::xpath("./li"),
            title: Locator::class_name("promo-title"),
            date: Locator::class_name("promo-timestamp"),
            description: Locator::class_name("promo-description"),
            image: Locator::tag("img"),
        }
    }
}

impl SiteLayout {
    /// Locator for the filter label whose text is exactly `topic`.
    pub fn topic_label(&self, topic: &str) -> Locator {
        Locator::xpath(format!("//span[text()={}]", xpath_literal(topic)))
    }
}

/// Drives the search box and the topic filter.
pub struct SearchController<'a, S> {
    session: &'a S,
    layout: &'a SiteLayout,
    timeout: Duration,
}

impl<'a, S: BrowserSession> SearchController<'a, S> {
    pub fn new(session: &'a S, layout: &'a SiteLayout, timeout: Duration) -> Self {
        Self {
            session,
            layout,
            timeout,
        }
    }

    /// Open `site_url` and submit `search_phrase` through the header search.
    ///
    /// Returns `Ok(false)` if the search controls did not show up in time.
    /// Other browser failures are returned as errors.
    #[instrument(level = "info", skip(self))]
    pub async fn navigate_and_search(
        &self,
        site_url: &str,
        search_phrase: &str,
    ) -> Result<bool, BrowserError> {
        info!("Navigating to the news site");
        self.session.navigate(site_url).await?;

        match self.submit_search(search_phrase).await {
            Ok(()) => Ok(true),
            Err(e @ BrowserError::Timeout { .. }) => {
                error!(error = %e, "Timeout occurred while searching for elements");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn submit_search(&self, search_phrase: &str) -> Result<(), BrowserError> {
        let button = self
            .session
            .wait_until_clickable(&self.layout.search_button, self.timeout)
            .await?;
        self.session.click(&button).await?;

        let input = self
            .session
            .wait_until_present(&self.layout.search_input, self.timeout)
            .await?;
        self.session.send_keys(&input, search_phrase).await?;
        self.session.submit(&input).await?;
        info!("Search submitted");
        Ok(())
    }

    /// Open the topic filter group and select the label matching `topic`.
    ///
    /// Returns `Ok(false)` if either control did not become clickable in
    /// time, which includes a topic that matches no label exactly.
    #[instrument(level = "info", skip(self))]
    pub async fn select_topic_and_latest_news(&self, topic: &str) -> Result<bool, BrowserError> {
        info!("Selecting topic");
        match self.select_topic(topic).await {
            Ok(()) => Ok(true),
            Err(e @ BrowserError::Timeout { .. }) => {
                error!(error = %e, "Timeout occurred while selecting topic");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn select_topic(&self, topic: &str) -> Result<(), BrowserError> {
        let checkbox = self
            .session
            .wait_until_clickable(&self.layout.topic_checkbox, self.timeout)
            .await?;
        self.session.click(&checkbox).await?;

        let label = self
            .session
            .wait_until_clickable(&self.layout.topic_label(topic), self.timeout)
            .await?;
        self.session.click(&label).await?;
        info!("Topic selected");
        Ok(())
    }
}
