//! Reading the search result list into [`ArticleRecord`]s.
//!
//! Extraction walks the direct `li` children of the result list in display
//! order. For each item it reads title, date and description, counts the
//! search phrase, and downloads the thumbnail if the item has one.
//!
//! # Stale pages
//!
//! The results page keeps re-rendering for a while after the topic filter is
//! applied, so an element located a moment ago can vanish mid-read. When that
//! happens extraction waits out an exponential backoff, refreshes the page,
//! and starts over right after the reload:
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=base_delay/4)
//! ```
//!
//! After `max_attempts` the run fails with
//! [`ExtractError::StaleRetriesExhausted`].

use crate::browser::{BrowserError, BrowserSession, Locator};
use crate::images::{ImageError, ImageFetcher};
use crate::models::ArticleRecord;
use crate::scrapers::latimes::SiteLayout;
use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("page kept changing during extraction; gave up after {attempts} attempts")]
    StaleRetriesExhausted { attempts: u32 },
}

/// Bounded retry with exponential backoff for stale-page recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total extraction attempts, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt (doubles with each attempt).
    pub base_delay: Duration,
    /// Cap on the delay before jitter.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Deterministic part of the delay after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    fn delay_with_jitter(&self, attempt: u32) -> Duration {
        let jitter_cap = (self.base_delay.as_millis() / 4) as u64;
        let jitter_ms: u64 = if jitter_cap == 0 {
            0
        } else {
            rng().random_range(0..=jitter_cap)
        };
        self.backoff(attempt) + Duration::from_millis(jitter_ms)
    }
}

/// Reads the result list of the current page.
pub struct ExtractionEngine<'a, S> {
    session: &'a S,
    layout: &'a SiteLayout,
    images: &'a ImageFetcher,
    site_url: &'a Url,
    wait_timeout: Duration,
    retry: RetryPolicy,
}

impl<'a, S: BrowserSession> ExtractionEngine<'a, S> {
    pub fn new(
        session: &'a S,
        layout: &'a SiteLayout,
        images: &'a ImageFetcher,
        site_url: &'a Url,
        wait_timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            session,
            layout,
            images,
            site_url,
            wait_timeout,
            retry,
        }
    }

    /// Extract every article of the result list, in page order.
    ///
    /// An empty or missing list yields an empty vector. Items missing a
    /// required text field are skipped.
    #[instrument(level = "info", skip(self))]
    pub async fn extract_news_data(
        &self,
        search_phrase: &str,
    ) -> Result<Vec<ArticleRecord>, ExtractError> {
        info!("Extracting news data");
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.extract_once(search_phrase).await {
                Err(ExtractError::Browser(BrowserError::StaleElement)) => {
                    if attempt >= self.retry.max_attempts {
                        error!(
                            attempt,
                            max = self.retry.max_attempts,
                            "Page still changing after final extraction attempt"
                        );
                        return Err(ExtractError::StaleRetriesExhausted { attempts: attempt });
                    }
                    let delay = self.retry.delay_with_jitter(attempt);
                    warn!(
                        attempt,
                        max = self.retry.max_attempts,
                        ?delay,
                        "Stale element during extraction; backing off, then refreshing page"
                    );
                    sleep(delay).await;
                    self.session.refresh().await?;
                }
                other => return other,
            }
        }
    }

    async fn extract_once(&self, search_phrase: &str) -> Result<Vec<ArticleRecord>, ExtractError> {
        let list = match self
            .session
            .wait_until_present(&self.layout.results_list, self.wait_timeout)
            .await
        {
            Ok(list) => list,
            Err(BrowserError::Timeout { .. }) => {
                info!("No result list on the page");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let items = self
            .session
            .find_all_in(&list, &self.layout.result_item)
            .await?;
        if items.is_empty() {
            info!("No articles found");
            return Ok(Vec::new());
        }
        debug!(count = items.len(), "Found result items");

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.read_item(item, search_phrase).await {
                Ok(record) => {
                    debug!(
                        index,
                        title = %truncate_for_log(&record.title, 80),
                        "News data extracted"
                    );
                    records.push(record);
                }
                Err(ExtractError::Browser(BrowserError::NoSuchElement(locator))) => {
                    warn!(index, %locator, "Result item is missing a required field; skipping");
                }
                Err(e) => return Err(e),
            }
        }

        info!(count = records.len(), "News data extracted successfully");
        Ok(records)
    }

    async fn read_item(
        &self,
        item: &S::Element,
        search_phrase: &str,
    ) -> Result<ArticleRecord, ExtractError> {
        let title = self.read_text(item, &self.layout.title).await?;
        let date = self.read_text(item, &self.layout.date).await?;
        let description = self.read_text(item, &self.layout.description).await?;
        let picture_filename = self.fetch_picture(item).await?;

        Ok(ArticleRecord::new(
            title,
            date,
            description,
            picture_filename,
            search_phrase,
        ))
    }

    async fn read_text(
        &self,
        item: &S::Element,
        locator: &Locator,
    ) -> Result<String, BrowserError> {
        let element = self.session.find_in(item, locator).await?;
        self.session.text(&element).await
    }

    /// Download the item's thumbnail. No `img`, or an `img` without a usable
    /// `src`, means no picture.
    async fn fetch_picture(&self, item: &S::Element) -> Result<Option<String>, ExtractError> {
        let image = match self.session.find_in(item, &self.layout.image).await {
            Ok(image) => image,
            Err(BrowserError::NoSuchElement(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(src) = self.session.attribute(&image, "src").await? else {
            debug!("Image element has no src");
            return Ok(None);
        };
        let url = match self.site_url.join(src.trim()) {
            Ok(url) => url,
            Err(e) => {
                warn!(%src, error = %e, "Unresolvable image source; leaving picture empty");
                return Ok(None);
            }
        };

        Ok(Some(self.images.download_image(url.as_str()).await?))
    }
}
