//! Browser-driven scraping of the news site's search results.
//!
//! Scraping happens in two phases against one live browser session:
//!
//! 1. **Search & filter** ([`latimes::SearchController`]): open the landing
//!    page, submit the search phrase, then narrow the results to a topic
//! 2. **Extraction** ([`extraction::ExtractionEngine`]): read every item of
//!    the result list into an [`ArticleRecord`](crate::models::ArticleRecord)
//!    and download its thumbnail
//!
//! Every locator for the target site lives in [`latimes::SiteLayout`], so a
//! markup change on the site is a one-place fix.

pub mod extraction;
pub mod latimes;
