//! End-to-end run: search, filter, extract, report.
//!
//! The run is strictly linear:
//!
//! 1. **Search**: open the site and submit the phrase
//! 2. **Filter**: select the topic
//! 3. **Extract**: read the result list and download thumbnails
//! 4. **Report**: write the Excel file
//!
//! A failed search or topic selection, or an empty result list, ends the run
//! early without a report. The browser session is closed on every exit path,
//! including errors and panics.

use crate::browser::{BrowserError, BrowserSession};
use crate::config::BotSettings;
use crate::images::ImageFetcher;
use crate::outputs::excel::{self, ReportError};
use crate::scrapers::extraction::{ExtractError, ExtractionEngine};
use crate::scrapers::latimes::{SearchController, SiteLayout};
use crate::utils::ensure_writable_dir;
use futures::FutureExt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("report directory {} is not writable: {source}", path.display())]
    ReportDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// How a run ended when nothing went fatally wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The report was written.
    Completed { articles: usize, report_path: PathBuf },
    /// The search controls never became usable.
    SearchFailed,
    /// The topic filter or its label never became clickable.
    TopicSelectionFailed,
    /// The result list was empty; no report was written.
    NoArticles,
}

/// Owns the browser session for the duration of one run.
pub struct NewsBot<S> {
    session: S,
    settings: BotSettings,
    layout: SiteLayout,
    images: ImageFetcher,
}

impl<S: BrowserSession> NewsBot<S> {
    pub fn new(session: S, settings: BotSettings) -> Self {
        let images = ImageFetcher::new(&settings.images_dir);
        Self {
            session,
            settings,
            layout: SiteLayout::default(),
            images,
        }
    }

    /// Run every step and close the session.
    #[instrument(
        level = "info",
        skip_all,
        fields(
            search_phrase = %self.settings.search.search_phrase(),
            topic = %self.settings.search.topic()
        )
    )]
    pub async fn run(self) -> Result<RunOutcome, PipelineError> {
        let Self {
            session,
            settings,
            layout,
            images,
        } = self;

        let result = AssertUnwindSafe(run_steps(&session, &settings, &layout, &images))
            .catch_unwind()
            .await;

        info!("Closing browser session");
        if let Err(e) = session.close().await {
            warn!(error = %e, "Browser session did not close cleanly");
        }

        match result {
            Ok(Ok(outcome)) => {
                info!(?outcome, "Script execution completed");
                Ok(outcome)
            }
            Ok(Err(e)) => {
                error!(error = %e, "Run failed");
                Err(e)
            }
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

async fn run_steps<S: BrowserSession>(
    session: &S,
    settings: &BotSettings,
    layout: &SiteLayout,
    images: &ImageFetcher,
) -> Result<RunOutcome, PipelineError> {
    let search_phrase = settings.search.search_phrase();
    let controller = SearchController::new(session, layout, settings.wait_timeout);

    if !controller
        .navigate_and_search(settings.site_url.as_str(), search_phrase)
        .await?
    {
        error!("Navigation and search failed");
        return Ok(RunOutcome::SearchFailed);
    }

    if !controller
        .select_topic_and_latest_news(settings.search.topic())
        .await?
    {
        error!("Selecting topic and latest news failed");
        return Ok(RunOutcome::TopicSelectionFailed);
    }

    let engine = ExtractionEngine::new(
        session,
        layout,
        images,
        &settings.site_url,
        settings.wait_timeout,
        settings.retry.clone(),
    );
    let records = engine.extract_news_data(search_phrase).await?;
    if records.is_empty() {
        warn!("No news data extracted");
        return Ok(RunOutcome::NoArticles);
    }
    info!(
        count = records.len(),
        images_dir = %images.dir().display(),
        "Extraction finished"
    );

    let report_path = &settings.report_path;
    if let Some(dir) = report_path.parent().filter(|d| *d != Path::new("")) {
        ensure_writable_dir(dir)
            .await
            .map_err(|source| PipelineError::ReportDir {
                path: dir.to_path_buf(),
                source,
            })?;
    }
    excel::save_to_excel(&records, report_path)?;

    Ok(RunOutcome::Completed {
        articles: records.len(),
        report_path: report_path.clone(),
    })
}
