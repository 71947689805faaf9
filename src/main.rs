//! # LA Times News Bot
//!
//! Searches the Los Angeles Times in a real Chrome browser, narrows the
//! results to one topic, and saves every listed article to an Excel report
//! together with its thumbnail.
//!
//! ## Usage
//!
//! ```sh
//! search_phrase=Bitcoin topic=Business latimes_news_bot --headless
//! ```
//!
//! A WebDriver endpoint (chromedriver or Selenium) must be reachable at
//! `--webdriver-url`.
//!
//! ## Architecture
//!
//! The application follows a linear pipeline:
//! 1. **Search**: Open the landing page and submit the search phrase
//! 2. **Filter**: Select the topic on the results page
//! 3. **Extract**: Read each result item and download its thumbnail
//! 4. **Report**: Write the Excel file

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod images;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use browser::webdriver::WebDriverSession;
use cli::Cli;
use config::BotSettings;
use pipeline::NewsBot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news bot starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Validate before a browser is ever started
    let settings = match BotSettings::from_cli(&args) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    let session = match WebDriverSession::connect(&args.webdriver_url, args.headless).await {
        Ok(session) => session,
        Err(e) => {
            error!(url = %args.webdriver_url, error = %e, "Could not start the browser session");
            return Err(e.into());
        }
    };

    let outcome = NewsBot::new(session, settings).run().await?;

    let elapsed = start_time.elapsed();
    info!(
        ?outcome,
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
