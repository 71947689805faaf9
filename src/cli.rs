//! Command-line interface definitions for the news bot.
//!
//! Every option can also be supplied through the environment, which is how
//! the bot is usually configured when it runs as an unattended task.

use clap::Parser;

/// Command-line arguments for the news bot.
///
/// The search phrase and topic are optional here so that a missing value is
/// reported by configuration validation with a descriptive error instead of
/// a clap usage message.
///
/// # Examples
///
/// ```sh
/// # Everything from the environment
/// search_phrase=Bitcoin topic=Business latimes_news_bot
///
/// # Explicit flags, headless browser, custom report path
/// latimes_news_bot --search-phrase Bitcoin --topic Business --headless -o ./news_data.xlsx
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Phrase typed into the site search box
    #[arg(short, long, env = "search_phrase")]
    pub search_phrase: Option<String>,

    /// Topic filter label to select on the results page (exact text)
    #[arg(short, long, env = "topic")]
    pub topic: Option<String>,

    /// Landing page of the news site
    #[arg(long, env = "NEWS_SITE_URL", default_value = "https://www.latimes.com/")]
    pub site_url: String,

    /// WebDriver endpoint (chromedriver or Selenium)
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Path of the Excel report
    #[arg(short, long, env = "NEWS_REPORT_PATH", default_value = "/output/news_data.xlsx")]
    pub output: String,

    /// Directory where thumbnails are saved
    #[arg(long, env = "NEWS_IMAGES_DIR", default_value = "images")]
    pub images_dir: String,

    /// Upper bound in seconds for every wait on a page element
    #[arg(long, default_value_t = 30)]
    pub wait_timeout_secs: u64,

    /// How many times extraction is attempted when the page changes underneath it
    #[arg(long, default_value_t = 3)]
    pub max_extraction_attempts: u32,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,
}
