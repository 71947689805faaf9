//! Validated run configuration.
//!
//! The CLI layer hands over raw, possibly missing values; this module turns
//! them into the immutable settings the pipeline is constructed with.

use crate::cli::Cli;
use crate::scrapers::extraction::RetryPolicy;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while validating the run configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("search phrase not provided (set `search_phrase` or pass --search-phrase)")]
    MissingSearchPhrase,

    #[error("topic not provided (set `topic` or pass --topic)")]
    MissingTopic,

    #[error("max extraction attempts must be at least 1, got {0}")]
    InvalidAttempts(u32),

    #[error("invalid site url `{url}`: {source}")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// What to search for and which topic filter to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfiguration {
    search_phrase: String,
    topic: String,
}

impl SearchConfiguration {
    /// Validate the raw inputs. Absent or blank values are rejected.
    pub fn new(
        search_phrase: Option<&str>,
        topic: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let search_phrase = non_blank(search_phrase).ok_or(ConfigError::MissingSearchPhrase)?;
        let topic = non_blank(topic).ok_or(ConfigError::MissingTopic)?;
        Ok(Self {
            search_phrase,
            topic,
        })
    }

    pub fn search_phrase(&self) -> &str {
        &self.search_phrase
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Everything the pipeline needs besides the browser session itself.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub search: SearchConfiguration,
    pub site_url: Url,
    pub report_path: PathBuf,
    pub images_dir: PathBuf,
    pub wait_timeout: Duration,
    pub retry: RetryPolicy,
}

impl BotSettings {
    /// Build settings from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let search = SearchConfiguration::new(cli.search_phrase.as_deref(), cli.topic.as_deref())?;
        if cli.max_extraction_attempts == 0 {
            return Err(ConfigError::InvalidAttempts(cli.max_extraction_attempts));
        }
        let site_url = Url::parse(&cli.site_url).map_err(|source| ConfigError::InvalidSiteUrl {
            url: cli.site_url.clone(),
            source,
        })?;
        Ok(Self {
            search,
            site_url,
            report_path: PathBuf::from(&cli.output),
            images_dir: PathBuf::from(&cli.images_dir),
            wait_timeout: Duration::from_secs(cli.wait_timeout_secs),
            retry: RetryPolicy {
                max_attempts: cli.max_extraction_attempts,
                ..RetryPolicy::default()
            },
        })
    }
}
