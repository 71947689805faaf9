//! Thumbnail downloads.
//!
//! Each image is fetched once and written verbatim into the images directory
//! under a freshly generated name. There is no content-type check and no retry.

use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, instrument};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Downloads images into one directory.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    dir: PathBuf,
}

impl ImageFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetch `url` and store the body in the images directory.
    ///
    /// Returns the bare file name (not the full path).
    #[instrument(level = "info", skip(self))]
    pub async fn download_image(&self, url: &str) -> Result<String, ImageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ImageError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let download_error = |source: reqwest::Error| ImageError::Download {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(download_error)?;
        debug!(status = %response.status(), "Image response received");
        let bytes = response.bytes().await.map_err(download_error)?;

        let filename = unique_image_filename();
        let path = self.dir.join(&filename);
        fs::write(&path, &bytes)
            .await
            .map_err(|source| ImageError::Write {
                path: path.clone(),
                source,
            })?;

        info!(%filename, bytes = bytes.len(), "Saved image");
        Ok(filename)
    }
}

/// `image_<utc micros>_<sequence>.jpg`, unique within the process.
pub fn unique_image_filename() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("image_{}_{}.jpg", Utc::now().timestamp_micros(), seq)
}
