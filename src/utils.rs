//! Utility functions for string handling and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for log fields
//! - XPath string literal quoting for text-based locators
//! - File system validation for output directories

use std::fs as stdfs;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Quote arbitrary text as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so text holding both quote kinds is split
/// and rebuilt with `concat()`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(xpath_literal("Business"), "'Business'");
/// assert_eq!(xpath_literal("Editor's Picks"), "\"Editor's Picks\"");
/// ```
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let parts = text
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect::<Vec<_>>()
        .join(", \"'\", ");
    format!("concat({parts})")
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a marker file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let marker = path.join(WRITE_MARKER);
    stdfs::File::create(&marker)?;
    remove_write_marker(&marker);
    info!("Output directory is writable");
    Ok(())
}

const WRITE_MARKER: &str = "..__write_check__";

/// Leftover markers are harmless, so a failed removal is only logged.
fn remove_write_marker(marker: &Path) {
    if let Err(e) = stdfs::remove_file(marker) {
        warn!(marker = %marker.display(), error = %e, "Could not remove write-check file");
    }
}
