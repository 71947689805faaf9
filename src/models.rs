//! Data models for scraped search results.
//!
//! [`ArticleRecord`] is the one record type produced by the scraper: one per
//! visible item of the search result list, in display order.

/// Column headers of the report, in the same order as the fields of
/// [`ArticleRecord`].
pub const REPORT_COLUMNS: [&str; 7] = [
    "Title",
    "Date",
    "Description",
    "Picture Filename",
    "Title Search Phrase Occurrences",
    "Description Search Phrase Occurrences",
    "Contains Money",
];

/// A single article as shown in the search result list.
///
/// Records are built once during extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The headline text.
    pub title: String,
    /// The timestamp exactly as the site renders it (not parsed).
    pub date: String,
    /// The teaser text under the headline.
    pub description: String,
    /// Name of the downloaded thumbnail inside the images directory, if the
    /// item had one.
    pub picture_filename: Option<String>,
    /// Case-insensitive occurrences of the search phrase in `title`.
    pub title_occurrences: usize,
    /// Case-insensitive occurrences of the search phrase in `description`.
    pub description_occurrences: usize,
    /// Whether `title` or `description` contains a `$`.
    pub contains_money: bool,
}

impl ArticleRecord {
    /// Build a record from the raw text fields, computing the derived columns
    /// against `search_phrase`.
    pub fn new(
        title: String,
        date: String,
        description: String,
        picture_filename: Option<String>,
        search_phrase: &str,
    ) -> Self {
        let title_occurrences = count_occurrences(&title, search_phrase);
        let description_occurrences = count_occurrences(&description, search_phrase);
        let contains_money = mentions_money(&title) || mentions_money(&description);
        Self {
            title,
            date,
            description,
            picture_filename,
            title_occurrences,
            description_occurrences,
            contains_money,
        }
    }
}

/// Count non-overlapping, case-insensitive occurrences of `needle` in `haystack`.
///
/// An empty needle never matches.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let needle = needle.to_lowercase();
    haystack.to_lowercase().matches(needle.as_str()).count()
}

/// Whether the raw text carries a dollar sign.
pub fn mentions_money(text: &str) -> bool {
    text.contains('$')
}
