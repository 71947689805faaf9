//! Report generation.
//!
//! # Submodules
//!
//! - [`excel`]: Writes the extracted [`ArticleRecord`](crate::models::ArticleRecord)s
//!   to a single-sheet `.xlsx` workbook
//!
//! # Output Structure
//!
//! ```text
//! /output/news_data.xlsx     # report, overwritten on every run
//! images/
//! ├── image_1746543000123456_0.jpg
//! └── image_1746543000234567_1.jpg
//! ```

pub mod excel;
