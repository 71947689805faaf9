//! Excel report output.
//!
//! The report is one worksheet: a header row with [`REPORT_COLUMNS`], then
//! one row per article in extraction order. Counts are written as numbers and
//! "Contains Money" as a boolean, so the sheet sorts and filters naturally.
//! A missing picture leaves its cell empty.

use crate::models::{ArticleRecord, REPORT_COLUMNS};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
#[error("failed to write report {}: {source}", path.display())]
pub struct ReportError {
    pub path: PathBuf,
    #[source]
    pub source: XlsxError,
}

/// Write `records` to an `.xlsx` file at `path`, replacing any existing file.
///
/// The parent directory must already exist.
#[instrument(level = "info", skip(records), fields(path = %path.display(), rows = records.len()))]
pub fn save_to_excel(records: &[ArticleRecord], path: &Path) -> Result<(), ReportError> {
    let report_error = |source: XlsxError| ReportError {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = build_workbook(records).map_err(report_error)?;
    workbook.save(path).map_err(report_error)?;
    info!("News data saved to Excel");
    Ok(())
}

fn build_workbook(records: &[ArticleRecord]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, name) in REPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &record.title)?;
        sheet.write_string(row, 1, &record.date)?;
        sheet.write_string(row, 2, &record.description)?;
        if let Some(filename) = &record.picture_filename {
            sheet.write_string(row, 3, filename)?;
        }
        sheet.write_number(row, 4, record.title_occurrences as f64)?;
        sheet.write_number(row, 5, record.description_occurrences as f64)?;
        sheet.write_boolean(row, 6, record.contains_money)?;
    }

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook};

    fn record(title: &str, picture: Option<&str>, money: bool) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            date: "May 6, 2025".to_string(),
            description: format!("About {title}"),
            picture_filename: picture.map(str::to_string),
            title_occurrences: 2,
            description_occurrences: 1,
            contains_money: money,
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    fn as_count(cell: &Data) -> usize {
        match cell {
            Data::Float(f) => *f as usize,
            Data::Int(i) => *i as usize,
            other => panic!("expected a number, got {other:?}"),
        }
    }

    fn as_string(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            other => panic!("expected a string, got {other:?}"),
        }
    }

    #[test]
    fn test_report_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news_data.xlsx");
        let records = vec![
            record("Bitcoin rallies", Some("image_1_0.jpg"), true),
            record("Markets react", None, false),
        ];

        save_to_excel(&records, &path).unwrap();
        let rows = read_rows(&path);

        assert_eq!(rows.len(), 3);
        let header: Vec<String> = rows[0].iter().map(as_string).collect();
        assert_eq!(header, REPORT_COLUMNS.to_vec());

        for (row, expected) in rows[1..].iter().zip(&records) {
            assert_eq!(as_string(&row[0]), expected.title);
            assert_eq!(as_string(&row[1]), expected.date);
            assert_eq!(as_string(&row[2]), expected.description);
            match &expected.picture_filename {
                Some(name) => assert_eq!(as_string(&row[3]), *name),
                None => assert_eq!(row[3], Data::Empty),
            }
            assert_eq!(as_count(&row[4]), expected.title_occurrences);
            assert_eq!(as_count(&row[5]), expected.description_occurrences);
            assert_eq!(row[6], Data::Bool(expected.contains_money));
        }
    }

    #[test]
    fn test_report_overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news_data.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        save_to_excel(&[record("Fresh", None, false)], &path).unwrap();

        let rows = read_rows(&path);
        assert_eq!(as_string(&rows[1][0]), "Fresh");
    }

    #[test]
    fn test_report_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("news_data.xlsx");

        let err = save_to_excel(&[record("A", None, false)], &path).unwrap_err();
        assert_eq!(err.path, path);
    }
}
