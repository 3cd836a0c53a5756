//! CSV ingestion, column typing and date filtering.
//!
//! A [`Table`] keeps every cell as text; columns are interpreted on demand
//! as numbers ([`Table::numeric_values`]) or dates ([`Table::dates`]).
//!
//! # Examples
//!
//! ```
//! use corr_easy::dataset::Table;
//!
//! let csv = "date,sales,visitors\n2024年1月,10,100\n2024年2月,12,130\n";
//! let table = Table::from_reader(csv.as_bytes()).unwrap();
//! assert_eq!(table.detect_date_column(), Some("date"));
//! assert_eq!(table.numeric_columns(), vec!["sales", "visitors"]);
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Cell contents treated as missing values.
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "-"];

/// Header substrings that mark a date column (matched case-insensitively).
const DATE_COLUMN_HINTS: &[&str] = &["date", "updated_at"];

/// Full-date formats tried in order.
const DATE_FORMATS: &[&str] = &["%Y年%m月%d日", "%Y-%m-%d", "%Y/%m/%d"];

/// Month-only formats; the day is taken as the 1st.
const MONTH_FORMATS: &[&str] = &["%Y年%m月", "%Y-%m", "%Y/%m"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidInput(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// An in-memory CSV table with a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from headers and rows of equal width.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if a row's width differs from the header's.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(Error::InvalidInput(format!(
                "row {} has {} fields, expected {}",
                i + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    /// Loads a CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "loaded CSV"
        );
        Ok(table)
    }

    /// Parses CSV from any reader. The first record is the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| -> Result<Vec<String>> {
                Ok(record?.iter().map(str::to_string).collect())
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        debug!(rows = rows.len(), ?headers, "parsed CSV records");
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text at `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Position of `name` in the header.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`] when no header matches.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::UnknownColumn {
                name: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Column values as `f64`, with missing cells as `NaN`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColumn`], or [`Error::NonNumericColumn`] at the first
    /// non-missing cell that does not parse.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<f64>> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cell = row[idx].as_str();
                parse_number(cell).ok_or_else(|| Error::NonNumericColumn {
                    column: column.to_string(),
                    row: i + 1,
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// Whether every non-missing cell of `column` parses as a number and at
    /// least one such cell exists.
    pub fn is_numeric(&self, column: &str) -> bool {
        let Ok(idx) = self.column_index(column) else {
            return false;
        };
        let mut seen = false;
        for row in &self.rows {
            let cell = row[idx].as_str();
            if is_missing(cell) {
                continue;
            }
            if parse_number(cell).is_none() {
                return false;
            }
            seen = true;
        }
        seen
    }

    /// Numeric columns in header order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| self.is_numeric(h))
            .collect()
    }

    /// First column whose name suggests it holds dates.
    pub fn detect_date_column(&self) -> Option<&str> {
        let found = self.headers.iter().map(String::as_str).find(|h| {
            let lower = h.to_lowercase();
            DATE_COLUMN_HINTS.iter().any(|hint| lower.contains(hint))
        });
        debug!(column = ?found, "date column detection");
        found
    }

    /// Parsed dates of `column`; unparseable cells become `None`.
    pub fn dates(&self, column: &str) -> Result<Vec<Option<NaiveDate>>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|row| parse_date(&row[idx])).collect())
    }

    /// Earliest and latest parseable date in `column`.
    pub fn date_bounds(&self, column: &str) -> Result<Option<DateRange>> {
        let dates = self.dates(column)?;
        let mut parsed = dates.into_iter().flatten();
        let Some(first) = parsed.next() else {
            return Ok(None);
        };
        let (start, end) = parsed.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Ok(Some(DateRange { start, end }))
    }

    /// Rows whose date in `column` lies within `range`. Rows with an
    /// unparseable date are dropped.
    pub fn filter_by_date(&self, column: &str, range: &DateRange) -> Result<Table> {
        let idx = self.column_index(column)?;
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .filter(|row| parse_date(&row[idx]).is_some_and(|d| range.contains(d)))
            .cloned()
            .collect();
        debug!(
            column,
            start = %range.start,
            end = %range.end,
            kept = rows.len(),
            dropped = self.rows.len() - rows.len(),
            "filtered rows by date"
        );
        Ok(Table {
            headers: self.headers.clone(),
            rows,
        })
    }

    /// Columns offered as axes: every header except the date column.
    pub fn selectable_columns(&self, date_column: Option<&str>) -> Vec<&str> {
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| Some(*h) != date_column)
            .collect()
    }
}

/// Whether a trimmed cell counts as a missing value.
pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

/// Parses a numeric cell. Missing cells give `Some(NaN)`; anything else that
/// does not parse gives `None`.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if is_missing(cell) {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}

/// Parses a date cell.
///
/// Accepts `2024年3月` (first of the month), `2024年3月5日`, `2024-03-05`,
/// `2024/03/05`, `2024-03`, `2024/03` and ISO-like date-times (date part
/// kept). Anything else is `None`.
///
/// ```
/// use chrono::NaiveDate;
/// use corr_easy::dataset::parse_date;
///
/// assert_eq!(parse_date("2023年4月"), NaiveDate::from_ymd_opt(2023, 4, 1));
/// assert_eq!(parse_date("2023-04-17"), NaiveDate::from_ymd_opt(2023, 4, 17));
/// assert_eq!(parse_date("April"), None);
/// ```
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if is_missing(cell) {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            MONTH_FORMATS.iter().find_map(|fmt| {
                NaiveDate::parse_from_str(&format!("{cell}|1"), &format!("{fmt}|%d")).ok()
            })
        })
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
                .map(|dt| dt.date())
        })
}
