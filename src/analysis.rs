//! One correlation analysis over a pair of table columns.
//!
//! The pipeline mirrors what a user does interactively: narrow the rows to a
//! date range, pick an x and a y column, look at the scatter with its fitted
//! line, then read the coefficient and its interpretation.
//!
//! # Examples
//!
//! ```
//! use corr_easy::analysis::{analyze, AnalysisOptions, AnalysisRequest};
//! use corr_easy::dataset::Table;
//! use corr_easy::interpretation::CorrelationLabel;
//!
//! let csv = "x,y\n1,2\n2,4\n3,6\n4,8\n5,10\n";
//! let table = Table::from_reader(csv.as_bytes()).unwrap();
//! let report = analyze(&table, &AnalysisRequest::new("x", "y"), &AnalysisOptions::default()).unwrap();
//! assert_eq!(report.label, Some(CorrelationLabel::VeryStrongPositive));
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::correlation::{self, CorrelationResult};
use crate::dataset::{parse_date, DateRange, Table};
use crate::error::{Error, Result};
use crate::interpretation::{classify_correlation, CorrelationLabel, Language};
use crate::outlier::{self, Fence, OutlierMask, TUKEY_K};
use crate::regression::{self, LineSegment};

/// Tunables for an analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Tukey fence multiplier.
    pub fence_multiplier: f64,
    /// Language of rendered sentences.
    pub language: Language,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            fence_multiplier: TUKEY_K,
            language: Language::En,
        }
    }
}

/// Which columns to correlate and which rows to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub x: String,
    pub y: String,
    /// Date column override; auto-detected when `None`.
    pub date_column: Option<String>,
    /// Rows to keep; the full span of the date column when `None`.
    pub date_range: Option<DateRange>,
}

impl AnalysisRequest {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            date_column: None,
            date_range: None,
        }
    }

    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = Some(column.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }
}

/// Outlier summary for one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnOutliers {
    pub column: String,
    /// `None` when the column has no finite values after filtering.
    pub fence: Option<Fence>,
    pub mask: OutlierMask,
}

impl ColumnOutliers {
    /// Flagged values with their row positions in the filtered table.
    pub fn flagged(&self, values: &[f64]) -> Vec<(usize, f64)> {
        self.mask
            .indices()
            .into_iter()
            .filter_map(|i| values.get(i).map(|&v| (i, v)))
            .collect()
    }
}

/// One scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotPoint {
    /// Row position in the filtered table.
    pub row: usize,
    pub x: f64,
    pub y: f64,
    pub x_outlier: bool,
    pub y_outlier: bool,
}

/// Everything needed to display one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub x_column: String,
    pub y_column: String,
    pub date_column: Option<String>,
    pub date_range: Option<DateRange>,
    /// Rows in the loaded table.
    pub total_rows: usize,
    /// Rows left after date filtering.
    pub filtered_rows: usize,
    /// Rows where both x and y are present.
    pub paired_rows: usize,
    pub correlation: Option<CorrelationResult>,
    pub label: Option<CorrelationLabel>,
    /// Sentence for `label` in the requested language.
    pub interpretation: Option<String>,
    pub regression: Option<regression::SimpleRegressionResult>,
    pub regression_line: Option<LineSegment>,
    pub x_outliers: ColumnOutliers,
    pub y_outliers: ColumnOutliers,
    pub points: Vec<PlotPoint>,
    #[serde(skip)]
    pub(crate) x_values: Vec<f64>,
    #[serde(skip)]
    pub(crate) y_values: Vec<f64>,
}

impl Report {
    /// x values of the filtered rows, `NaN` where missing.
    pub fn x_values(&self) -> &[f64] {
        &self.x_values
    }

    /// y values of the filtered rows, `NaN` where missing.
    pub fn y_values(&self) -> &[f64] {
        &self.y_values
    }
}

/// Runs the analysis described by `request` over `table`.
///
/// # Errors
///
/// - [`Error::UnknownColumn`] / [`Error::NonNumericColumn`] for bad axes.
/// - [`Error::DateColumnSelected`] if an axis is the date column.
/// - [`Error::InsufficientData`] if no rows survive the date filter.
/// - [`Error::InvalidInput`] for an invalid fence multiplier, or a date range
///   that cannot be applied because there is no date column or it holds no
///   parseable dates.
pub fn analyze(table: &Table, request: &AnalysisRequest, options: &AnalysisOptions) -> Result<Report> {
    let date_column = match &request.date_column {
        Some(column) => {
            table.column_index(column)?;
            Some(column.clone())
        }
        None => table.detect_date_column().map(str::to_string),
    };

    for axis in [&request.x, &request.y] {
        table.column_index(axis)?;
        if date_column.as_deref() == Some(axis.as_str()) {
            return Err(Error::DateColumnSelected(axis.clone()));
        }
    }

    let (filtered, date_range) = match &date_column {
        Some(column) => filter_rows(table, column, request.date_range)?,
        None if request.date_range.is_some() => {
            return Err(Error::InvalidInput(
                "a date range was requested but the table has no date column".into(),
            ));
        }
        None => (table.clone(), None),
    };

    if filtered.is_empty() {
        return Err(Error::InsufficientData {
            needed: 1,
            found: 0,
        });
    }

    let x_values = filtered.numeric_values(&request.x)?;
    let y_values = filtered.numeric_values(&request.y)?;

    let x_outliers = column_outliers(&request.x, &x_values, options.fence_multiplier)?;
    let y_outliers = column_outliers(&request.y, &y_values, options.fence_multiplier)?;

    let points: Vec<PlotPoint> = x_values
        .iter()
        .zip(y_values.iter())
        .enumerate()
        .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
        .map(|(row, (&x, &y))| PlotPoint {
            row,
            x,
            y,
            x_outlier: x_outliers.mask.is_outlier(row),
            y_outlier: y_outliers.mask.is_outlier(row),
        })
        .collect();

    let (px, py) = correlation::complete_pairs(&x_values, &y_values);
    let correlation = correlation::pearson(&px, &py);
    let label = match correlation {
        Some(result) => Some(classify_correlation(result.r)?),
        None => {
            warn!(
                x = %request.x,
                y = %request.y,
                pairs = px.len(),
                "correlation undefined (fewer than 2 pairs or a constant column)"
            );
            None
        }
    };

    let regression = regression::simple_linear_regression(&px, &py);
    let regression_line = regression
        .as_ref()
        .and_then(|model| regression::regression_line(model, &px));

    info!(
        x = %request.x,
        y = %request.y,
        rows = filtered.len(),
        pairs = px.len(),
        r = ?correlation.map(|c| c.r),
        label = ?label,
        "analysis complete"
    );

    Ok(Report {
        x_column: request.x.clone(),
        y_column: request.y.clone(),
        date_column,
        date_range,
        total_rows: table.len(),
        filtered_rows: filtered.len(),
        paired_rows: px.len(),
        correlation,
        label,
        interpretation: label.map(|l| l.sentence(options.language).to_string()),
        regression,
        regression_line,
        x_outliers,
        y_outliers,
        points,
        x_values,
        y_values,
    })
}

fn filter_rows(
    table: &Table,
    column: &str,
    requested: Option<DateRange>,
) -> Result<(Table, Option<DateRange>)> {
    let Some(bounds) = table.date_bounds(column)? else {
        if requested.is_some() {
            return Err(Error::InvalidInput(format!(
                "cannot apply a date range: column '{column}' has no parseable dates"
            )));
        }
        warn!(column, "date column has no parseable dates; skipping date filter");
        return Ok((table.clone(), None));
    };

    let range = requested.unwrap_or(bounds);
    debug!(column, start = %range.start, end = %range.end, "applying date range");
    Ok((table.filter_by_date(column, &range)?, Some(range)))
}

/// Builds a [`DateRange`] from optional textual endpoints, filling an open end
/// from the bounds of the date column.
///
/// The column is `date_column` when given, otherwise the auto-detected one.
/// Endpoints accept every format [`parse_date`] does.
///
/// # Errors
///
/// - [`Error::InvalidDate`] if an endpoint does not parse.
/// - [`Error::InvalidInput`] if there is no date column, an open end cannot be
///   filled because the column has no parseable dates, or `from` is after `to`.
/// - [`Error::UnknownColumn`] if `date_column` is not in the table.
pub fn resolve_date_range(
    table: &Table,
    date_column: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<DateRange> {
    let parse = |s: &str| parse_date(s).ok_or_else(|| Error::InvalidDate(s.to_string()));
    let from = from.map(parse).transpose()?;
    let to = to.map(parse).transpose()?;

    let column = date_column
        .or_else(|| table.detect_date_column())
        .ok_or_else(|| Error::InvalidInput("date range given but no date column found".into()))?;
    let bounds = table.date_bounds(column)?;
    let unbounded = || Error::InvalidInput(format!("column '{column}' has no parseable dates"));

    let start = from.or(bounds.map(|b| b.start)).ok_or_else(unbounded)?;
    let end = to.or(bounds.map(|b| b.end)).ok_or_else(unbounded)?;

    DateRange::new(start, end)
}

fn column_outliers(column: &str, values: &[f64], k: f64) -> Result<ColumnOutliers> {
    let mask = outlier::detect_outliers_with(values, k)?;
    let fence = if values.iter().any(|v| v.is_finite()) {
        Some(outlier::tukey_fence_with(values, k)?)
    } else {
        None
    };
    if mask.count() > 0 {
        debug!(column, count = mask.count(), "outliers flagged");
    }
    Ok(ColumnOutliers {
        column: column.to_string(),
        fence,
        mask,
    })
}
