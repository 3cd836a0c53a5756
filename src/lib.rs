//! # corr-easy
//!
//! Correlation at a glance for two columns of a CSV file: Pearson
//! coefficient, fitted regression line, a plain-language interpretation of
//! the coefficient, and Tukey outlier flags per column, optionally limited
//! to a date range.
//!
//! ## Modules
//!
//! - [`outlier`] — Tukey IQR fence and per-element outlier mask
//! - [`interpretation`] — Nine-bucket qualitative scale for a coefficient
//! - [`correlation`] — Pearson correlation over pairwise-complete rows
//! - [`regression`] — Simple OLS regression and the fitted line segment
//! - [`dataset`] — CSV loading, numeric/date column detection, date filtering
//! - [`analysis`] — One x/y analysis producing a [`analysis::Report`]
//! - [`report`] — Text and JSON rendering
//!
//! ## Example
//!
//! ```
//! use corr_easy::{classify_correlation, detect_outliers};
//!
//! let mask = detect_outliers(&[10.0, 12.0, 11.0, 13.0, 12.0, 500.0]).unwrap();
//! assert_eq!(mask.indices(), vec![5]);
//!
//! assert_eq!(classify_correlation(0.2).unwrap().as_str(), "negligible/no correlation");
//! ```

pub mod analysis;
pub mod correlation;
pub mod dataset;
pub mod error;
pub mod interpretation;
pub mod logging;
pub mod outlier;
pub mod regression;
pub mod report;

pub use error::{Error, Result};
pub use interpretation::{classify_correlation, CorrelationLabel};
pub use outlier::{detect_outliers, OutlierMask};
