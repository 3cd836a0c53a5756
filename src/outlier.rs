//! Tukey IQR outlier detection.
//!
//! A value is an outlier when it lies strictly outside the fence
//! `[Q1 − k·IQR, Q3 + k·IQR]`, with `k = 1.5` by default. Quartiles use
//! R-7 interpolation over the finite entries of the sample; missing
//! (non-finite) entries keep their slot in the mask but are never flagged.
//!
//! # Examples
//!
//! ```
//! use corr_easy::outlier::detect_outliers;
//!
//! let mask = detect_outliers(&[10.0, 12.0, 11.0, 13.0, 12.0, 500.0]).unwrap();
//! assert_eq!(mask.indices(), vec![5]);
//! ```
//!
//! # References
//!
//! Tukey (1977). "Exploratory Data Analysis". Addison-Wesley.

use serde::Serialize;
use u_numflow::stats;

use crate::error::{Error, Result};

/// Standard Tukey multiplier.
pub const TUKEY_K: f64 = 1.5;

/// Outlier fence derived from the first and third quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fence {
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Interquartile range, `q3 − q1`.
    pub iqr: f64,
    /// `q1 − k·iqr`.
    pub lower: f64,
    /// `q3 + k·iqr`.
    pub upper: f64,
}

impl Fence {
    /// Whether `value` lies strictly outside the fence.
    ///
    /// Non-finite values are never outliers.
    pub fn is_outlier(&self, value: f64) -> bool {
        value.is_finite() && (value < self.lower || value > self.upper)
    }

    /// Whether `value` lies within the closed interval `[lower, upper]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Per-element outlier flags, aligned with the input sample.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct OutlierMask(Vec<bool>);

impl OutlierMask {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of flagged elements.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&flag| flag).count()
    }

    /// Positions of flagged elements, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect()
    }

    /// Flag at position `i`; `false` when out of bounds.
    pub fn is_outlier(&self, i: usize) -> bool {
        self.0.get(i).copied().unwrap_or(false)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, bool> {
        self.0.iter()
    }
}

impl From<OutlierMask> for Vec<bool> {
    fn from(mask: OutlierMask) -> Self {
        mask.0
    }
}

impl<'a> IntoIterator for &'a OutlierMask {
    type Item = &'a bool;
    type IntoIter = std::slice::Iter<'a, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Computes the Tukey fence with the standard multiplier 1.5.
///
/// # Errors
///
/// [`Error::InvalidInput`] if the sample has no finite values.
pub fn tukey_fence(sample: &[f64]) -> Result<Fence> {
    tukey_fence_with(sample, TUKEY_K)
}

/// Computes the fence `[Q1 − k·IQR, Q3 + k·IQR]`.
///
/// Non-finite entries are excluded before the quartiles are taken. With a
/// single finite value, `Q1 = Q3 = value` and the fence collapses to that
/// point.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `k` is negative or non-finite, or if the
/// sample has no finite values.
pub fn tukey_fence_with(sample: &[f64], k: f64) -> Result<Fence> {
    check_multiplier(k)?;

    let mut observed: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    observed.sort_unstable_by(f64::total_cmp);

    let (Some(q1), Some(q3)) = (
        stats::quantile_sorted(&observed, 0.25),
        stats::quantile_sorted(&observed, 0.75),
    ) else {
        return Err(Error::InvalidInput(
            "sample has no finite values to compute quartiles from".into(),
        ));
    };

    let iqr = q3 - q1;
    Ok(Fence {
        q1,
        q3,
        iqr,
        lower: q1 - k * iqr,
        upper: q3 + k * iqr,
    })
}

/// Flags values strictly outside the Tukey fence (k = 1.5).
///
/// # Errors
///
/// [`Error::InvalidInput`] if `sample` is empty.
///
/// # Examples
///
/// ```
/// use corr_easy::outlier::detect_outliers;
///
/// let mask = detect_outliers(&[3.0, 3.0, 3.0]).unwrap();
/// assert_eq!(mask.count(), 0);
///
/// let mask = detect_outliers(&[1.0, f64::NAN, 2.0, 3.0]).unwrap();
/// assert_eq!(mask.len(), 4);
/// assert!(!mask.is_outlier(1));
/// ```
pub fn detect_outliers(sample: &[f64]) -> Result<OutlierMask> {
    detect_outliers_with(sample, TUKEY_K)
}

/// Flags values strictly outside `[Q1 − k·IQR, Q3 + k·IQR]`.
///
/// A sample whose entries are all missing yields an all-false mask.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `sample` is empty or `k` is invalid.
pub fn detect_outliers_with(sample: &[f64], k: f64) -> Result<OutlierMask> {
    if sample.is_empty() {
        return Err(Error::InvalidInput(
            "cannot detect outliers in an empty sample".into(),
        ));
    }

    check_multiplier(k)?;
    if !sample.iter().any(|v| v.is_finite()) {
        return Ok(OutlierMask(vec![false; sample.len()]));
    }

    let fence = tukey_fence_with(sample, k)?;
    Ok(OutlierMask(
        sample.iter().map(|&v| fence.is_outlier(v)).collect(),
    ))
}

fn check_multiplier(k: f64) -> Result<()> {
    if k.is_finite() && k >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "fence multiplier must be finite and non-negative, got {k}"
        )))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn constant_samples_have_no_outliers(
            value in -1e6_f64..1e6,
            n in 1_usize..50,
        ) {
            let mask = detect_outliers(&vec![value; n]).expect("non-empty");
            prop_assert_eq!(mask.count(), 0);
        }

        #[test]
        fn far_value_is_flagged(
            data in proptest::collection::vec(-1e3_f64..1e3, 4..=40),
        ) {
            // With at least four original points the new Q3 cannot exceed the
            // old maximum, so max + 2·range + 1 clears the new fence.
            let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let far = hi + 2.0 * (hi - lo) + 1.0;
            let fence = tukey_fence(&data).expect("finite");
            prop_assert!(far > fence.upper + 1.0 - 1e-9);

            let mut extended = data.clone();
            extended.push(far);
            let after = detect_outliers(&extended).expect("non-empty");
            prop_assert!(after.is_outlier(data.len()));
        }

        #[test]
        fn mask_matches_sample_length(
            data in proptest::collection::vec(prop_oneof![
                4 => (-1e6_f64..1e6).boxed(),
                1 => Just(f64::NAN).boxed(),
            ], 1..=60),
        ) {
            let mask = detect_outliers(&data).expect("non-empty");
            prop_assert_eq!(mask.len(), data.len());
            for (i, v) in data.iter().enumerate() {
                if v.is_nan() {
                    prop_assert!(!mask.is_outlier(i));
                }
            }
        }
    }
}
