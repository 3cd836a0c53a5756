//! Pearson correlation over paired columns.
//!
//! # Examples
//!
//! ```
//! use corr_easy::correlation::{complete_pairs, pearson};
//!
//! let x = [1.0, 2.0, f64::NAN, 4.0, 5.0];
//! let y = [2.0, 4.0, 6.0, 8.0, 10.0];
//! let (x, y) = complete_pairs(&x, &y);
//! let result = pearson(&x, &y).unwrap();
//! assert_eq!(result.n, 4);
//! assert!((result.r - 1.0).abs() < 1e-10);
//! ```

use serde::Serialize;
use u_numflow::stats;

/// Result of a correlation computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Correlation coefficient in [-1, 1].
    pub r: f64,
    /// Number of paired observations used.
    pub n: usize,
}

/// Computes the Pearson product-moment correlation coefficient.
///
/// # Algorithm
///
/// r = cov(x,y) / (σ_x · σ_y), clamped to [-1, 1] against rounding.
///
/// # Returns
///
/// `None` if either slice has fewer than 2 elements, the slices differ in
/// length, either contains a non-finite value, or either variable has zero
/// variance.
///
/// # References
///
/// Pearson (1895). "Note on regression and inheritance in the case of
/// two parents". Proceedings of the Royal Society of London, 58, 240–242.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<CorrelationResult> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    if x.iter().any(|v| !v.is_finite()) || y.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let cov = stats::covariance(x, y)?;
    let sx = stats::std_dev(x)?;
    let sy = stats::std_dev(y)?;

    if sx < 1e-300 || sy < 1e-300 {
        return None; // zero variance
    }

    let r = (cov / (sx * sy)).clamp(-1.0, 1.0);
    Some(CorrelationResult { r, n })
}

/// Keeps the rows where both `x[i]` and `y[i]` are finite.
///
/// Extra trailing elements of the longer slice are ignored.
pub fn complete_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn paired(min_len: usize, max_len: usize) -> BoxedStrategy<(Vec<f64>, Vec<f64>)> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
            .prop_flat_map(|x| {
                let n = x.len();
                (Just(x), proptest::collection::vec(-1e6_f64..1e6, n..=n))
            })
            .boxed()
    }

    proptest! {
        #[test]
        fn pearson_bounded(data in paired(5, 50)) {
            let (x, y) = data;
            if let Some(result) = pearson(&x, &y) {
                prop_assert!(result.r >= -1.0 && result.r <= 1.0, "r out of bounds: {}", result.r);
            }
        }

        #[test]
        fn pearson_symmetric(data in paired(5, 50)) {
            let (x, y) = data;
            match (pearson(&x, &y), pearson(&y, &x)) {
                (Some(a), Some(b)) => {
                    prop_assert!((a.r - b.r).abs() < 1e-10, "not symmetric: {} vs {}", a.r, b.r);
                }
                (None, None) => {}
                _ => prop_assert!(false, "one is None but not the other"),
            }
        }

        #[test]
        fn pearson_invariant_to_positive_affine_map(
            data in paired(5, 30),
            scale in 0.1_f64..10.0,
            shift in -100.0_f64..100.0,
        ) {
            let (x, y) = data;
            let y2: Vec<f64> = y.iter().map(|v| v * scale + shift).collect();
            if let (Some(a), Some(b)) = (pearson(&x, &y), pearson(&x, &y2)) {
                prop_assert!((a.r - b.r).abs() < 1e-6, "{} vs {}", a.r, b.r);
            }
        }
    }
}
