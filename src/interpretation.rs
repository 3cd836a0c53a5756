//! Qualitative interpretation of a correlation coefficient.
//!
//! Maps `r ∈ [-1, 1]` onto a fixed nine-bucket scale. Thresholds are scanned
//! in descending order with a strict `>` comparison, so a value sitting
//! exactly on a threshold belongs to the bucket below it: `0.9` is
//! "strong positive" and `0.2` is "negligible/no correlation".
//!
//! # Examples
//!
//! ```
//! use corr_easy::interpretation::{classify_correlation, CorrelationLabel};
//!
//! assert_eq!(classify_correlation(0.95).unwrap(), CorrelationLabel::VeryStrongPositive);
//! assert_eq!(classify_correlation(0.9).unwrap(), CorrelationLabel::StrongPositive);
//! assert_eq!(classify_correlation(0.9).unwrap().as_str(), "strong positive");
//! assert!(classify_correlation(f64::NAN).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Output language for sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

/// One of nine qualitative strength/direction labels.
///
/// Variants are declared in ascending order of `r`, so the derived `Ord`
/// follows the scale. Serialized as its [`as_str`](Self::as_str) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CorrelationLabel {
    #[serde(rename = "very strong negative")]
    VeryStrongNegative,
    #[serde(rename = "strong negative")]
    StrongNegative,
    #[serde(rename = "moderately strong negative")]
    ModeratelyStrongNegative,
    #[serde(rename = "weak negative")]
    WeakNegative,
    #[serde(rename = "negligible/no correlation")]
    Negligible,
    #[serde(rename = "weak positive")]
    WeakPositive,
    #[serde(rename = "moderately strong positive")]
    ModeratelyStrongPositive,
    #[serde(rename = "strong positive")]
    StrongPositive,
    #[serde(rename = "very strong positive")]
    VeryStrongPositive,
}

/// Lower (exclusive) bounds scanned top-down. Anything not above the last
/// threshold is [`CorrelationLabel::VeryStrongNegative`].
const THRESHOLDS: [(f64, CorrelationLabel); 8] = [
    (0.9, CorrelationLabel::VeryStrongPositive),
    (0.7, CorrelationLabel::StrongPositive),
    (0.4, CorrelationLabel::ModeratelyStrongPositive),
    (0.2, CorrelationLabel::WeakPositive),
    (-0.2, CorrelationLabel::Negligible),
    (-0.4, CorrelationLabel::WeakNegative),
    (-0.7, CorrelationLabel::ModeratelyStrongNegative),
    (-0.9, CorrelationLabel::StrongNegative),
];

impl CorrelationLabel {
    /// All labels in scale order, very strong negative first.
    pub const ALL: [CorrelationLabel; 9] = [
        CorrelationLabel::VeryStrongNegative,
        CorrelationLabel::StrongNegative,
        CorrelationLabel::ModeratelyStrongNegative,
        CorrelationLabel::WeakNegative,
        CorrelationLabel::Negligible,
        CorrelationLabel::WeakPositive,
        CorrelationLabel::ModeratelyStrongPositive,
        CorrelationLabel::StrongPositive,
        CorrelationLabel::VeryStrongPositive,
    ];

    /// Position on the scale: 0 for very strong negative, 8 for very strong
    /// positive.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Canonical short label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryStrongPositive => "very strong positive",
            Self::StrongPositive => "strong positive",
            Self::ModeratelyStrongPositive => "moderately strong positive",
            Self::WeakPositive => "weak positive",
            Self::Negligible => "negligible/no correlation",
            Self::WeakNegative => "weak negative",
            Self::ModeratelyStrongNegative => "moderately strong negative",
            Self::StrongNegative => "strong negative",
            Self::VeryStrongNegative => "very strong negative",
        }
    }

    /// Full sentence describing the relationship.
    pub fn sentence(self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                Self::VeryStrongPositive => "There is a very strong positive correlation.",
                Self::StrongPositive => "There is a strong positive correlation.",
                Self::ModeratelyStrongPositive => {
                    "There is a moderately strong positive correlation."
                }
                Self::WeakPositive => "There is a weak positive correlation.",
                Self::Negligible => "There is little to no correlation.",
                Self::WeakNegative => "There is a weak negative correlation.",
                Self::ModeratelyStrongNegative => {
                    "There is a moderately strong negative correlation."
                }
                Self::StrongNegative => "There is a strong negative correlation.",
                Self::VeryStrongNegative => "There is a very strong negative correlation.",
            },
            Language::Ja => match self {
                Self::VeryStrongPositive => "非常に強い正の相関があります",
                Self::StrongPositive => "強い正の相関があります",
                Self::ModeratelyStrongPositive => "やや強い正の相関があります",
                Self::WeakPositive => "弱い正の相関があります",
                Self::Negligible => "相関がほとんどありません",
                Self::WeakNegative => "弱い負の相関があります",
                Self::ModeratelyStrongNegative => "やや強い負の相関があります",
                Self::StrongNegative => "強い負の相関があります",
                Self::VeryStrongNegative => "非常に強い負の相関があります",
            },
        }
    }
}

impl fmt::Display for CorrelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a correlation coefficient.
///
/// # Errors
///
/// [`Error::InvalidInput`] if `r` is NaN, infinite, or outside `[-1, 1]`.
pub fn classify_correlation(r: f64) -> Result<CorrelationLabel> {
    if !r.is_finite() || !(-1.0..=1.0).contains(&r) {
        return Err(Error::InvalidInput(format!(
            "correlation coefficient must be a finite value in [-1, 1], got {r}"
        )));
    }

    Ok(THRESHOLDS
        .iter()
        .find(|&&(threshold, _)| r > threshold)
        .map_or(CorrelationLabel::VeryStrongNegative, |&(_, label)| label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(r: f64) -> CorrelationLabel {
        classify_correlation(r).expect("valid coefficient")
    }

    #[test]
    fn extremes_and_zero() {
        assert_eq!(label(1.0).as_str(), "very strong positive");
        assert_eq!(label(-1.0).as_str(), "very strong negative");
        assert_eq!(label(0.0).as_str(), "negligible/no correlation");
    }

    #[test]
    fn interior_of_each_bucket() {
        let cases = [
            (0.95, CorrelationLabel::VeryStrongPositive),
            (0.8, CorrelationLabel::StrongPositive),
            (0.5, CorrelationLabel::ModeratelyStrongPositive),
            (0.3, CorrelationLabel::WeakPositive),
            (0.1, CorrelationLabel::Negligible),
            (-0.1, CorrelationLabel::Negligible),
            (-0.3, CorrelationLabel::WeakNegative),
            (-0.5, CorrelationLabel::ModeratelyStrongNegative),
            (-0.8, CorrelationLabel::StrongNegative),
            (-0.95, CorrelationLabel::VeryStrongNegative),
        ];
        for (r, expected) in cases {
            assert_eq!(label(r), expected, "r = {r}");
        }
    }

    #[test]
    fn thresholds_fall_into_lower_bucket() {
        assert_eq!(label(0.9), CorrelationLabel::StrongPositive);
        assert_eq!(label(0.7), CorrelationLabel::ModeratelyStrongPositive);
        assert_eq!(label(0.4), CorrelationLabel::WeakPositive);
        assert_eq!(label(0.2), CorrelationLabel::Negligible);
        assert_eq!(label(-0.2), CorrelationLabel::WeakNegative);
        assert_eq!(label(-0.4), CorrelationLabel::ModeratelyStrongNegative);
        assert_eq!(label(-0.7), CorrelationLabel::StrongNegative);
        assert_eq!(label(-0.9), CorrelationLabel::VeryStrongNegative);
    }

    #[test]
    fn just_above_threshold_moves_up() {
        assert_eq!(label(0.9 + 1e-12), CorrelationLabel::VeryStrongPositive);
        assert_eq!(label(0.2 + 1e-12), CorrelationLabel::WeakPositive);
        assert_eq!(label(-0.9 + 1e-12), CorrelationLabel::StrongNegative);
    }

    #[test]
    fn rejects_invalid_input() {
        for r in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1.0001, -1.5] {
            assert!(
                matches!(classify_correlation(r), Err(Error::InvalidInput(_))),
                "r = {r} should be rejected"
            );
        }
    }

    #[test]
    fn ranks_follow_declaration_order() {
        for (i, l) in CorrelationLabel::ALL.iter().enumerate() {
            assert_eq!(l.rank() as usize, i);
        }
        assert!(CorrelationLabel::VeryStrongNegative < CorrelationLabel::Negligible);
        assert!(CorrelationLabel::Negligible < CorrelationLabel::VeryStrongPositive);
    }

    #[test]
    fn sentences() {
        assert_eq!(
            CorrelationLabel::VeryStrongPositive.sentence(Language::Ja),
            "非常に強い正の相関があります"
        );
        assert_eq!(
            CorrelationLabel::Negligible.sentence(Language::Ja),
            "相関がほとんどありません"
        );
        assert_eq!(
            CorrelationLabel::StrongNegative.sentence(Language::En),
            "There is a strong negative correlation."
        );
        assert_eq!(CorrelationLabel::WeakPositive.to_string(), "weak positive");
    }

    #[test]
    fn serializes_as_label_text() {
        let json = serde_json::to_string(&CorrelationLabel::ModeratelyStrongNegative)
            .expect("serialize");
        assert_eq!(json, "\"moderately strong negative\"");

        for label in CorrelationLabel::ALL {
            let json = serde_json::to_string(&label).expect("serialize");
            assert_eq!(json, format!("\"{}\"", label.as_str()));
            let back: CorrelationLabel = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, label);
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn total_over_domain(r in -1.0_f64..=1.0) {
            prop_assert!(classify_correlation(r).is_ok());
        }

        #[test]
        fn monotone(a in -1.0_f64..=1.0, b in -1.0_f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let l_lo = classify_correlation(lo).expect("in range");
            let l_hi = classify_correlation(hi).expect("in range");
            prop_assert!(l_lo.rank() <= l_hi.rank(), "{lo} → {l_lo}, {hi} → {l_hi}");
        }

        #[test]
        fn out_of_range_rejected(r in prop_oneof![1.0_f64 + 1e-9..1e6, -1e6_f64..-1.0 - 1e-9]) {
            prop_assert!(classify_correlation(r).is_err());
        }
    }
}
