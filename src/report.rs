//! Text and JSON rendering of an analysis [`Report`].

use std::fmt::Write as _;

use crate::analysis::{ColumnOutliers, Report};
use crate::error::Result;
use crate::interpretation::Language;

struct Headings {
    dataset: &'static str,
    coefficient: &'static str,
    interpretation: &'static str,
    regression: &'static str,
    outliers: &'static str,
    undefined: &'static str,
    none: &'static str,
}

fn headings(language: Language) -> Headings {
    match language {
        Language::En => Headings {
            dataset: "Dataset",
            coefficient: "Correlation coefficient",
            interpretation: "Interpretation",
            regression: "Regression line",
            outliers: "Outliers",
            undefined: "undefined (fewer than 2 complete pairs or a constant column)",
            none: "none",
        },
        Language::Ja => Headings {
            dataset: "データセット",
            coefficient: "相関係数",
            interpretation: "分析結果",
            regression: "回帰直線",
            outliers: "外れ値",
            undefined: "算出できません（有効なデータ組が2未満、または値が一定です）",
            none: "なし",
        },
    }
}

impl Report {
    /// Renders the report as plain text in `language`.
    pub fn render_text(&self, language: Language) -> String {
        let h = headings(language);
        let mut out = String::new();

        let _ = writeln!(out, "== {} ==", h.dataset);
        let _ = writeln!(out, "X: {}", self.x_column);
        let _ = writeln!(out, "Y: {}", self.y_column);
        if let (Some(column), Some(range)) = (&self.date_column, &self.date_range) {
            let _ = writeln!(out, "{column}: {} .. {}", range.start, range.end);
        }
        let _ = writeln!(
            out,
            "rows: {} / {} (pairs: {})",
            self.filtered_rows, self.total_rows, self.paired_rows
        );

        let _ = writeln!(out, "\n== {} ==", h.coefficient);
        match self.correlation {
            Some(c) => {
                let _ = writeln!(out, "{:.2}", c.r);
            }
            None => {
                let _ = writeln!(out, "{}", h.undefined);
            }
        }

        let _ = writeln!(out, "\n== {} ==", h.interpretation);
        match self.label {
            Some(label) => {
                let _ = writeln!(out, "{} ({label})", label.sentence(language));
            }
            None => {
                let _ = writeln!(out, "-");
            }
        }

        let _ = writeln!(out, "\n== {} ==", h.regression);
        match &self.regression {
            Some(model) => {
                let _ = writeln!(
                    out,
                    "{} = {:.4} + {:.4} * {}  (R² = {:.3})",
                    self.y_column, model.intercept, model.slope, self.x_column, model.r_squared
                );
            }
            None => {
                let _ = writeln!(out, "-");
            }
        }

        let _ = writeln!(out, "\n== {} ==", h.outliers);
        write_outliers(&mut out, &self.x_outliers, self.x_values(), h.none);
        write_outliers(&mut out, &self.y_outliers, self.y_values(), h.none);

        out
    }

    /// Pretty-printed JSON, including the scatter points.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn write_outliers(out: &mut String, outliers: &ColumnOutliers, values: &[f64], none: &str) {
    let flagged = outliers.flagged(values);
    let fence = outliers
        .fence
        .map(|f| format!(" [{:.4}, {:.4}]", f.lower, f.upper))
        .unwrap_or_default();
    if flagged.is_empty() {
        let _ = writeln!(out, "{}{fence}: {none}", outliers.column);
        return;
    }
    let list = flagged
        .iter()
        .map(|(row, v)| format!("row {}: {v}", row + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "{}{fence}: {list}", outliers.column);
}
