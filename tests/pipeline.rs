//! End-to-end: CSV file on disk → date filter → analysis → rendered output.

use std::io::Write;

use chrono::NaiveDate;
use corr_easy::analysis::{analyze, AnalysisOptions, AnalysisRequest};
use corr_easy::dataset::{DateRange, Table};
use corr_easy::interpretation::{CorrelationLabel, Language};
use corr_easy::Error;
use tempfile::NamedTempFile;

const SALES: &str = "\
updated_at,temperature,ice_cream_sales,hot_drink_sales,store
2023年1月,3.1,120,880,tokyo
2023年2月,4.0,135,860,tokyo
2023年3月,8.5,180,790,tokyo
2023年4月,13.9,260,640,tokyo
2023年5月,18.7,340,520,tokyo
2023年6月,22.3,410,430,tokyo
2023年7月,26.8,530,300,tokyo
2023年8月,27.9,560,280,tokyo
2023年9月,24.1,450,350,tokyo
2023年10月,18.4,320,540,tokyo
2023年11月,12.6,230,690,tokyo
2023年12月,6.2,150,820,tokyo
";

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file.flush().expect("flush");
    file
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn full_year_from_file() {
    let file = write_csv(SALES);
    let table = Table::from_path(file.path()).expect("load");

    assert_eq!(table.detect_date_column(), Some("updated_at"));
    assert_eq!(
        table.selectable_columns(table.detect_date_column()),
        vec!["temperature", "ice_cream_sales", "hot_drink_sales", "store"]
    );
    assert_eq!(
        table.numeric_columns(),
        vec!["temperature", "ice_cream_sales", "hot_drink_sales"]
    );

    let options = AnalysisOptions::default();
    let positive = analyze(
        &table,
        &AnalysisRequest::new("temperature", "ice_cream_sales"),
        &options,
    )
    .expect("analyze");
    assert_eq!(positive.filtered_rows, 12);
    assert_eq!(positive.label, Some(CorrelationLabel::VeryStrongPositive));
    assert!(positive.regression.as_ref().expect("fit").slope > 0.0);

    let negative = analyze(
        &table,
        &AnalysisRequest::new("temperature", "hot_drink_sales"),
        &options,
    )
    .expect("analyze");
    assert_eq!(negative.label, Some(CorrelationLabel::VeryStrongNegative));
}

#[test]
fn summer_only_range() {
    let file = write_csv(SALES);
    let table = Table::from_path(file.path()).expect("load");
    let range = DateRange::new(ymd(2023, 6, 1), ymd(2023, 9, 1)).expect("ordered");

    let report = analyze(
        &table,
        &AnalysisRequest::new("temperature", "ice_cream_sales").with_date_range(range),
        &AnalysisOptions::default(),
    )
    .expect("analyze");

    assert_eq!(report.total_rows, 12);
    assert_eq!(report.filtered_rows, 4);
    assert_eq!(report.date_range, Some(range));

    let text = report.render_text(Language::Ja);
    assert!(text.contains("updated_at: 2023-06-01 .. 2023-09-01"), "{text}");
}

#[test]
fn outlier_row_is_flagged_in_json() {
    let csv = "\
date,x,y
2024-01-01,10,1.0
2024-01-02,12,2.1
2024-01-03,11,2.9
2024-01-04,13,4.2
2024-01-05,12,5.0
2024-01-06,500,6.1
";
    let file = write_csv(csv);
    let table = Table::from_path(file.path()).expect("load");
    let report = analyze(&table, &AnalysisRequest::new("x", "y"), &AnalysisOptions::default())
        .expect("analyze");

    assert_eq!(report.x_outliers.mask.indices(), vec![5]);
    assert_eq!(report.y_outliers.mask.count(), 0);

    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("serialize")).expect("parse");
    let flagged: Vec<bool> = json["points"]
        .as_array()
        .expect("points array")
        .iter()
        .map(|p| p["x_outlier"].as_bool().expect("bool"))
        .collect();
    assert_eq!(flagged, vec![false, false, false, false, false, true]);
}

#[test]
fn malformed_file_is_an_error_not_an_empty_table() {
    let file = write_csv("a,b\n1,2\n3,4,5\n");
    assert!(matches!(Table::from_path(file.path()), Err(Error::Csv(_))));
}
