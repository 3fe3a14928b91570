use modelrank_core::{build_report, FetchError, RecordSource, ReportConfig};
use modelrank_hub::JsonFileSource;
use serde_json::json;

#[tokio::test]
async fn file_source_feeds_the_pipeline() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rows.json");
    let page = json!({
        "rows": [
            {"row_idx": 0, "row": {"fullname": "org/a", "Average ⬆️": 30.0, "BBH": 40.0, "MMLU-PRO": 20.0}},
            {"row_idx": 1, "row": {"fullname": "org/b", "Average ⬆️": 35.0, "BBH": 10.0, "MATH Lvl 5": 50.0}}
        ],
        "num_rows_total": 2
    });
    std::fs::write(&path, page.to_string()).expect("write dump");

    let source = JsonFileSource::new(&path);
    let rows = source.fetch_raw_records().await.expect("read dump");
    assert_eq!(rows.len(), 2);

    let report = build_report(&rows, &ReportConfig::default());
    assert_eq!(report.overall[0].model_id, "org/b_Unknown_Unknown_Unknown");
    assert!(report.summary().failed_domains().is_empty());
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = JsonFileSource::new(dir.path().join("absent.json"));
    assert!(matches!(
        source.fetch_raw_records().await,
        Err(FetchError::Io(_))
    ));
    assert!(source.describe().starts_with("file "));
}
