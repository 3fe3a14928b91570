use modelrank_core::{
    normalize_batch, score_domain, BenchmarkKey, DomainConfig, DomainScorer, MetricWeight,
    ModelRecord, ModelTypeTable, RawRecord, ReportConfig, ScoringError,
};
use serde_json::{json, Value};

fn records(rows: Vec<Value>) -> Vec<ModelRecord> {
    let raw: Vec<RawRecord> = rows.into_iter().map(RawRecord::new).collect();
    let batch = normalize_batch(&raw, &ModelTypeTable::default());
    assert_eq!(batch.error_count, 0);
    batch.records
}

#[test]
fn legal_board_drops_records_without_used_metrics() {
    let records = records(vec![
        json!({"fullname": "org/modelA", "IFEval": 0.8, "BBH": 0.6}),
        json!({"fullname": "org/modelB", "IFEval": 0.4}),
    ]);
    let board = score_domain(&records, "legal", &ReportConfig::default()).expect("legal scores");

    assert_eq!(board.used_metrics, vec![BenchmarkKey::Bbh]);
    assert_eq!(board.skipped_metrics, vec![BenchmarkKey::MmluPro]);
    assert_eq!(board.dropped, 1);
    assert_eq!(board.entries.len(), 1);

    let entry = &board.entries[0];
    assert_eq!(entry.model_id, "org/modelA_Unknown_Unknown_Unknown");
    assert!((entry.domain_average - 0.6).abs() < 1e-12);
    assert_eq!(entry.rank, 1);
}

#[test]
fn distinct_averages_sort_strictly_descending() {
    let records = records(
        [12.0, 48.5, 3.25, 30.0, 47.0]
            .iter()
            .enumerate()
            .map(|(i, bbh)| json!({"fullname": format!("org/m{i}"), "BBH": bbh, "MMLU-PRO": 20.0}))
            .collect(),
    );
    let board = score_domain(&records, "medical", &ReportConfig::default()).expect("score");

    for pair in board.entries.windows(2) {
        assert!(pair[0].domain_average > pair[1].domain_average);
    }
    for (idx, entry) in board.entries.iter().enumerate() {
        assert_eq!(entry.rank, idx + 1);
    }
    let order: Vec<&str> = board
        .resolve(&records)
        .map(|(_, record)| record.display_name())
        .collect();
    assert_eq!(order, vec!["org/m1", "org/m4", "org/m3", "org/m0", "org/m2"]);
}

#[test]
fn ties_keep_input_order() {
    let records = records(vec![
        json!({"fullname": "org/first", "BBH": 40.0}),
        json!({"fullname": "org/top", "BBH": 90.0}),
        json!({"fullname": "org/second", "BBH": 40.0}),
        json!({"fullname": "org/third", "BBH": 40.0}),
    ]);
    let board = score_domain(&records, "legal", &ReportConfig::default()).expect("score");
    let ids: Vec<&str> = board
        .resolve(&records)
        .map(|(_, record)| record.display_name())
        .collect();
    assert_eq!(ids, vec!["org/top", "org/first", "org/second", "org/third"]);
    assert_eq!(
        board.entries.iter().map(|e| e.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn empty_batch_gives_empty_board_for_known_domain() {
    let config = ReportConfig::default();
    for key in config.domain_keys() {
        let board = score_domain(&[], key, &config).expect("known domain");
        assert!(board.is_empty());
        assert_eq!(board.dropped, 0);
    }
}

#[test]
fn unknown_domain_fails_even_on_empty_batch() {
    let err = score_domain(&[], "astrology", &ReportConfig::default()).expect_err("unknown");
    assert_eq!(
        err,
        ScoringError::UnknownDomain {
            domain: "astrology".to_string()
        }
    );
}

#[test]
fn schema_drift_is_no_usable_metrics() {
    let records = records(vec![json!({"fullname": "org/a", "IFEval": 50.0, "MUSR": 10.0})]);
    let err = score_domain(&records, "finance", &ReportConfig::default()).expect_err("drift");
    match err {
        ScoringError::NoUsableMetrics { domain, configured } => {
            assert_eq!(domain, "finance");
            assert_eq!(
                configured,
                vec![BenchmarkKey::Math, BenchmarkKey::MmluPro, BenchmarkKey::Bbh]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_domain_table() {
    let domains = vec![DomainConfig::new(
        "reasoning",
        "Reasoning",
        "🧠",
        vec![
            MetricWeight::new(BenchmarkKey::Musr, 1.0),
            MetricWeight::new(BenchmarkKey::Gpqa, 3.0),
        ],
    )];
    let records = records(vec![
        json!({"fullname": "org/a", "MUSR": 20.0, "GPQA": 10.0}),
        json!({"fullname": "org/b", "MUSR": 5.0}),
    ]);
    let board = DomainScorer::from_domains(&domains)
        .score(&records, "reasoning")
        .expect("score");
    // a: (20 + 30) / 4 = 12.5; b: 5 / 1 = 5
    assert!((board.entries[0].domain_average - 12.5).abs() < 1e-12);
    assert!((board.entries[1].domain_average - 5.0).abs() < 1e-12);
    assert_eq!(board.entries[1].used_metrics, vec![BenchmarkKey::Musr]);
}
