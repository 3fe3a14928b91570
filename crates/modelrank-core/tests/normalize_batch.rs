use modelrank_core::{
    normalize, normalize_batch, BenchmarkKey, BenchmarkScore, ModelTypeTable, NormalizationCause,
    RawRecord, FINE_TUNED_TAG,
};
use serde_json::json;

fn row(i: usize) -> RawRecord {
    RawRecord::new(json!({
        "fullname": format!("org/model-{i}"),
        "Precision": "bfloat16",
        "Model sha": format!("sha{i}"),
        "Chat Template": i % 2 == 0,
        "Type": "🔶 fine-tuned on domain-specific datasets",
        "Average ⬆️": i as f64 / 4.0,
        "BBH": 30.0,
        "BBH Raw": 0.3,
        "#Params (B)": 7.24
    }))
}

// ── Batch policy ──────────────────────────────────────────────────────────

#[test]
fn hundred_rows_with_three_malformed() {
    let mut raw: Vec<RawRecord> = (0..100).map(row).collect();
    raw[5] = RawRecord::new(json!("not a row"));
    raw[50] = RawRecord::new(json!(["org/model-50", 30.0]));
    raw[99] = RawRecord::new(json!(null));

    let batch = normalize_batch(&raw, &ModelTypeTable::default());

    assert_eq!(batch.total, 100);
    assert_eq!(batch.records.len(), 97);
    assert_eq!(batch.error_count, 3);
    assert_eq!(batch.errors.len(), 3);
    assert!(batch.duplicate_ids.is_empty());

    // Successes keep input order.
    assert_eq!(batch.records[0].name.as_deref(), Some("org/model-0"));
    assert_eq!(batch.records[5].name.as_deref(), Some("org/model-6"));
    assert_eq!(batch.records[96].name.as_deref(), Some("org/model-98"));

    assert_eq!(
        batch.errors[0].cause,
        NormalizationCause::NotAMapping { found: "string" }
    );
    assert_eq!(
        batch.errors[1].cause,
        NormalizationCause::NotAMapping { found: "array" }
    );
    assert_eq!(
        batch.errors[2].cause,
        NormalizationCause::NotAMapping { found: "null" }
    );
    assert!(batch.errors.iter().all(|e| e.identifier == "Unknown"));
}

#[test]
fn malformed_optional_cells_keep_the_record() {
    let raw = vec![
        RawRecord::new(json!({"fullname": "org/params", "BBH": 30.0, "#Params (B)": "N/A"})),
        RawRecord::new(json!({"fullname": "org/license", "BBH": 31.0, "Hub License": ["mit"]})),
        RawRecord::new(json!({"fullname": "org/hearts", "BBH": 32.0, "Hub ❤️": 3.5})),
        RawRecord::new(json!({"fullname": "org/score", "BBH": "broken", "IFEval": 70.0})),
    ];

    let batch = normalize_batch(&raw, &ModelTypeTable::default());

    assert_eq!(batch.records.len(), 4);
    assert_eq!(batch.error_count, 0);
    assert_eq!(batch.records[0].metadata.params_billions, None);
    assert_eq!(batch.records[1].metadata.license, None);
    assert_eq!(batch.records[2].metadata.hearts, Some(3.5));
    assert_eq!(batch.records[3].metric_value(BenchmarkKey::Bbh), None);
    assert_eq!(
        batch.records[3].metric_value(BenchmarkKey::Ifeval),
        Some(70.0)
    );
}

#[test]
fn duplicate_ids_are_reported_once_and_kept() {
    let raw = vec![row(1), row(1), row(1), row(2)];
    let batch = normalize_batch(&raw, &ModelTypeTable::default());
    assert_eq!(batch.records.len(), 4);
    assert_eq!(
        batch.duplicate_ids,
        vec!["org/model-1_bfloat16_sha1_False".to_string()]
    );
}

#[test]
fn type_distribution_uses_canonical_tags() {
    let mut raw: Vec<RawRecord> = (0..3).map(row).collect();
    raw.push(RawRecord::new(json!({"fullname": "org/base", "Type": "🟢 pretrained"})));
    raw.push(RawRecord::new(json!({
        "fullname": "org/merge",
        "Type": "🤝 base merges and moerges"
    })));
    let batch = normalize_batch(&raw, &ModelTypeTable::default());
    let counts = batch.type_counts();
    assert_eq!(counts.get(FINE_TUNED_TAG), Some(&3));
    assert_eq!(counts.get("pretrained"), Some(&1));
    assert_eq!(counts.get("basemergesandmoerges"), Some(&1));
}

// ── Single record ─────────────────────────────────────────────────────────

#[test]
fn missing_benchmarks_default_to_zero() {
    let record = normalize(
        &RawRecord::new(json!({"fullname": "org/sparse", "IFEval": 71.5})),
        &ModelTypeTable::default(),
    )
    .expect("sparse row normalizes");

    assert_eq!(record.id, "org/sparse_Unknown_Unknown_Unknown");
    assert_eq!(record.benchmarks.len(), BenchmarkKey::ALL.len());
    assert_eq!(
        record.benchmark(BenchmarkKey::Gpqa),
        BenchmarkScore::missing()
    );
    assert_eq!(record.metric_value(BenchmarkKey::Ifeval), Some(71.5));
    assert_eq!(record.model_type, "");
    assert_eq!(record.average_score, None);
    assert!(!record.has_chat_template);
}

#[test]
fn full_row_maps_metadata_and_features() {
    let record = normalize(
        &RawRecord::new(json!({
            "fullname": "org/full",
            "Precision": "float16",
            "Model sha": "abc123",
            "Chat Template": true,
            "Type": "💬 chat models (RLHF, DPO, IFT, ...)",
            "Weight type": "Original",
            "Architecture": "LlamaForCausalLM",
            "Average ⬆️": "35.5",
            "Available on the hub": true,
            "Merged": false,
            "MoE": 1,
            "Flagged": "false",
            "Official Providers": true,
            "Upload To Hub Date": "2024-06-01",
            "Submission Date": "2024-06-02",
            "Generation": 2,
            "Base Model": "org/base",
            "Hub License": "apache-2.0",
            "Hub ❤️": 120,
            "#Params (B)": 8.03,
            "CO₂ cost (kg)": 1.5,
            "MATH Lvl 5": 12.0,
            "MATH Lvl 5 Raw": 0.12
        })),
        &ModelTypeTable::default(),
    )
    .expect("full row normalizes");

    assert_eq!(record.id, "org/full_float16_abc123_True");
    assert_eq!(record.model_type, "chatmodels");
    assert_eq!(record.average_score, Some(35.5));
    assert!(record.has_chat_template);
    assert!(record.features.available_on_hub);
    assert!(record.features.moe);
    assert!(!record.features.flagged);
    assert!(record.features.official_provider);
    assert_eq!(record.metadata.generation, Some(2));
    assert_eq!(record.metadata.hearts, Some(120.0));
    assert_eq!(record.metadata.params_billions, Some(8.03));
    assert_eq!(record.metadata.license.as_deref(), Some("apache-2.0"));
    assert_eq!(
        record.benchmark(BenchmarkKey::Math),
        BenchmarkScore {
            raw_value: 0.12,
            normalized_score: 12.0,
            reported: true,
        }
    );
}
