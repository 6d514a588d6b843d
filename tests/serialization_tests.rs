/// Serialization contract tests
/// Every output type is a plain serializable structure for the report layer;
/// these tests pin the JSON shapes downstream consumers rely on
use company_fusion::models::{ConflictReason, FieldValue, Numeric};
use company_fusion::ranking::rank;
use company_fusion::{
    fuse, CanonicalRecord, FusionConfig, MarketPositionScore, PeerMetricSet, SourceRecord,
};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn test_unknown_serializes_as_null_not_zero() {
    assert_eq!(serde_json::to_value(Numeric::Unknown).unwrap(), json!(null));
    assert_eq!(serde_json::to_value(Numeric::Value(1200.0)).unwrap(), json!(1200.0));

    assert_eq!(serde_json::from_value::<Numeric>(json!(null)).unwrap(), Numeric::Unknown);
    assert_eq!(
        serde_json::from_value::<Numeric>(json!(1200.0)).unwrap(),
        Numeric::Value(1200.0)
    );
}

#[test]
fn test_field_values_stay_untagged() {
    // A JSON string and a JSON number are different facts
    assert_eq!(
        serde_json::from_str::<FieldValue>("\"50\"").unwrap(),
        FieldValue::Text("50".into())
    );
    assert_eq!(serde_json::from_str::<FieldValue>("50").unwrap(), FieldValue::Number(50.0));

    let nested = serde_json::from_value::<FieldValue>(json!({"email": "info@acme.it"})).unwrap();
    let mut expected = BTreeMap::new();
    expected.insert("email".to_string(), FieldValue::Text("info@acme.it".into()));
    assert_eq!(nested, FieldValue::Map(expected));
}

#[test]
fn test_source_record_reliability_defaults_to_one() {
    let record: SourceRecord = serde_json::from_value(json!({
        "source_id": "registry",
        "fields": {"company_name": "Acme Srl"}
    }))
    .unwrap();

    assert_eq!(record.reliability_weight, 1.0);
}

#[test]
fn test_canonical_record_round_trip() {
    let records = vec![
        SourceRecord::new("registry")
            .with_field("company_name", "Acme Srl")
            .with_field("vat_number", "IT01234567890"),
        SourceRecord::new("search-snippet")
            .with_field("company_name", "ACME SRL")
            // Invalid identifier lands in raw_conflicts, which must survive too
            .with_field("vat_number", "123"),
    ];
    let canonical = fuse(&records, &FusionConfig::default());
    assert_eq!(canonical.raw_conflicts.len(), 1);

    let encoded = serde_json::to_string(&canonical).unwrap();
    let decoded: CanonicalRecord = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, canonical);
    assert_eq!(decoded.raw_conflicts[0].reason, ConflictReason::InvalidIdentifier);
}

#[test]
fn test_market_position_round_trip() {
    let mut self_metrics = BTreeMap::new();
    self_metrics.insert("employees".to_string(), Numeric::Value(100.0));
    let peers = vec![
        PeerMetricSet::new("peer-0").with_metric("employees", 10.0),
        PeerMetricSet::new("peer-1").with_metric("employees", 200.0),
    ];
    let mut weights = BTreeMap::new();
    weights.insert("employees".to_string(), 1.0);

    let score = rank(&self_metrics, &peers, &weights).unwrap();
    let encoded = serde_json::to_string(&score).unwrap();
    let decoded: MarketPositionScore = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, score);
}

#[test]
fn test_peer_metric_set_preserves_unknowns() {
    let set = PeerMetricSet::new("silent")
        .with_metric("employees", 10.0)
        .with_metric("total_followers", Numeric::Unknown);

    let encoded = serde_json::to_value(&set).unwrap();
    assert_eq!(encoded["metrics"]["total_followers"], json!(null));

    let decoded: PeerMetricSet = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, set);
}
