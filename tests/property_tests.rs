/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use company_fusion::consolidate::consolidate;
use company_fusion::models::Numeric;
use company_fusion::normalize::{normalize_vat, parse_numeric};
use company_fusion::ranking::rank;
use company_fusion::similarity::similarity;
use company_fusion::{fuse, FusionConfig, PeerMetricSet, SourceRecord};
use proptest::prelude::*;
use std::collections::BTreeMap;

// Property: normalization should never panic and never fabricate data
proptest! {
    #[test]
    fn numeric_parsing_never_panics(raw in "\\PC*") {
        let _ = parse_numeric(&raw);
    }

    #[test]
    fn magnitude_suffixes_scale_correctly(n in 0u32..1_000_000u32) {
        prop_assert_eq!(parse_numeric(&format!("{}K", n)), Numeric::Value(n as f64 * 1e3));
        prop_assert_eq!(parse_numeric(&format!("{}M", n)), Numeric::Value(n as f64 * 1e6));
        prop_assert_eq!(parse_numeric(&format!("{}B", n)), Numeric::Value(n as f64 * 1e9));
    }

    #[test]
    fn plain_integers_parse_verbatim(n in 0u64..1_000_000_000u64) {
        prop_assert_eq!(parse_numeric(&n.to_string()), Numeric::Value(n as f64));
    }

    #[test]
    fn vat_normalization_never_panics(raw in "\\PC*") {
        if let Some(vat) = normalize_vat(&raw) {
            prop_assert!(vat.starts_with("IT"));
            prop_assert_eq!(vat.len(), 13);
            prop_assert!(vat[2..].chars().all(|c| c.is_ascii_digit()));
        }
    }
}

// Property: similarity is a fixed-tier metric, symmetric, reflexive on
// non-empty values
proptest! {
    #[test]
    fn similarity_stays_in_tier_set(a in "\\PC*", b in "\\PC*") {
        let score = similarity(&a, &b);
        prop_assert!(
            [0.0, 0.8, 0.9, 1.0].contains(&score),
            "unexpected tier {} for {:?} vs {:?}", score, a, b
        );
    }

    #[test]
    fn similarity_is_symmetric(a in "\\PC*", b in "\\PC*") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn similarity_reflexive_on_words(x in "[a-zA-Z][a-zA-Z0-9 ]{0,30}") {
        prop_assert_eq!(similarity(&x, &x), 1.0);
    }
}

fn arbitrary_records() -> impl Strategy<Value = Vec<SourceRecord>> {
    prop::collection::vec(
        (
            "[a-z]{1,8}",
            prop::collection::btree_map(
                prop::sample::select(vec!["company_name", "sector", "headquarters", "employees"]),
                "[a-zA-Z0-9 .]{0,20}",
                0..4,
            ),
        ),
        0..5,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(source_id, fields)| {
                let mut record = SourceRecord::new(source_id);
                for (name, value) in fields {
                    record = record.with_field(name, value);
                }
                record
            })
            .collect()
    })
}

// Property: consolidation and fusion are deterministic and bounded
proptest! {
    #[test]
    fn consolidation_is_deterministic(records in arbitrary_records()) {
        prop_assert_eq!(consolidate(&records), consolidate(&records));
    }

    #[test]
    fn every_field_has_provenance(records in arbitrary_records()) {
        let canonical = consolidate(&records);
        for field in canonical.fields.keys() {
            let supporters = canonical.provenance.get(field);
            prop_assert!(
                supporters.map(|s| !s.is_empty()).unwrap_or(false),
                "field {} has no provenance", field
            );
        }
    }

    #[test]
    fn confidence_stays_in_unit_interval(records in arbitrary_records()) {
        let canonical = fuse(&records, &FusionConfig::default());
        prop_assert!((0.0..=1.0).contains(&canonical.confidence_score));
    }

    #[test]
    fn corroboration_is_monotone(records in arbitrary_records()) {
        prop_assume!(!records.is_empty());
        let config = FusionConfig::default();
        let base = fuse(&records, &config).confidence_score;

        let mut extended = records.clone();
        let mut mirror = records[0].clone();
        mirror.source_id = "mirror-source".to_string();
        extended.push(mirror);

        prop_assert!(fuse(&extended, &config).confidence_score >= base - 1e-12);
    }
}

// Property: percentiles are bounded and deterministic
proptest! {
    #[test]
    fn percentiles_stay_in_range(
        own in 0.0f64..1e9,
        peer_values in prop::collection::vec(0.0f64..1e9, 0..20)
    ) {
        let mut self_metrics = BTreeMap::new();
        self_metrics.insert("employees".to_string(), Numeric::Value(own));
        let peers: Vec<PeerMetricSet> = peer_values
            .iter()
            .enumerate()
            .map(|(i, v)| PeerMetricSet::new(format!("peer-{}", i)).with_metric("employees", *v))
            .collect();
        let mut weights = BTreeMap::new();
        weights.insert("employees".to_string(), 1.0);

        let score = rank(&self_metrics, &peers, &weights).unwrap();
        let entry = score.per_metric_percentile.get("employees").unwrap();
        prop_assert!((0.0..=100.0).contains(&entry.percentile));
        prop_assert!((0.0..=100.0).contains(&score.overall_score));
        prop_assert_eq!(entry.low_confidence, peer_values.is_empty());
    }
}
