/// Fusion workflow for one entity.
///
/// This is the main entry point tying the pipeline together:
/// 1. Consolidate source records into a canonical record
/// 2. Score cross-source consistency
/// 3. Attach the confidence score
///
/// One call per entity; invocations share no state, so callers can fuse a
/// company and each of its competitors independently and in parallel, then
/// hand the results to the ranker.
use crate::config::FusionConfig;
use crate::confidence::score_confidence;
use crate::consistency::score_consistency;
use crate::consolidate::consolidate;
use crate::models::{CanonicalRecord, ConsistencyReport, SourceRecord};

/// Fuses source records into a confidence-scored canonical record.
pub fn fuse(records: &[SourceRecord], config: &FusionConfig) -> CanonicalRecord {
    fuse_with_report(records, config).0
}

/// Like [`fuse`], additionally returning the consistency report for callers
/// that surface per-field agreement diagnostics.
pub fn fuse_with_report(
    records: &[SourceRecord],
    config: &FusionConfig,
) -> (CanonicalRecord, ConsistencyReport) {
    let mut canonical = consolidate(records);
    let report = score_consistency(records, &config.comparable_fields);

    canonical.confidence_score = score_confidence(
        records.len(),
        &canonical,
        report.overall_ratio,
        &config.confidence,
        &config.key_fields,
    );

    tracing::debug!(
        "Fused {} source(s): confidence {:.3}, consistency {:.3}",
        records.len(),
        canonical.confidence_score,
        report.overall_ratio
    );

    (canonical, report)
}
