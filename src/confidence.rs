/// Combines corroboration, key-field coverage and cross-source consistency
/// into a single [0, 1] trust score for a consolidated record.
///
/// Intentionally a simple explainable linear model rather than a learned
/// classifier: the priority is reproducibility and auditability of the
/// score. The weights are caller-supplied policy with defaults preserving
/// the historical constants.
use crate::config::ConfidenceWeights;
use crate::models::CanonicalRecord;

/// Scores the trustworthiness of a consolidated record.
///
/// Terms, each capped independently before summing:
/// - source count: `min(num_sources * per_source, source_cap)` — rewards
///   corroboration, saturating (at 3 sources with the defaults);
/// - coverage: fraction of the key-field set present in the record, scaled
///   by `coverage`;
/// - consistency: `consistency_ratio * consistency`, applied only when more
///   than one source exists — a single source cannot corroborate itself, so
///   its consistency term is 0, not 1.
///
/// The sum is clamped to [0, 1].
pub fn score_confidence(
    num_sources: usize,
    canonical: &CanonicalRecord,
    consistency_ratio: f64,
    weights: &ConfidenceWeights,
    key_fields: &[String],
) -> f64 {
    let mut score = (num_sources as f64 * weights.per_source).min(weights.source_cap);

    if !key_fields.is_empty() {
        let present = key_fields
            .iter()
            .filter(|field| canonical.has_field(field))
            .count();
        score += present as f64 / key_fields.len() as f64 * weights.coverage;
    }

    if num_sources > 1 {
        score += consistency_ratio.clamp(0.0, 1.0) * weights.consistency;
    }

    score.clamp(0.0, 1.0)
}
