/// Measures how much independent sources agree on each comparable field.
///
/// Only fields expected to be stable across sources are checked (by default
/// company_name, vat_number and sector); volatile fields like revenue or
/// employee counts legitimately differ between registry snapshots and are
/// not evidence of bad data.
use crate::models::{ConsistencyReport, FieldAgreement, SourceRecord};
use crate::similarity::{normalized_key, similarity};

/// Agreement threshold for a field to count as consistent.
const CONSISTENT_THRESHOLD: f64 = 0.8;

/// Scores cross-source agreement over the given comparable fields.
///
/// A field enters the evaluation only when at least two sources supplied a
/// non-absent value; one or zero data points cannot be assessed. The field
/// counts as consistent when all values collapse to a single normalized form
/// or the best pairwise similarity across the distinct forms reaches 0.8.
///
/// `overall_ratio` is consistent / evaluated, and 1.0 by vacuous truth when
/// nothing could be evaluated — nothing to disagree on.
pub fn score_consistency(
    records: &[SourceRecord],
    comparable_fields: &[String],
) -> ConsistencyReport {
    let mut per_field = Vec::new();
    let mut consistent = 0usize;

    for field in comparable_fields {
        let values: Vec<String> = records
            .iter()
            .filter_map(|r| r.fields.get(field.as_str()))
            .filter(|v| !v.is_blank() && v.as_map().is_none())
            .map(|v| v.render())
            .collect();

        if values.len() < 2 {
            continue;
        }

        // Representatives of each distinct normalized form, in input order.
        let mut distinct: Vec<String> = Vec::new();
        for value in &values {
            let key = normalized_key(value);
            if !distinct.iter().any(|d| normalized_key(d) == key) {
                distinct.push(value.clone());
            }
        }

        let agreement_ratio = if distinct.len() <= 1 {
            1.0
        } else {
            let mut max_similarity: f64 = 0.0;
            for i in 0..distinct.len() {
                for j in (i + 1)..distinct.len() {
                    max_similarity = max_similarity.max(similarity(&distinct[i], &distinct[j]));
                }
            }
            max_similarity
        };

        if agreement_ratio >= CONSISTENT_THRESHOLD {
            consistent += 1;
        } else {
            tracing::debug!(
                "Sources disagree on {}: {} distinct value(s), best agreement {:.2}",
                field,
                distinct.len(),
                agreement_ratio
            );
        }

        per_field.push(FieldAgreement {
            field_name: field.clone(),
            distinct_normalized_values: distinct.len(),
            agreement_ratio,
        });
    }

    let overall_ratio = if per_field.is_empty() {
        1.0
    } else {
        consistent as f64 / per_field.len() as f64
    };

    ConsistencyReport {
        overall_ratio,
        per_field,
    }
}
