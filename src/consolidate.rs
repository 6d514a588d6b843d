/// Merges a list of source records into one canonical record per entity,
/// resolving conflicts field by field.
///
/// Conflict policy, per canonical field:
/// 1. No values — the field stays absent, no provenance.
/// 2. One distinct normalized value — chosen, every supplier in provenance.
/// 3. Multiple distinct values — the longest (most detailed) string wins;
///    ties go to the higher reliability weight, then first occurrence in
///    input order. Provenance keeps only the sources within similarity 0.8
///    of the choice; materially different values land in `raw_conflicts`.
///
/// Malformed individual fields never abort the merge: they are treated as
/// absent for scoring and preserved verbatim in the conflicts side-channel.
use crate::models::{
    CanonicalRecord, ConflictReason, FieldValue, RawConflict, SourceRecord, CANONICAL_FIELDS,
    NESTED_FIELDS,
};
use crate::normalize::normalize_vat;
use crate::similarity::{normalized_key, similarity};
use std::collections::BTreeMap;

/// Threshold above which two field values count as the same fact.
const NEAR_DUPLICATE_THRESHOLD: f64 = 0.8;

/// One source's value for one field, prepared for comparison.
struct Candidate {
    source_id: String,
    value: FieldValue,
    rendered: String,
    reliability: f64,
}

/// Consolidates source records into a single canonical record.
///
/// The result carries `confidence_score = 0.0`; attaching the score is the
/// job of the confidence scorer (see [`crate::fusion::fuse`]). Deterministic:
/// the same records in the same order always produce the same output.
pub fn consolidate(records: &[SourceRecord]) -> CanonicalRecord {
    let mut fields = BTreeMap::new();
    let mut provenance = BTreeMap::new();
    let mut raw_conflicts = Vec::new();

    // Every processed record contributes to data_sources, even when all of
    // its values lose conflict resolution for individual fields.
    let mut data_sources: Vec<String> = Vec::new();
    for record in records {
        if !data_sources.contains(&record.source_id) {
            data_sources.push(record.source_id.clone());
        }
    }

    for field in CANONICAL_FIELDS {
        if NESTED_FIELDS.contains(&field) {
            merge_nested_field(field, records, &mut fields, &mut provenance, &mut raw_conflicts);
        } else {
            let candidates = collect_scalar_candidates(field, records, &mut raw_conflicts);
            if let Some((chosen, supporters)) = choose_value(field, candidates, &mut raw_conflicts)
            {
                fields.insert(field.to_string(), chosen);
                provenance.insert(field.to_string(), supporters);
            }
        }
    }

    tracing::debug!(
        "Consolidated {} source(s) into {} field(s), {} conflict(s)",
        records.len(),
        fields.len(),
        raw_conflicts.len()
    );

    CanonicalRecord {
        fields,
        provenance,
        data_sources,
        confidence_score: 0.0,
        raw_conflicts,
    }
}

/// Gathers non-absent scalar values for a field across records, in input
/// order, normalizing identifier-shaped fields to their canonical form.
fn collect_scalar_candidates(
    field: &str,
    records: &[SourceRecord],
    raw_conflicts: &mut Vec<RawConflict>,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for record in records {
        let Some(value) = record.fields.get(field) else {
            continue;
        };
        if value.is_blank() {
            continue;
        }

        // A nested map in a scalar slot cannot be consolidated as a value.
        if value.as_map().is_some() {
            raw_conflicts.push(RawConflict {
                field_name: field.to_string(),
                source_id: record.source_id.clone(),
                value: value.clone(),
                reason: ConflictReason::UnparseableValue,
            });
            continue;
        }

        let mut chosen_value = value.clone();
        let mut rendered = value.render();

        if field == "vat_number" {
            match normalize_vat(&rendered) {
                Some(canonical) => {
                    chosen_value = FieldValue::Text(canonical.clone());
                    rendered = canonical;
                }
                None => {
                    tracing::warn!(
                        "Dropping invalid VAT from source {}: {:?}",
                        record.source_id,
                        rendered
                    );
                    raw_conflicts.push(RawConflict {
                        field_name: field.to_string(),
                        source_id: record.source_id.clone(),
                        value: value.clone(),
                        reason: ConflictReason::InvalidIdentifier,
                    });
                    continue;
                }
            }
        }

        candidates.push(Candidate {
            source_id: record.source_id.clone(),
            value: chosen_value,
            rendered,
            reliability: record.reliability_weight,
        });
    }

    candidates
}

/// Resolves a field's candidates into a chosen value and its provenance set.
fn choose_value(
    field: &str,
    candidates: Vec<Candidate>,
    raw_conflicts: &mut Vec<RawConflict>,
) -> Option<(FieldValue, Vec<String>)> {
    if candidates.is_empty() {
        return None;
    }

    let distinct = distinct_normalized(&candidates);

    if distinct <= 1 {
        // Everyone agrees; first occurrence keeps its original casing.
        let supporters = dedup_sources(candidates.iter().map(|c| c.source_id.as_str()));
        let chosen = candidates.into_iter().next()?;
        return Some((chosen.value, supporters));
    }

    // Conflicting values: most detailed wins. Length tie goes to the more
    // reliable source, then to the first occurrence.
    let mut best = 0;
    for (idx, candidate) in candidates.iter().enumerate().skip(1) {
        let current = &candidates[best];
        let len = candidate.rendered.chars().count();
        let best_len = current.rendered.chars().count();
        if len > best_len || (len == best_len && candidate.reliability > current.reliability) {
            best = idx;
        }
    }

    let chosen_rendered = candidates[best].rendered.clone();
    let mut supporters = Vec::new();
    for candidate in &candidates {
        if similarity(&candidate.rendered, &chosen_rendered) >= NEAR_DUPLICATE_THRESHOLD {
            if !supporters.contains(&candidate.source_id) {
                supporters.push(candidate.source_id.clone());
            }
        } else {
            tracing::debug!(
                "Source {} disagrees on {}: {:?} vs chosen {:?}",
                candidate.source_id,
                field,
                candidate.rendered,
                chosen_rendered
            );
            raw_conflicts.push(RawConflict {
                field_name: field.to_string(),
                source_id: candidate.source_id.clone(),
                value: candidate.value.clone(),
                reason: ConflictReason::Disagreement,
            });
        }
    }

    let chosen = candidates.into_iter().nth(best)?;
    Some((chosen.value, supporters))
}

/// Merges a nested-map field (contact_info, financial_data) key by key,
/// one level deep, applying the scalar conflict rule per leaf.
fn merge_nested_field(
    field: &str,
    records: &[SourceRecord],
    fields: &mut BTreeMap<String, FieldValue>,
    provenance: &mut BTreeMap<String, Vec<String>>,
    raw_conflicts: &mut Vec<RawConflict>,
) {
    let mut per_key: BTreeMap<String, Vec<Candidate>> = BTreeMap::new();

    for record in records {
        let Some(value) = record.fields.get(field) else {
            continue;
        };
        let Some(map) = value.as_map() else {
            // A scalar where a map is expected cannot be merged.
            raw_conflicts.push(RawConflict {
                field_name: field.to_string(),
                source_id: record.source_id.clone(),
                value: value.clone(),
                reason: ConflictReason::UnparseableValue,
            });
            continue;
        };

        for (key, leaf) in map {
            if leaf.is_blank() {
                continue;
            }
            if leaf.as_map().is_some() {
                // Nesting stops one level deep.
                raw_conflicts.push(RawConflict {
                    field_name: format!("{}.{}", field, key),
                    source_id: record.source_id.clone(),
                    value: leaf.clone(),
                    reason: ConflictReason::UnparseableValue,
                });
                continue;
            }
            per_key.entry(key.clone()).or_default().push(Candidate {
                source_id: record.source_id.clone(),
                value: leaf.clone(),
                rendered: leaf.render(),
                reliability: record.reliability_weight,
            });
        }
    }

    let mut merged = BTreeMap::new();
    let mut contributors: Vec<String> = Vec::new();

    for (key, candidates) in per_key {
        let path = format!("{}.{}", field, key);
        if let Some((chosen, supporters)) = choose_value(&path, candidates, raw_conflicts) {
            merged.insert(key, chosen);
            for source in &supporters {
                if !contributors.contains(source) {
                    contributors.push(source.clone());
                }
            }
            provenance.insert(path, supporters);
        }
    }

    if !merged.is_empty() {
        fields.insert(field.to_string(), FieldValue::Map(merged));
        provenance.insert(field.to_string(), contributors);
    }
}

/// Counts distinct values after case/whitespace normalization.
fn distinct_normalized(candidates: &[Candidate]) -> usize {
    let mut seen: Vec<String> = Vec::new();
    for candidate in candidates {
        let key = normalized_key(&candidate.rendered);
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen.len()
}

fn dedup_sources<'a>(sources: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for source in sources {
        if !out.iter().any(|s| s == source) {
            out.push(source.to_string());
        }
    }
    out
}
