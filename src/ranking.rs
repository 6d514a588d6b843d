/// Places one entity's numeric metrics into percentiles among a peer set and
/// combines them into a weighted market-position score.
use crate::errors::CoreError;
use crate::models::{
    CanonicalRecord, MarketPositionScore, MetricPercentile, Numeric, PeerMetricSet,
};
use crate::normalize::normalize_numeric;
use std::collections::BTreeMap;

/// Neutral percentile used when no comparable peer exists.
const NEUTRAL_PERCENTILE: f64 = 50.0;

/// Ranks an entity's metrics against its peers.
///
/// Per metric present (non-unknown) in `self_metrics`:
/// - the comparison list contains only peers that also report the metric;
///   unknown peer values are excluded, never coerced to 0;
/// - the percentile is the 0-based rank of the value inserted into the
///   sorted peer list, scaled to [0, 100]; ties take the lower adjacent
///   percentile, never implying superiority over an equal peer;
/// - zero comparable peers default the percentile to 50 with
///   `low_confidence = true` instead of silently implying parity.
///
/// `overall_score` is the weighted average over metrics that have both a
/// percentile and a weight; weights need not sum to 1 — the divisor is the
/// sum of the weights actually used. A negative or non-finite weight is a
/// caller error, the only hard failure in the core.
pub fn rank(
    self_metrics: &BTreeMap<String, Numeric>,
    peers: &[PeerMetricSet],
    weights: &BTreeMap<String, f64>,
) -> Result<MarketPositionScore, CoreError> {
    for (metric, weight) in weights {
        if *weight < 0.0 || !weight.is_finite() {
            return Err(CoreError::InvalidWeight {
                metric: metric.clone(),
                weight: *weight,
            });
        }
    }

    let mut per_metric_percentile = BTreeMap::new();

    for (metric, value) in self_metrics {
        let Some(own) = value.value() else {
            continue;
        };

        let peer_values: Vec<f64> = peers
            .iter()
            .filter_map(|peer| peer.metrics.get(metric).and_then(Numeric::value))
            .collect();

        let entry = if peer_values.is_empty() {
            tracing::debug!("No comparable peers for metric {}, defaulting to neutral", metric);
            MetricPercentile {
                percentile: NEUTRAL_PERCENTILE,
                low_confidence: true,
            }
        } else {
            MetricPercentile {
                percentile: percentile_of(own, &peer_values),
                low_confidence: false,
            }
        };

        per_metric_percentile.insert(metric.clone(), entry);
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut any_confident = false;

    for (metric, weight) in weights {
        let Some(entry) = per_metric_percentile.get(metric) else {
            // Weights for metrics absent from self_metrics stay out of the
            // denominator.
            continue;
        };
        if *weight == 0.0 {
            continue;
        }
        weighted_sum += entry.percentile * weight;
        weight_total += weight;
        if !entry.low_confidence {
            any_confident = true;
        }
    }

    let (overall_score, low_confidence) = if weight_total > 0.0 {
        ((weighted_sum / weight_total).clamp(0.0, 100.0), !any_confident)
    } else {
        (NEUTRAL_PERCENTILE, true)
    };

    Ok(MarketPositionScore {
        per_metric_percentile,
        overall_score,
        low_confidence,
    })
}

/// Percentile of `value` among `peer_values`, in [0, 100].
///
/// Equivalent to inserting the value into the sorted peer list before any
/// equal peers and taking `index / (count - 1) * 100` over the combined
/// list, which reduces to the strictly-smaller count over the peer count.
fn percentile_of(value: f64, peer_values: &[f64]) -> f64 {
    let below = peer_values.iter().filter(|peer| **peer < value).count();
    (below as f64 / peer_values.len() as f64 * 100.0).clamp(0.0, 100.0)
}

/// Extracts a peer metric set from a consolidated record.
///
/// Selects the requested numeric fields (employees, organic_keywords,
/// total_backlinks, total_followers, ...) through the numeric normalizer;
/// fields that are absent or unparseable come out as unknown, never 0, so
/// they cannot bias a percentile.
pub fn metric_set_from_record(
    record: &CanonicalRecord,
    metric_fields: &[String],
    entity_label: impl Into<String>,
) -> PeerMetricSet {
    let mut set = PeerMetricSet::new(entity_label);
    for field in metric_fields {
        let value = record
            .field(field)
            .map(normalize_numeric)
            .unwrap_or(Numeric::Unknown);
        set.metrics.insert(field.clone(), value);
    }
    set
}
