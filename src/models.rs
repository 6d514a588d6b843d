use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============ Canonical Schema ============

/// The fixed set of canonical field names every source extraction is mapped into.
///
/// Upstream extraction layers (search snippets, registry scrapes, SEO feeds)
/// must translate their output into these names before the core sees it.
pub const CANONICAL_FIELDS: [&str; 13] = [
    "company_name",
    "vat_number",
    "fiscal_code",
    "legal_form",
    "share_capital",
    "revenue",
    "employees",
    "headquarters",
    "sector",
    "founding_date",
    "legal_representative",
    "contact_info",
    "financial_data",
];

/// Canonical fields holding a one-level nested map instead of a scalar.
pub const NESTED_FIELDS: [&str; 2] = ["contact_info", "financial_data"];

/// Key fields used by default for confidence coverage scoring.
pub const DEFAULT_KEY_FIELDS: [&str; 4] = ["company_name", "vat_number", "headquarters", "sector"];

/// Fields expected to be stable across sources, checked by default for consistency.
pub const DEFAULT_COMPARABLE_FIELDS: [&str; 3] = ["company_name", "vat_number", "sector"];

// ============ Field Values ============

/// A single extracted field value.
///
/// Scalars are either free text or an already-decoded number; `contact_info`
/// and `financial_data` carry a one-level nested map. Absence of a field is
/// represented by the key missing from the record map, never by a sentinel
/// value here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free-text value as extracted upstream.
    Text(String),
    /// Already-numeric value.
    Number(f64),
    /// One-level nested map (contact_info, financial_data).
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns the text content if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the nested map if this is a `Map` value.
    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Renders a scalar value as a comparison string.
    ///
    /// Numbers render without a trailing `.0` so `50` and `"50"` from two
    /// sources compare as the same fact. Maps render as empty (they are
    /// merged key-by-key, never compared wholesale).
    pub fn render(&self) -> String {
        match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            FieldValue::Map(_) => String::new(),
        }
    }

    /// True for empty or whitespace-only text and empty maps.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
            FieldValue::Map(m) => m.is_empty(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// A numeric value with an explicit "no usable value" sentinel.
///
/// `Unknown` is distinct from zero: a company reporting 0 employees is a data
/// point, a company with no employee figure is not. Serializes as a plain
/// number, or `null` for `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// A usable numeric value.
    Value(f64),
    /// No usable value could be extracted.
    Unknown,
}

impl Numeric {
    /// Returns the inner value, or `None` for `Unknown`.
    pub fn value(&self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(*v),
            Numeric::Unknown => None,
        }
    }

    /// True when no usable value is present.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Numeric::Unknown)
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        Numeric::Value(v)
    }
}

// ============ Source & Canonical Records ============

fn default_reliability() -> f64 {
    1.0
}

/// One source's extraction of a single company, with provenance.
///
/// Created once per successful extraction attempt, immutable, and discarded
/// after being folded into a [`CanonicalRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Identifier of the origin (e.g. "registry", "search-snippet", "semrush").
    pub source_id: String,
    /// Mapping from canonical field name to raw value.
    pub fields: BTreeMap<String, FieldValue>,
    /// Scalar in (0, 1], default 1.0. Tie-break hint only; never used to
    /// silently discard data.
    #[serde(default = "default_reliability")]
    pub reliability_weight: f64,
}

impl SourceRecord {
    /// Creates an empty record for the given source.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            fields: BTreeMap::new(),
            reliability_weight: 1.0,
        }
    }

    /// Adds a field value, consuming and returning the record.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the reliability weight, consuming and returning the record.
    pub fn with_reliability(mut self, weight: f64) -> Self {
        self.reliability_weight = weight;
        self
    }
}

/// Why a raw value was kept out of the canonical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// The value could not be normalized into the field's expected shape.
    UnparseableValue,
    /// A VAT-like identifier failed length or checksum validation.
    InvalidIdentifier,
    /// The value materially disagrees with the chosen canonical value.
    Disagreement,
}

/// A raw value excluded from the canonical record, preserved for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConflict {
    /// Canonical field (dotted path for nested keys, e.g. "contact_info.email").
    pub field_name: String,
    /// Source that supplied the excluded value.
    pub source_id: String,
    /// The excluded value, verbatim.
    pub value: FieldValue,
    /// Why it was excluded.
    pub reason: ConflictReason,
}

/// The consolidated, confidence-scored view of one company.
///
/// Built once by the consolidator from a fixed list of source records and
/// treated as immutable afterward. Every field value present has at least one
/// supporting source in `provenance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Chosen value per canonical field. Absent keys had no usable values.
    pub fields: BTreeMap<String, FieldValue>,
    /// Per field (dotted path for nested keys), the sources supporting the
    /// chosen value.
    pub provenance: BTreeMap<String, Vec<String>>,
    /// Every contributing source id, deduplicated, in processing order.
    pub data_sources: Vec<String>,
    /// Trust score in [0, 1]; deterministic for a given ordered input list.
    pub confidence_score: f64,
    /// Values excluded from the canonical output, kept for diagnostics.
    pub raw_conflicts: Vec<RawConflict>,
}

impl CanonicalRecord {
    /// Looks up a canonical field value.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Looks up a canonical field rendered as a comparison string.
    pub fn field_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(FieldValue::render)
    }

    /// True when the field has a non-blank canonical value.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.get(name).map(|v| !v.is_blank()).unwrap_or(false)
    }
}

// ============ Consistency ============

/// Cross-source agreement for one comparable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAgreement {
    /// Canonical field name.
    pub field_name: String,
    /// Number of distinct normalized values seen across sources.
    pub distinct_normalized_values: usize,
    /// Agreement in [0, 1]: 1.0 when all sources collapse to one value,
    /// otherwise the best pairwise similarity across distinct values.
    pub agreement_ratio: f64,
}

/// Result of the consistency check over a set of source records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Fraction of evaluated fields on which sources agree, in [0, 1].
    /// 1.0 by vacuous truth when no field had two or more values.
    pub overall_ratio: f64,
    /// Per-field detail for every field that could be evaluated.
    pub per_field: Vec<FieldAgreement>,
}

// ============ Market Position ============

/// Numeric metrics for one competitor, used for percentile ranking.
///
/// Missing metrics are [`Numeric::Unknown`], never zero, so absent data
/// cannot drag a percentile down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerMetricSet {
    /// Display label of the peer entity (name or domain).
    pub entity_label: String,
    /// Metric name to value (employees, organic_keywords, total_followers, ...).
    pub metrics: BTreeMap<String, Numeric>,
}

impl PeerMetricSet {
    /// Creates an empty metric set for the given peer.
    pub fn new(entity_label: impl Into<String>) -> Self {
        Self {
            entity_label: entity_label.into(),
            metrics: BTreeMap::new(),
        }
    }

    /// Adds a metric, consuming and returning the set.
    pub fn with_metric(mut self, name: impl Into<String>, value: impl Into<Numeric>) -> Self {
        self.metrics.insert(name.into(), value.into());
        self
    }
}

/// One metric's percentile standing among peers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPercentile {
    /// Percentile in [0, 100].
    pub percentile: f64,
    /// True when no comparable peer reported this metric and the neutral
    /// default of 50 was used.
    pub low_confidence: bool,
}

/// Relative market standing of one entity against its peer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPositionScore {
    /// Percentile per ranked metric.
    pub per_metric_percentile: BTreeMap<String, MetricPercentile>,
    /// Weighted combination of per-metric percentiles, in [0, 100].
    pub overall_score: f64,
    /// True when every metric that fed `overall_score` was low-confidence
    /// (including the zero-peer case).
    pub low_confidence: bool,
}
