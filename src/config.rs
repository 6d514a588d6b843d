use crate::models::{DEFAULT_COMPARABLE_FIELDS, DEFAULT_KEY_FIELDS};
use serde::{Deserialize, Serialize};

/// Weights of the confidence score terms.
///
/// The defaults are the historical policy (0.2 per source capped at 0.6,
/// 0.3 for coverage, 0.1 for consistency); they are empirical constants
/// with no stated derivation, so they are configuration rather than
/// hard-coded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    /// Score added per contributing source.
    pub per_source: f64,
    /// Cap on the source-count term.
    pub source_cap: f64,
    /// Weight of the key-field coverage fraction.
    pub coverage: f64,
    /// Weight of the consistency ratio (multi-source only).
    pub consistency: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            per_source: 0.2,
            source_cap: 0.6,
            coverage: 0.3,
            consistency: 0.1,
        }
    }
}

/// Caller-supplied policy for one fusion run.
///
/// The core never reads environment variables or config files; everything
/// arrives as plain parameters so independent invocations stay isolated and
/// parallelizable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Fields whose presence drives the coverage term of the confidence score.
    pub key_fields: Vec<String>,
    /// Fields expected to be stable across sources, checked for consistency.
    pub comparable_fields: Vec<String>,
    /// Confidence score weights.
    pub confidence: ConfidenceWeights,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            key_fields: DEFAULT_KEY_FIELDS.iter().map(|s| s.to_string()).collect(),
            comparable_fields: DEFAULT_COMPARABLE_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            confidence: ConfidenceWeights::default(),
        }
    }
}
