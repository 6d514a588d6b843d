//! Company Data Fusion Core
//!
//! This library merges heterogeneous, partially-overlapping extractions of
//! one real-world company (public registries, search snippets, social
//! scrapes, SEO feeds) into a single canonical record, scores the trust and
//! cross-source consistency of the merge, and ranks the entity's metrics
//! against discovered competitors.
//!
//! The core is pure, stateless computation: inputs arrive fully materialized
//! from the fetch/scrape layers, outputs are plain serializable structures
//! for the report layer, and identical ordered input always produces
//! identical output.
//!
//! # Modules
//!
//! - `config`: caller-supplied fusion policy (key fields, comparable fields,
//!   score weights).
//! - `confidence`: [0, 1] trust score for a consolidated record.
//! - `consistency`: cross-source agreement measurement.
//! - `consolidate`: field-by-field conflict resolution into one record.
//! - `errors`: contract-violation errors (data quality is never an error).
//! - `fusion`: the consolidate → consistency → confidence workflow.
//! - `insights`: typed digital-presence insight markers.
//! - `models`: source/canonical records, metric sets, score types.
//! - `normalize`: numeric and identifier normalization primitives.
//! - `ranking`: percentile-based market positioning against peers.
//! - `similarity`: tiered field-value agreement scoring.

pub mod config;
pub mod confidence;
pub mod consistency;
pub mod consolidate;
pub mod errors;
pub mod fusion;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod similarity;

pub use config::{ConfidenceWeights, FusionConfig};
pub use errors::CoreError;
pub use fusion::{fuse, fuse_with_report};
pub use models::{
    CanonicalRecord, ConsistencyReport, FieldAgreement, FieldValue, MarketPositionScore,
    MetricPercentile, Numeric, PeerMetricSet, RawConflict, SourceRecord,
};
