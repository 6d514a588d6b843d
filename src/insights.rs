/// Threshold-based digital-presence insights over consolidated metrics.
///
/// The core marks facts, never writes user-facing text: insights are typed
/// markers grouped into strengths, weaknesses and opportunities, and the
/// report layer decides how to render them. Metrics that are unknown yield
/// no insight in either direction.
use crate::models::Numeric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single insight marker derived from numeric thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insight {
    /// More than 500 organic keywords.
    StrongSeoPresence,
    /// Domain authority score above 50.
    HighDomainAuthority,
    /// Active on at least 4 social platforms.
    DiversifiedSocialPresence,
    /// Fewer than 100 organic keywords.
    LimitedSeoPresence,
    /// Fewer than 1000 total followers.
    SmallFollowerBase,
    /// Has organic keywords to build a content strategy on.
    SeoContentOpportunity,
    /// Active on fewer than 5 platforms: room to expand.
    SocialExpansionOpportunity,
}

/// Insight markers grouped by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InsightsSummary {
    pub strengths: Vec<Insight>,
    pub weaknesses: Vec<Insight>,
    pub opportunities: Vec<Insight>,
}

/// Derives insight markers from consolidated digital-presence metrics.
///
/// Recognized metric names: `organic_keywords`, `authority_score`,
/// `active_platforms`, `total_followers`. Others are ignored.
pub fn summarize_insights(metrics: &BTreeMap<String, Numeric>) -> InsightsSummary {
    let mut summary = InsightsSummary::default();
    let get = |name: &str| metrics.get(name).and_then(Numeric::value);

    if let Some(keywords) = get("organic_keywords") {
        if keywords > 500.0 {
            summary.strengths.push(Insight::StrongSeoPresence);
        }
        if keywords < 100.0 {
            summary.weaknesses.push(Insight::LimitedSeoPresence);
        }
        if keywords > 0.0 {
            summary.opportunities.push(Insight::SeoContentOpportunity);
        }
    }

    if let Some(authority) = get("authority_score") {
        if authority > 50.0 {
            summary.strengths.push(Insight::HighDomainAuthority);
        }
    }

    if let Some(platforms) = get("active_platforms") {
        if platforms >= 4.0 {
            summary.strengths.push(Insight::DiversifiedSocialPresence);
        }
        if platforms < 5.0 {
            summary.opportunities.push(Insight::SocialExpansionOpportunity);
        }
    }

    if let Some(followers) = get("total_followers") {
        if followers < 1000.0 {
            summary.weaknesses.push(Insight::SmallFollowerBase);
        }
    }

    summary
}

/// Tiered engagement score over per-platform follower counts.
///
/// Each platform scores 5/4/3/2/1 at the >10k / >5k / >1k / >100 / rest
/// follower tiers; the result is the average over platforms with a known
/// count. No known platform means no score, not zero.
pub fn engagement_score(platform_followers: &BTreeMap<String, Numeric>) -> Numeric {
    let mut total = 0.0;
    let mut counted = 0usize;

    for followers in platform_followers.values() {
        let Some(count) = followers.value() else {
            continue;
        };
        total += match count {
            c if c > 10_000.0 => 5.0,
            c if c > 5_000.0 => 4.0,
            c if c > 1_000.0 => 3.0,
            c if c > 100.0 => 2.0,
            _ => 1.0,
        };
        counted += 1;
    }

    if counted == 0 {
        Numeric::Unknown
    } else {
        Numeric::Value(total / counted as f64)
    }
}
