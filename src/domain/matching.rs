//! Match results and their join against the roster.

use serde::{Deserialize, Serialize};

use super::worker::{WorkerId, WorkerRecord};

/// How strongly the provider recommends a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    Excellent,
    #[default]
    Good,
    Fair,
}

/// One scored match as returned by the provider, before roster resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub worker_id: WorkerId,
    /// Suitability score, 0.0-1.0.
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub estimated_arrival: Option<String>,
    #[serde(default)]
    pub recommendation_level: RecommendationLevel,
}

/// A match joined with its authoritative worker record.
///
/// Only constructed for worker ids that resolved against the roster; matches
/// referencing nonexistent workers are dropped before this type exists, so a
/// `RankedMatch` can never point at a fabricated worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub worker: WorkerRecord,
    #[serde(flatten)]
    pub result: MatchResult,
}

impl RankedMatch {
    pub fn new(worker: WorkerRecord, result: MatchResult) -> Self {
        Self { worker, result }
    }
}

/// Customer preferences fed into the matching prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchPreferences {
    pub budget_range: Option<String>,
    pub timeline: Option<String>,
    pub quality_priority: Option<String>,
}

/// The matching stage's full output for one turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSet {
    /// Matches in the provider's ranking order.
    pub matches: Vec<RankedMatch>,
    /// Provider's overall matching summary.
    pub summary: Option<String>,
    /// Suggestions when no perfect match exists.
    pub alternatives: Option<String>,
}
