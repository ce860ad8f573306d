//! The structured problem record produced by problem analysis.
//!
//! The provider returns this shape as JSON (after contract validation and
//! defaulting); the record is then normalized defensively because the
//! provider is an untrusted text producer and may violate its own contract.

use serde::{Deserialize, Serialize};

/// How quickly the job needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Safety hazard, flooding, no power.
    Emergency,
    /// Needs attention within 24-48 hours.
    Soon,
    /// Can wait days or weeks.
    #[default]
    Flexible,
}

/// Job complexity as assessed from the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    #[default]
    Moderate,
    Complex,
}

/// A trade the provider believes the job needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeNeed {
    pub trade: String,
    /// Confidence for this trade, 0.0-1.0.
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

/// Extracted details about the problem itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemDetails {
    pub category: Option<String>,
    pub complexity: Complexity,
    pub location: Option<String>,
    pub symptoms: Vec<String>,
    pub possible_causes: Vec<String>,
    pub material_estimate: Option<String>,
    pub time_estimate: Option<String>,
}

/// Structured analysis of one customer request.
///
/// Created once per user turn; refined across turns by re-running analysis
/// with prior context merged into the raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// The customer's original description, as submitted.
    #[serde(default)]
    pub raw_text: String,
    /// Candidate trades, best first.
    pub trades: Vec<TradeNeed>,
    pub urgency: Urgency,
    #[serde(default)]
    pub urgency_reasoning: String,
    #[serde(default, rename = "problemDetails")]
    pub details: ProblemDetails,
    #[serde(default)]
    pub missing_info: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub needs_more_info: bool,
    #[serde(default)]
    pub safety_issues: Vec<String>,
    #[serde(default)]
    pub summary: String,
    /// Overall confidence in the analysis, 0.0-1.0.
    #[serde(default)]
    pub confidence: f64,
}

impl Problem {
    /// Enforces internal consistency on a provider-produced record.
    ///
    /// Invariant: `needs_more_info` is true whenever follow-up questions are
    /// present. The prompt instructs the provider to satisfy this, but the
    /// consumer cannot rely on it.
    pub fn normalize(mut self) -> Self {
        if !self.follow_up_questions.is_empty() {
            self.needs_more_info = true;
        }
        self.confidence = self.confidence.clamp(0.0, 1.0);
        for trade in &mut self.trades {
            trade.confidence = trade.confidence.clamp(0.0, 1.0);
        }
        self
    }

    /// The highest-confidence trade, if any was identified.
    pub fn primary_trade(&self) -> Option<&TradeNeed> {
        self.trades.first()
    }

    /// Estimated job duration in hours, parsed from the provider's free-text
    /// time estimate ("2-3 hours" -> 2.0). Falls back to `default` when the
    /// estimate is absent or unparseable.
    pub fn estimated_hours(&self, default: f64) -> f64 {
        let Some(estimate) = &self.details.time_estimate else {
            return default;
        };

        let leading: String = estimate
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        leading.parse().ok().filter(|h| *h > 0.0).unwrap_or(default)
    }
}
