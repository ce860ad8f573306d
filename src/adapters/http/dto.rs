//! HTTP DTOs for the matching API.
//!
//! These types decouple the HTTP surface from domain types. Field names are
//! camelCase to match what the web client sends and expects.

use serde::{Deserialize, Serialize};

use crate::domain::{
    MarketContext, MatchPreferences, PricedMatch, Problem, WorkerRecord,
};
use crate::ports::BookingRecord;

// ---- Request DTOs ----

/// Request to analyze a free-text problem description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeProblemRequest {
    pub description: String,
    /// Base64-encoded JPEG photos of the problem, if any.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Request to match and price workers for an analyzed problem.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindWorkersRequest {
    pub problem: Problem,
    #[serde(default)]
    pub preferences: MatchPreferences,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub market: MarketContext,
}

/// Request to book a worker.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub worker_id: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub problem_summary: String,
    #[serde(default)]
    pub estimated_cost: u64,
}

/// Query parameters for listing workers.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WorkersQuery {
    pub trade: Option<String>,
}

// ---- Response DTOs ----

/// What the client should do after analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NextStepDto {
    AskFollowUp,
    Unresolved,
    Proceed,
}

/// Response for problem analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeProblemResponse {
    pub problem: Problem,
    pub next_step: NextStepDto,
    /// Follow-up questions when `next_step` is `askFollowUp`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
    /// Free-form reply when `next_step` is `unresolved`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

/// Response for matching and pricing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindWorkersResponse {
    pub matches: Vec<PricedMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<String>,
    /// Free-form reply when no workers matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

/// Response for listing workers.
#[derive(Debug, Clone, Serialize)]
pub struct WorkersResponse {
    pub workers: Vec<WorkerRecord>,
}

/// Response for a confirmed booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub booking: BookingRecord,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }

    pub fn not_found(what: &str, id: &str) -> Self {
        Self::new("not_found", format!("{} not found: {}", what, id))
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new("upstream_error", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}
