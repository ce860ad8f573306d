//! Worker records and identifiers.
//!
//! `WorkerRecord` is the authoritative entity owned by the roster
//! collaborator; the core only ever reads it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, unique worker identifier (e.g. "w1").
///
/// Kept as an opaque string rather than a UUID because roster ids originate
/// outside the core and are matched by exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A tradesperson as known to the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub name: String,
    pub trade: String,
    pub specialties: Vec<String>,
    /// Average rating, 0.0-5.0.
    pub rating: f64,
    pub review_count: u32,
    /// Distance from the customer, in miles.
    pub distance: f64,
    /// Base hourly rate in dollars.
    pub hourly_rate: f64,
    pub availability: Vec<String>,
    pub certifications: Vec<String>,
    /// Years of experience.
    pub experience: u32,
    pub completed_jobs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_id_round_trips_as_plain_string() {
        let id = WorkerId::new("w1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"w1\"");

        let back: WorkerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn worker_record_uses_camel_case_fields() {
        let worker = WorkerRecord {
            id: WorkerId::new("w1"),
            name: "Marcus Thompson".to_string(),
            trade: "Electrician".to_string(),
            specialties: vec!["Panel Upgrades".to_string()],
            rating: 4.8,
            review_count: 167,
            distance: 1.2,
            hourly_rate: 85.0,
            availability: vec!["tomorrow".to_string()],
            certifications: vec!["Master Electrician License".to_string()],
            experience: 12,
            completed_jobs: 340,
        };

        let json = serde_json::to_value(&worker).unwrap();
        assert_eq!(json["hourlyRate"], 85.0);
        assert_eq!(json["reviewCount"], 167);
        assert_eq!(json["completedJobs"], 340);
    }
}
