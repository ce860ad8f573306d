//! Booking Store Port - single write seam used after the pipeline completes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::WorkerId;

/// Store for confirmed bookings.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists a booking and returns the confirmed record.
    async fn create(&self, booking: NewBooking) -> Result<BookingRecord, BookingError>;
}

/// Input for a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub worker_id: WorkerId,
    /// Requested date, as entered by the customer.
    pub date: String,
    /// Requested time slot.
    pub time: String,
    pub problem_summary: String,
    /// Quoted cost in whole dollars.
    pub estimated_cost: u64,
}

/// A confirmed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub worker_id: WorkerId,
    pub date: String,
    pub time: String,
    pub problem_summary: String,
    pub estimated_cost: u64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// Booking store errors.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("unknown worker: {0}")]
    UnknownWorker(WorkerId),

    #[error("booking store unavailable: {0}")]
    Unavailable(String),
}
