//! In-memory booking store.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::ports::{BookingError, BookingRecord, BookingStatus, BookingStore, NewBooking};

/// Booking store backed by an in-memory vector.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    bookings: Arc<Mutex<Vec<BookingRecord>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All bookings so far, in creation order.
    pub fn all(&self) -> Vec<BookingRecord> {
        self.bookings.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn create(&self, booking: NewBooking) -> Result<BookingRecord, BookingError> {
        let record = BookingRecord {
            id: Uuid::new_v4(),
            worker_id: booking.worker_id,
            date: booking.date,
            time: booking.time,
            problem_summary: booking.problem_summary,
            estimated_cost: booking.estimated_cost,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };
        self.bookings.lock().unwrap().push(record.clone());
        Ok(record)
    }
}
