//! Ports - trait seams for external collaborators.
//!
//! The core never talks to the outside world directly: the reasoning
//! provider, the worker roster, and the booking store are all injected
//! through the traits defined here.

mod booking;
mod reasoning;
mod roster;

pub use booking::{BookingError, BookingRecord, BookingStatus, BookingStore, NewBooking};
pub use reasoning::{
    ImageAttachment, ReasoningError, ReasoningProvider, ReasoningRequest, ReasoningResponse,
};
pub use roster::{RosterError, WorkerRoster};
