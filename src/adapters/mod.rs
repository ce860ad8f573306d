//! Adapters - concrete implementations of the ports plus the HTTP boundary.

pub mod ai;
pub mod booking;
pub mod http;
pub mod roster;
