//! TradeMatch - AI-driven trades matching and pricing.
//!
//! This crate turns a free-text service request ("my sink is leaking") into a
//! structured problem record, a ranked set of matched tradespeople, and an
//! itemized price quote per match, delegating all semantic work to an external
//! reasoning provider.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
