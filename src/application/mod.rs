//! Application layer - the pipeline orchestrator over the domain and ports.

mod engine;

pub use engine::{EngineError, MatchingEngine, TurnInput, TurnOutcome};
