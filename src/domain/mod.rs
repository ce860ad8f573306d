//! Domain layer - the matching and pricing core.
//!
//! Pure types and logic: the problem record, the response contract, prompt
//! construction, the clarification gate, match/quote records, and the
//! per-session conversation state machine. Nothing in here performs I/O.

pub mod contract;
pub mod gate;
pub mod matching;
pub mod pricing;
pub mod problem;
pub mod prompts;
pub mod session;
pub mod worker;

pub use contract::{ContractError, ResponseContract};
pub use gate::{ClarificationGate, NextStep};
pub use matching::{MatchPreferences, MatchResult, MatchSet, RankedMatch, RecommendationLevel};
pub use pricing::{
    MarketContext, PriceAdjustment, PriceBreakdown, PricedMatch, Quote, QuoteAlternatives,
    QuoteOutcome, QuoteSource,
};
pub use problem::{Complexity, Problem, ProblemDetails, TradeNeed, Urgency};
pub use session::{ConversationState, Message, MessageRole, SessionError, TurnPhase};
pub use worker::{WorkerId, WorkerRecord};
