//! Per-session conversation state machine.
//!
//! Each session owns one `ConversationState`; sessions never share mutable
//! state. The phase machine runs
//! `AwaitingInput -> Analyzing -> {AwaitingClarification | Matching} ->
//! Pricing -> Resolved`. A `Resolved` session holds its matches until the
//! customer's next message re-enters `Analyzing`, and
//! `AwaitingClarification` returns to `Analyzing` once the customer answers.
//! Any failure drops back to `AwaitingInput`; there is no automatic retry
//! loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::pricing::PricedMatch;
use super::problem::Problem;

/// Where the session currently sits in the turn pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    AwaitingInput,
    Analyzing,
    AwaitingClarification,
    Matching,
    Pricing,
    Resolved,
}

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry in the session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Problem record this message carried, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_problem: Option<Problem>,
    /// Priced matches this message carried, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attached_matches: Option<Vec<PricedMatch>>,
}

impl Message {
    fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
            attached_problem: None,
            attached_matches: None,
        }
    }
}

/// State machine errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: TurnPhase, to: TurnPhase },
}

/// Accumulated state for one customer session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: Uuid,
    pub messages: Vec<Message>,
    pub current_problem: Option<Problem>,
    pub current_matches: Vec<PricedMatch>,
    phase: TurnPhase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Creates a fresh session awaiting its first message.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            messages: Vec::new(),
            current_problem: None,
            current_matches: Vec::new(),
            phase: TurnPhase::AwaitingInput,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Records the customer's message and enters `Analyzing`.
    ///
    /// Valid from `AwaitingInput` (fresh turn), `AwaitingClarification`
    /// (the customer answered a follow-up), and `Resolved` (a new problem
    /// after a completed turn).
    pub fn begin_analysis(&mut self, user_text: impl Into<String>) -> Result<(), SessionError> {
        self.expect_phase(
            &[
                TurnPhase::AwaitingInput,
                TurnPhase::AwaitingClarification,
                TurnPhase::Resolved,
            ],
            TurnPhase::Analyzing,
        )?;
        self.push(Message::new(MessageRole::User, user_text));
        self.phase = TurnPhase::Analyzing;
        Ok(())
    }

    /// Text to resubmit to analysis. While a clarification is pending, the
    /// prior problem context is merged with the customer's newest answer, so
    /// the problem is refined rather than replaced. Outside that phase the
    /// new text stands alone.
    pub fn analysis_text(&self, new_text: &str) -> String {
        if self.phase != TurnPhase::AwaitingClarification {
            return new_text.to_string();
        }
        match &self.current_problem {
            Some(problem) if !problem.raw_text.is_empty() => {
                format!("{}\nAdditional details: {}", problem.raw_text, new_text)
            }
            _ => new_text.to_string(),
        }
    }

    /// Stores the analyzed problem and asks the returned questions, halting
    /// the turn in `AwaitingClarification`.
    pub fn ask_clarification(
        &mut self,
        problem: Problem,
        questions: &[String],
    ) -> Result<(), SessionError> {
        self.expect_phase(&[TurnPhase::Analyzing], TurnPhase::AwaitingClarification)?;
        let mut message = Message::new(MessageRole::Assistant, questions.join("\n"));
        message.attached_problem = Some(problem.clone());
        self.push(message);
        self.current_problem = Some(problem);
        self.phase = TurnPhase::AwaitingClarification;
        Ok(())
    }

    /// Accepts the analyzed problem and proceeds toward matching.
    pub fn begin_matching(&mut self, problem: Problem) -> Result<(), SessionError> {
        self.expect_phase(&[TurnPhase::Analyzing], TurnPhase::Matching)?;
        self.current_problem = Some(problem);
        self.phase = TurnPhase::Matching;
        Ok(())
    }

    /// Matching finished; pricing fan-out is in flight.
    pub fn begin_pricing(&mut self) -> Result<(), SessionError> {
        self.expect_phase(&[TurnPhase::Matching], TurnPhase::Pricing)?;
        self.phase = TurnPhase::Pricing;
        Ok(())
    }

    /// Completes the turn with priced matches and an assistant message.
    /// The session sits in `Resolved` until the customer's next message.
    pub fn resolve(
        &mut self,
        matches: Vec<PricedMatch>,
        assistant_text: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.expect_phase(&[TurnPhase::Matching, TurnPhase::Pricing], TurnPhase::Resolved)?;
        let mut message = Message::new(MessageRole::Assistant, assistant_text);
        message.attached_matches = Some(matches.clone());
        self.push(message);
        self.current_matches = matches;
        self.phase = TurnPhase::Resolved;
        Ok(())
    }

    /// Records an assistant reply that ends the turn without matches
    /// (unresolved analysis, no-match narrative, or a surfaced failure).
    pub fn end_turn(&mut self, assistant_text: impl Into<String>) {
        self.push(Message::new(MessageRole::Assistant, assistant_text));
        self.phase = TurnPhase::AwaitingInput;
    }

    fn expect_phase(&self, allowed: &[TurnPhase], to: TurnPhase) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.phase,
                to,
            })
        }
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
