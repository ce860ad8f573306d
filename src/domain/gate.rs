//! Clarification gate - decides whether a problem is ready for matching.
//!
//! A pure function over a `Problem`; no hidden state, so it can be unit
//! tested directly against literal fixtures.

use super::problem::Problem;

/// Confidence at or below which a problem with no identified trades is
/// considered unresolvable. The prompt text talks to the provider about
/// higher thresholds (0.6-0.9), but the code enforces exactly this one.
pub const MIN_CONFIDENCE: f64 = 0.0;

/// Decision for the current turn.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// Halt the pipeline and ask the returned questions; matching must not
    /// run this turn.
    AskFollowUp(Vec<String>),
    /// Analysis produced nothing usable; request free-form clarification.
    Unresolved,
    /// Problem is sufficiently understood; continue to matching.
    Proceed,
}

/// Stateless decision function.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClarificationGate;

impl ClarificationGate {
    /// Decides the next step for a normalized problem.
    pub fn decide(problem: &Problem) -> NextStep {
        if problem.needs_more_info && !problem.follow_up_questions.is_empty() {
            let mut questions = Vec::with_capacity(problem.follow_up_questions.len() + 1);
            if !problem.summary.is_empty() {
                questions.push(problem.summary.clone());
            }
            questions.extend(problem.follow_up_questions.iter().cloned());
            return NextStep::AskFollowUp(questions);
        }

        if problem.trades.is_empty() || problem.confidence <= MIN_CONFIDENCE {
            return NextStep::Unresolved;
        }

        NextStep::Proceed
    }
}
