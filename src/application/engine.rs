//! Matching engine - orchestrates analysis, clarification, matching, and
//! pricing over the reasoning provider and worker roster ports.
//!
//! Every provider response passes through the response contract before it is
//! trusted: extract the JSON object, validate required fields, fill optional
//! ones with stage-specific defaults. Worker references coming back from the
//! model are resolved against the roster so a fabricated ID can never reach
//! a customer.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::domain::prompts::{
    self, ImageSummary,
};
use crate::domain::{
    ClarificationGate, ContractError, ConversationState, MarketContext, MatchPreferences,
    MatchResult, MatchSet, NextStep, PricedMatch, Problem, Quote, QuoteOutcome, RankedMatch,
    ResponseContract, SessionError, WorkerRecord,
};
use crate::ports::{
    ImageAttachment, ReasoningError, ReasoningProvider, ReasoningRequest, RosterError,
    WorkerRoster,
};

/// Hours assumed for a job when analysis produced no usable time estimate.
const DEFAULT_JOB_HOURS: f64 = 2.0;

/// Reply used when the provider is down and no narrative can be generated.
const SERVICE_UNAVAILABLE_REPLY: &str =
    "Sorry, our matching service is temporarily unavailable. Please try again in a few minutes.";

/// Fields the analysis stage must return; everything else is defaulted.
const ANALYSIS_REQUIRED: &[&str] = &["trades", "urgency"];
/// Fields the matching stage must return.
const MATCHING_REQUIRED: &[&str] = &["matches"];
/// Fields the pricing stage must return.
const PRICING_REQUIRED: &[&str] = &["total", "breakdown"];

/// Engine errors. Carries which stage failed so callers can report it.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Reasoning(#[from] ReasoningError),

    #[error("malformed provider response: {0}")]
    Contract(#[from] ContractError),

    #[error("provider response shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Input for one conversational turn.
#[derive(Debug, Clone, Default)]
pub struct TurnInput {
    pub text: String,
    pub images: Vec<ImageAttachment>,
    pub location: Option<String>,
    pub preferences: MatchPreferences,
    pub market: MarketContext,
}

/// Outcome of one conversational turn.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Analysis needs answers before matching may run.
    Clarification { questions: Vec<String> },
    /// Analysis produced nothing actionable; free-form reply asking for more.
    Unresolved { reply: String },
    /// Matching ran but returned no usable workers.
    NoMatches { reply: String },
    /// Ranked matches with per-match price quotes.
    Matches {
        matches: Vec<PricedMatch>,
        summary: String,
    },
}

/// The pipeline orchestrator.
pub struct MatchingEngine {
    provider: Arc<dyn ReasoningProvider>,
    roster: Arc<dyn WorkerRoster>,
}

impl MatchingEngine {
    pub fn new(provider: Arc<dyn ReasoningProvider>, roster: Arc<dyn WorkerRoster>) -> Self {
        Self { provider, roster }
    }

    /// Analyzes free-text (plus optional image summaries) into a structured
    /// problem.
    pub async fn analyze_problem(
        &self,
        description: &str,
        images: &[ImageSummary],
        location: Option<&str>,
    ) -> Result<Problem, EngineError> {
        let prompt = prompts::analysis_prompt(description, images, location, Utc::now());
        let request = ReasoningRequest::new(prompt).with_max_tokens(1500);

        let response = self.provider.complete(request).await?;
        let object = ResponseContract::read(
            &response.text,
            ANALYSIS_REQUIRED,
            &[
                ("confidence", json!(0.5)),
                ("urgencyReasoning", json!("")),
                ("problemDetails", json!({})),
                ("missingInfo", json!([])),
                ("followUpQuestions", json!([])),
                ("needsMoreInfo", json!(false)),
                ("safetyIssues", json!([])),
                ("summary", json!("")),
            ],
        )?;

        let mut problem: Problem = serde_json::from_value(Value::Object(object))?;
        problem.raw_text = description.to_string();
        Ok(problem.normalize())
    }

    /// Decides whether the problem proceeds to matching.
    pub fn decide_next_step(&self, problem: &Problem) -> NextStep {
        ClarificationGate::decide(problem)
    }

    /// Ranks roster workers against the problem. Matches referencing worker
    /// IDs not present in the roster are dropped.
    pub async fn find_matches(
        &self,
        problem: &Problem,
        preferences: &MatchPreferences,
        location: Option<&str>,
    ) -> Result<MatchSet, EngineError> {
        let workers = self.roster.list_all().await?;
        let prompt = prompts::matching_prompt(problem, &workers, location, preferences);
        let request = ReasoningRequest::new(prompt).with_max_tokens(2000);

        let response = self.provider.complete(request).await?;
        let object = ResponseContract::read(
            &response.text,
            MATCHING_REQUIRED,
            &[("summary", json!("")), ("alternatives", Value::Null)],
        )?;
        let payload: MatchingPayload = serde_json::from_value(Value::Object(object))?;

        let by_id: HashMap<&str, &WorkerRecord> =
            workers.iter().map(|w| (w.id.as_str(), w)).collect();

        let mut matches = Vec::with_capacity(payload.matches.len());
        for result in payload.matches {
            match by_id.get(result.worker_id.as_str()) {
                Some(worker) => matches.push(RankedMatch::new((*worker).clone(), result)),
                None => {
                    debug!(worker_id = %result.worker_id, "dropping match for unknown worker");
                }
            }
        }

        Ok(MatchSet {
            matches,
            summary: payload.summary,
            alternatives: payload.alternatives,
        })
    }

    /// Quotes one worker for the problem. The total is rounded to the
    /// nearest whole dollar before it reaches the customer.
    pub async fn price_match(
        &self,
        worker: &WorkerRecord,
        problem: &Problem,
        market: &MarketContext,
    ) -> Result<Quote, EngineError> {
        let hours = problem.estimated_hours(DEFAULT_JOB_HOURS);
        let prompt = prompts::pricing_prompt(worker, problem, hours, market, Utc::now());
        let request = ReasoningRequest::new(prompt).with_max_tokens(1500);

        let response = self.provider.complete(request).await?;
        let mut object = ResponseContract::read(
            &response.text,
            PRICING_REQUIRED,
            &[
                ("confidence", json!(0.8)),
                ("reasoning", json!("")),
                ("alternatives", json!({})),
            ],
        )?;
        round_total(&mut object);

        let quote: Quote = serde_json::from_value(Value::Object(object))?;
        Ok(quote)
    }

    /// Prices every match concurrently. One failed quote never poisons the
    /// batch; it surfaces as a tagged failure on that match.
    pub async fn price_matches(
        &self,
        matches: Vec<RankedMatch>,
        problem: &Problem,
        market: &MarketContext,
    ) -> Vec<PricedMatch> {
        let quotes = join_all(
            matches
                .iter()
                .map(|m| self.price_match(&m.worker, problem, market)),
        )
        .await;

        matches
            .into_iter()
            .zip(quotes)
            .map(|(ranked, outcome)| {
                let pricing = match outcome {
                    Ok(quote) => QuoteOutcome::Priced(quote),
                    Err(err) => {
                        warn!(worker_id = %ranked.worker.id, error = %err, "pricing failed for match");
                        QuoteOutcome::Failed {
                            error: err.to_string(),
                        }
                    }
                };
                PricedMatch { ranked, pricing }
            })
            .collect()
    }

    /// Free-form reply asking the customer for a clearer description.
    pub async fn clarify(&self, user_message: &str) -> Result<String, EngineError> {
        let request =
            ReasoningRequest::new(prompts::clarification_prompt(user_message)).with_max_tokens(1024);
        Ok(self.provider.complete(request).await?.text)
    }

    /// Free-form reply when no roster worker fits the problem.
    pub async fn no_match_response(&self, problem: &Problem) -> Result<String, EngineError> {
        let request =
            ReasoningRequest::new(prompts::no_match_prompt(problem)).with_max_tokens(1024);
        Ok(self.provider.complete(request).await?.text)
    }

    /// Describes a problem photo in trade terms.
    pub async fn analyze_image(
        &self,
        image: ImageAttachment,
        context: &str,
    ) -> Result<String, EngineError> {
        let request = ReasoningRequest::new(prompts::vision_prompt(context))
            .with_image(image)
            .with_max_tokens(1024);
        Ok(self.provider.complete(request).await?.text)
    }

    /// Reply used when image analysis is unavailable mid-conversation.
    pub async fn image_fallback(&self, context: &str) -> Result<String, EngineError> {
        let request =
            ReasoningRequest::new(prompts::image_fallback_prompt(context)).with_max_tokens(1024);
        Ok(self.provider.complete(request).await?.text)
    }

    /// Runs one full conversational turn against the session state.
    ///
    /// Clarification halts the turn before matching; analysis failures end
    /// the turn with an apology instead of leaving the session stuck
    /// mid-phase.
    pub async fn handle_turn(
        &self,
        state: &mut ConversationState,
        input: TurnInput,
    ) -> Result<TurnOutcome, EngineError> {
        let analysis_text = state.analysis_text(&input.text);
        state.begin_analysis(input.text.clone())?;

        let result = self.run_turn(state, &analysis_text, &input).await;
        if result.is_err() {
            state.end_turn(SERVICE_UNAVAILABLE_REPLY);
        }
        result
    }

    async fn run_turn(
        &self,
        state: &mut ConversationState,
        analysis_text: &str,
        input: &TurnInput,
    ) -> Result<TurnOutcome, EngineError> {
        let mut summaries = Vec::with_capacity(input.images.len());
        for image in &input.images {
            match self.analyze_image(image.clone(), analysis_text).await {
                Ok(text) => summaries.push(ImageSummary {
                    analysis: Some(text),
                }),
                Err(err) => {
                    warn!(error = %err, "image analysis failed, asking about the photo");
                    // The photo couldn't be read; ask the customer what it
                    // shows instead of matching on half the picture. Only if
                    // that reply also fails does the turn continue text-only.
                    match self.image_fallback(analysis_text).await {
                        Ok(reply) => {
                            state.end_turn(reply.clone());
                            return Ok(TurnOutcome::Unresolved { reply });
                        }
                        Err(fallback_err) => {
                            warn!(error = %fallback_err, "image fallback failed, continuing without the photo");
                            summaries.push(ImageSummary { analysis: None });
                        }
                    }
                }
            }
        }

        let problem = self
            .analyze_problem(analysis_text, &summaries, input.location.as_deref())
            .await?;

        match self.decide_next_step(&problem) {
            NextStep::AskFollowUp(questions) => {
                state.ask_clarification(problem, &questions)?;
                Ok(TurnOutcome::Clarification { questions })
            }
            NextStep::Unresolved => {
                let reply = match self.clarify(&input.text).await {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(error = %err, "clarification reply failed, using canned text");
                        SERVICE_UNAVAILABLE_REPLY.to_string()
                    }
                };
                state.end_turn(reply.clone());
                Ok(TurnOutcome::Unresolved { reply })
            }
            NextStep::Proceed => {
                state.begin_matching(problem.clone())?;
                let match_set = self
                    .find_matches(&problem, &input.preferences, input.location.as_deref())
                    .await?;

                if match_set.matches.is_empty() {
                    let reply = match self.no_match_response(&problem).await {
                        Ok(text) => text,
                        Err(err) => {
                            warn!(error = %err, "no-match reply failed, using canned text");
                            SERVICE_UNAVAILABLE_REPLY.to_string()
                        }
                    };
                    state.end_turn(reply.clone());
                    return Ok(TurnOutcome::NoMatches { reply });
                }

                state.begin_pricing()?;
                let priced = self
                    .price_matches(match_set.matches, &problem, &input.market)
                    .await;

                let summary = match match_set.summary {
                    Some(s) if !s.is_empty() => s,
                    _ => format!("Found {} matching professionals for you.", priced.len()),
                };
                state.resolve(priced.clone(), summary.clone())?;
                Ok(TurnOutcome::Matches {
                    matches: priced,
                    summary,
                })
            }
        }
    }
}

/// Wire shape of the matching stage response.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchingPayload {
    matches: Vec<MatchResult>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    alternatives: Option<String>,
}

/// Rounds a numeric `total` to the nearest whole dollar in place, so a
/// fractional figure from the model never reaches a customer.
fn round_total(object: &mut Map<String, Value>) {
    if let Some(total) = object.get("total").and_then(Value::as_f64) {
        object.insert("total".to_string(), json!(total.round().max(0.0) as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockProvider};
    use crate::adapters::roster::InMemoryRoster;

    fn engine_with(provider: MockProvider) -> MatchingEngine {
        MatchingEngine::new(
            Arc::new(provider),
            Arc::new(InMemoryRoster::demo_roster()),
        )
    }

    fn analysis_json(extra: &str) -> String {
        format!(
            r#"Here is my analysis:
{{
  "trades": [{{"trade": "Plumber", "confidence": 0.92, "specialties": ["Pipe Repair"], "reasoning": "leaking sink"}}],
  "urgency": "soon",
  "summary": "Leaking kitchen sink",
  "confidence": 0.9{}
}}"#,
            extra
        )
    }

    fn matching_json(ids: &[&str]) -> String {
        let matches: Vec<String> = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"workerId": "{}", "matchScore": 0.88, "reasoning": "good fit", "strengths": [], "concerns": [], "recommendationLevel": "excellent"}}"#,
                    id
                )
            })
            .collect();
        format!(
            r#"{{"matches": [{}], "summary": "Strong plumber available nearby."}}"#,
            matches.join(",")
        )
    }

    fn pricing_json(total: &str) -> String {
        format!(
            r#"{{"total": {}, "reasoning": "standard job", "breakdown": {{"baseRate": 75, "hours": 2, "subtotal": 150, "adjustments": [], "travelFee": 20, "finalTotal": {}}}, "confidence": 0.85}}"#,
            total, total
        )
    }

    #[tokio::test]
    async fn analysis_parses_json_embedded_in_prose() {
        let engine = engine_with(MockProvider::new().with_response(analysis_json("")));

        let problem = engine
            .analyze_problem("my kitchen sink is leaking", &[], None)
            .await
            .unwrap();

        assert_eq!(problem.trades.len(), 1);
        assert_eq!(problem.trades[0].trade, "Plumber");
        assert_eq!(problem.raw_text, "my kitchen sink is leaking");
        assert_eq!(problem.summary, "Leaking kitchen sink");
    }

    #[tokio::test]
    async fn analysis_missing_required_field_is_contract_error() {
        let engine =
            engine_with(MockProvider::new().with_response(r#"{"urgency": "soon"}"#));

        let err = engine
            .analyze_problem("something", &[], None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Contract(ContractError::MissingRequiredField(ref f)) if f == "trades"
        ));
    }

    #[tokio::test]
    async fn follow_up_halts_turn_before_matching() {
        let provider = MockProvider::new().with_response(analysis_json(
            r#",
  "needsMoreInfo": true,
  "followUpQuestions": ["Where exactly is the leak?", "Is water currently running?"]"#,
        ));
        let call_counter = provider.clone();
        let engine = engine_with(provider);
        let mut state = ConversationState::new();

        let outcome = engine
            .handle_turn(
                &mut state,
                TurnInput {
                    text: "something leaks".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        match outcome {
            TurnOutcome::Clarification { questions } => {
                // Summary is surfaced ahead of the questions.
                assert_eq!(questions.len(), 3);
                assert_eq!(questions[1], "Where exactly is the leak?");
            }
            other => panic!("expected clarification, got {:?}", other),
        }
        // Only the analysis call ran; matching and pricing never fired.
        assert_eq!(call_counter.call_count(), 1);
        assert_eq!(
            state.phase(),
            crate::domain::TurnPhase::AwaitingClarification
        );
    }

    #[tokio::test]
    async fn hallucinated_worker_id_is_dropped() {
        let engine =
            engine_with(MockProvider::new().with_response(matching_json(&["w2", "w99", "w1"])));

        let problem = Problem {
            raw_text: "leak".to_string(),
            trades: vec![],
            urgency: crate::domain::Urgency::Soon,
            urgency_reasoning: String::new(),
            details: Default::default(),
            missing_info: vec![],
            follow_up_questions: vec![],
            needs_more_info: false,
            safety_issues: vec![],
            summary: String::new(),
            confidence: 0.9,
        };

        let set = engine
            .find_matches(&problem, &MatchPreferences::default(), None)
            .await
            .unwrap();

        let ids: Vec<&str> = set.matches.iter().map(|m| m.worker.id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1"]);
    }

    #[tokio::test]
    async fn fractional_total_rounds_to_whole_dollars() {
        let engine = engine_with(MockProvider::new().with_response(pricing_json("175.4")));
        let roster = InMemoryRoster::demo_roster();
        let worker = roster
            .find_by_id(&crate::domain::WorkerId::from("w2"))
            .await
            .unwrap()
            .unwrap();

        let problem = Problem {
            raw_text: "leak".to_string(),
            trades: vec![],
            urgency: crate::domain::Urgency::Soon,
            urgency_reasoning: String::new(),
            details: Default::default(),
            missing_info: vec![],
            follow_up_questions: vec![],
            needs_more_info: false,
            safety_issues: vec![],
            summary: String::new(),
            confidence: 0.9,
        };

        let quote = engine
            .price_match(&worker, &problem, &MarketContext::default())
            .await
            .unwrap();

        assert_eq!(quote.total, 175);
        assert_eq!(quote.breakdown.base_rate, 75.0);
        // Parsed quotes carry the provider-derived source tag.
        assert_eq!(quote.source, crate::domain::QuoteSource::Provider);
    }

    #[tokio::test]
    async fn one_pricing_failure_does_not_poison_the_batch() {
        let provider = MockProvider::new()
            .with_response(pricing_json("160"))
            .with_error(MockError::Timeout { timeout_secs: 30 })
            .with_response(pricing_json("210"));
        let engine = engine_with(provider);
        let roster = InMemoryRoster::demo_roster();
        let workers = roster.list_all().await.unwrap();

        let problem = Problem {
            raw_text: "leak".to_string(),
            trades: vec![],
            urgency: crate::domain::Urgency::Flexible,
            urgency_reasoning: String::new(),
            details: Default::default(),
            missing_info: vec![],
            follow_up_questions: vec![],
            needs_more_info: false,
            safety_issues: vec![],
            summary: String::new(),
            confidence: 0.9,
        };

        let matches: Vec<RankedMatch> = workers
            .into_iter()
            .take(3)
            .map(|w| {
                let result: MatchResult = serde_json::from_value(
                    json!({"workerId": w.id.as_str(), "matchScore": 0.8}),
                )
                .unwrap();
                RankedMatch::new(w, result)
            })
            .collect();

        let priced = engine
            .price_matches(matches, &problem, &MarketContext::default())
            .await;

        assert_eq!(priced.len(), 3);
        let quoted: Vec<bool> = priced.iter().map(|p| p.pricing.is_priced()).collect();
        assert_eq!(quoted.iter().filter(|q| **q).count(), 2);

        // The failed one carries the error text, and keeps its rank slot.
        let failed = priced.iter().find(|p| !p.pricing.is_priced()).unwrap();
        match &failed.pricing {
            QuoteOutcome::Failed { error } => assert!(error.contains("timed out")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreadable_photo_ends_turn_with_photo_questions() {
        let provider = MockProvider::new()
            .with_error(MockError::InvalidRequest {
                message: "image could not be processed".to_string(),
            })
            .with_response(
                "I received your photo but couldn't analyze it. Could you tell me: 1) What does the photo show? 2) Is anything actively leaking?",
            );
        let call_counter = provider.clone();
        let engine = engine_with(provider);
        let mut state = ConversationState::new();

        let outcome = engine
            .handle_turn(
                &mut state,
                TurnInput {
                    text: "see attached photo".to_string(),
                    images: vec![ImageAttachment::jpeg("aGVsbG8=")],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        match outcome {
            TurnOutcome::Unresolved { reply } => {
                assert!(reply.contains("What does the photo show?"));
            }
            other => panic!("expected photo questions, got {:?}", other),
        }
        // Vision attempt plus the fallback reply; analysis never fired.
        assert_eq!(call_counter.call_count(), 2);
        assert_eq!(state.phase(), crate::domain::TurnPhase::AwaitingInput);
        assert!(state.messages.last().unwrap().text.contains("photo"));
    }

    #[tokio::test]
    async fn photo_fallback_failure_degrades_to_text_only_analysis() {
        let provider = MockProvider::new()
            .with_error(MockError::Unavailable {
                message: "vision unavailable".to_string(),
            })
            .with_error(MockError::Unavailable {
                message: "still unavailable".to_string(),
            })
            .with_response(analysis_json(
                r#",
  "needsMoreInfo": true,
  "followUpQuestions": ["Where exactly is the leak?"]"#,
            ));
        let call_counter = provider.clone();
        let engine = engine_with(provider);
        let mut state = ConversationState::new();

        let outcome = engine
            .handle_turn(
                &mut state,
                TurnInput {
                    text: "sink leaks, photo attached".to_string(),
                    images: vec![ImageAttachment::jpeg("aGVsbG8=")],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Both vision and the fallback reply failed; the turn still ran on
        // the customer's text alone.
        assert!(matches!(outcome, TurnOutcome::Clarification { .. }));
        assert_eq!(call_counter.call_count(), 3);
    }

    #[tokio::test]
    async fn full_turn_produces_priced_matches() {
        let provider = MockProvider::new()
            .with_response(analysis_json(""))
            .with_response(matching_json(&["w2"]))
            .with_response(pricing_json("175"));
        let engine = engine_with(provider);
        let mut state = ConversationState::new();

        let outcome = engine
            .handle_turn(
                &mut state,
                TurnInput {
                    text: "my kitchen sink is leaking".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        match outcome {
            TurnOutcome::Matches { matches, summary } => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].ranked.worker.id.as_str(), "w2");
                assert_eq!(matches[0].pricing.quote().unwrap().total, 175);
                assert_eq!(summary, "Strong plumber available nearby.");
            }
            other => panic!("expected matches, got {:?}", other),
        }
        // Turn finished; the session parks in Resolved with its matches.
        assert_eq!(state.phase(), crate::domain::TurnPhase::Resolved);
        assert_eq!(state.current_matches.len(), 1);
    }

    #[tokio::test]
    async fn analysis_failure_ends_turn_with_apology() {
        let provider = MockProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });
        let engine = engine_with(provider);
        let mut state = ConversationState::new();

        let result = engine
            .handle_turn(
                &mut state,
                TurnInput {
                    text: "help".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(state.phase(), crate::domain::TurnPhase::AwaitingInput);
        assert!(state
            .messages
            .last()
            .unwrap()
            .text
            .contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn clarification_answer_resubmits_merged_context() {
        let provider = MockProvider::new()
            .with_response(analysis_json(
                r#",
  "needsMoreInfo": true,
  "followUpQuestions": ["Which room?"]"#,
            ))
            .with_response(analysis_json(""))
            .with_response(matching_json(&["w2"]))
            .with_response(pricing_json("150"));
        let recorder = provider.clone();
        let engine = engine_with(provider);
        let mut state = ConversationState::new();

        engine
            .handle_turn(
                &mut state,
                TurnInput {
                    text: "there is a leak".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let outcome = engine
            .handle_turn(
                &mut state,
                TurnInput {
                    text: "the kitchen".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(matches!(outcome, TurnOutcome::Matches { .. }));

        // Second analysis prompt carried both the original description and
        // the follow-up answer.
        let calls = recorder.recorded_calls();
        let second_analysis = &calls[1].prompt;
        assert!(second_analysis.contains("there is a leak"));
        assert!(second_analysis.contains("Additional details: the kitchen"));
    }
}
