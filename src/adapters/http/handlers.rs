//! HTTP handlers connecting the routes to the matching engine.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use crate::application::{EngineError, MatchingEngine};
use crate::domain::prompts::ImageSummary;
use crate::domain::{NextStep, WorkerId};
use crate::ports::{
    BookingStore, ImageAttachment, NewBooking, ReasoningError, WorkerRoster,
};

use super::dto::{
    AnalyzeProblemRequest, AnalyzeProblemResponse, BookRequest, BookResponse, ErrorResponse,
    FindWorkersRequest, FindWorkersResponse, NextStepDto, WorkersQuery, WorkersResponse,
};

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub roster: Arc<dyn WorkerRoster>,
    pub bookings: Arc<dyn BookingStore>,
}

impl AppState {
    pub fn new(
        engine: Arc<MatchingEngine>,
        roster: Arc<dyn WorkerRoster>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self {
            engine,
            roster,
            bookings,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn map_engine_error(err: EngineError) -> ApiError {
    error!(error = %err, "pipeline request failed");
    match &err {
        EngineError::Reasoning(ReasoningError::AuthenticationFailed)
        | EngineError::Reasoning(ReasoningError::NotConfigured(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal("Reasoning provider misconfigured")),
        ),
        EngineError::Reasoning(inner) if inner.is_retryable() => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::upstream(err.to_string())),
        ),
        EngineError::Reasoning(_) | EngineError::Contract(_) | EngineError::Shape(_) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::upstream(err.to_string())),
        ),
        EngineError::Roster(_) | EngineError::Session(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(err.to_string())),
        ),
    }
}

/// Analyze a problem description (and optional photos).
///
/// POST /api/analyze-problem
pub async fn analyze_problem(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeProblemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.description.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Description cannot be empty")),
        ));
    }

    let mut summaries = Vec::with_capacity(req.images.len());
    let mut photo_reply = None;
    for data in &req.images {
        match state
            .engine
            .analyze_image(ImageAttachment::jpeg(data.clone()), &req.description)
            .await
        {
            Ok(text) => summaries.push(ImageSummary {
                analysis: Some(text),
            }),
            Err(_) => {
                // Unreadable photo: ask the customer what it shows rather
                // than dropping it silently.
                if photo_reply.is_none() {
                    photo_reply = state.engine.image_fallback(&req.description).await.ok();
                }
                summaries.push(ImageSummary { analysis: None });
            }
        }
    }

    let problem = state
        .engine
        .analyze_problem(&req.description, &summaries, req.location.as_deref())
        .await
        .map_err(map_engine_error)?;

    let (next_step, questions, reply) = match state.engine.decide_next_step(&problem) {
        NextStep::AskFollowUp(questions) => (NextStepDto::AskFollowUp, questions, None),
        NextStep::Unresolved => {
            let reply = state
                .engine
                .clarify(&req.description)
                .await
                .map_err(map_engine_error)?;
            (NextStepDto::Unresolved, vec![], Some(reply))
        }
        NextStep::Proceed => (NextStepDto::Proceed, vec![], None),
    };

    Ok(Json(AnalyzeProblemResponse {
        problem,
        next_step,
        questions,
        reply: reply.or(photo_reply),
    }))
}

/// Match and price workers for an analyzed problem.
///
/// POST /api/find-workers
pub async fn find_workers(
    State(state): State<AppState>,
    Json(req): Json<FindWorkersRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let match_set = state
        .engine
        .find_matches(&req.problem, &req.preferences, req.location.as_deref())
        .await
        .map_err(map_engine_error)?;

    if match_set.matches.is_empty() {
        let reply = state
            .engine
            .no_match_response(&req.problem)
            .await
            .map_err(map_engine_error)?;
        return Ok(Json(FindWorkersResponse {
            matches: vec![],
            summary: match_set.summary,
            alternatives: match_set.alternatives,
            reply: Some(reply),
        }));
    }

    let priced = state
        .engine
        .price_matches(match_set.matches, &req.problem, &req.market)
        .await;

    Ok(Json(FindWorkersResponse {
        matches: priced,
        summary: match_set.summary,
        alternatives: match_set.alternatives,
        reply: None,
    }))
}

/// List workers, optionally filtered by trade.
///
/// GET /api/workers?trade=plumber
pub async fn list_workers(
    State(state): State<AppState>,
    Query(query): Query<WorkersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut workers = state.roster.list_all().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(e.to_string())),
        )
    })?;

    if let Some(trade) = &query.trade {
        let needle = trade.to_lowercase();
        workers.retain(|w| w.trade.to_lowercase().contains(&needle));
    }

    Ok(Json(WorkersResponse { workers }))
}

/// Fetch one worker by ID.
///
/// GET /api/workers/:id
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let worker_id = WorkerId::new(&id);
    let worker = state.roster.find_by_id(&worker_id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(e.to_string())),
        )
    })?;

    match worker {
        Some(worker) => Ok(Json(worker)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Worker", &id)),
        )),
    }
}

/// Book a worker for a quoted job.
///
/// POST /api/book
pub async fn book_worker(
    State(state): State<AppState>,
    Json(req): Json<BookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let worker_id = WorkerId::new(&req.worker_id);

    // Bookings only reference real roster workers.
    let exists = state
        .roster
        .find_by_id(&worker_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(e.to_string())),
            )
        })?
        .is_some();
    if !exists {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Worker", &req.worker_id)),
        ));
    }

    let record = state
        .bookings
        .create(NewBooking {
            worker_id,
            date: req.date,
            time: req.time,
            problem_summary: req.problem_summary,
            estimated_cost: req.estimated_cost,
        })
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(e.to_string())),
            )
        })?;

    Ok((StatusCode::CREATED, Json(BookResponse { booking: record })))
}

/// Liveness probe.
///
/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
