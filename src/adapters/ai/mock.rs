//! Mock reasoning provider for testing.
//!
//! Configurable stand-in for the [`ReasoningProvider`] port so tests run
//! without calling a real model API.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{ReasoningError, ReasoningProvider, ReasoningRequest, ReasoningResponse};

/// Mock reasoning provider.
///
/// Configurable to return specific responses, simulate delays, or inject
/// errors.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<ReasoningRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this text as a successful completion.
    Success(String),
    /// Return an error.
    Error(MockError),
}

/// Mock error variants. `ReasoningError` is not `Clone`, so the queue holds
/// these and converts at call time.
#[derive(Debug, Clone)]
pub enum MockError {
    Timeout { timeout_secs: u64 },
    Network { message: String },
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    InvalidRequest { message: String },
}

impl From<MockError> for ReasoningError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Timeout { timeout_secs } => ReasoningError::Timeout { timeout_secs },
            MockError::Network { message } => ReasoningError::Network(message),
            MockError::RateLimited { retry_after_secs } => {
                ReasoningError::RateLimited { retry_after_secs }
            }
            MockError::Unavailable { message } => ReasoningError::Unavailable(message),
            MockError::AuthenticationFailed => ReasoningError::AuthenticationFailed,
            MockError::InvalidRequest { message } => ReasoningError::InvalidRequest(message),
        }
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful text response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Success(text.into()));
        self
    }

    /// Queues an error response.
    pub fn with_error(self, error: MockError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of completed calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded requests, in call order.
    pub fn recorded_calls(&self) -> Vec<ReasoningRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success("Mock response".to_string()))
    }
}

#[async_trait]
impl ReasoningProvider for MockProvider {
    async fn complete(
        &self,
        request: ReasoningRequest,
    ) -> Result<ReasoningResponse, ReasoningError> {
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success(text) => Ok(ReasoningResponse {
                text,
                model: self.model().to_string(),
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn model(&self) -> &str {
        "mock-model-1"
    }
}
