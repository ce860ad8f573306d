//! Reasoning Provider Port - interface to the external LLM.
//!
//! Every pipeline stage sends a prompt through this port and receives raw
//! text back. The provider guarantees nothing about the shape of that text;
//! turning it into typed data is the job of the response contract in
//! `domain::contract`.
//!
//! # Example
//!
//! ```ignore
//! let request = ReasoningRequest::new(prompt)
//!     .with_max_tokens(1500)
//!     .with_temperature(0.3);
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;

/// Port for the external natural-language reasoning capability.
///
/// Implementations connect to a real LLM API (Anthropic's Claude in
/// production) or to a mock for tests.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Send a single prompt and wait for the full text response.
    ///
    /// The call must observe a bounded timeout; a timed-out call surfaces as
    /// [`ReasoningError::Timeout`], never as an indefinite suspension.
    async fn complete(&self, request: ReasoningRequest) -> Result<ReasoningResponse, ReasoningError>;

    /// Human-readable provider/model label, for logging.
    fn model(&self) -> &str;
}

/// A prompt to send to the reasoning provider.
#[derive(Debug, Clone)]
pub struct ReasoningRequest {
    /// Prompt text.
    pub prompt: String,
    /// Optional image attachments (for vision prompts).
    pub images: Vec<ImageAttachment>,
    /// Maximum tokens the provider may generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 = deterministic).
    pub temperature: f32,
}

impl ReasoningRequest {
    /// Creates a request with default generation options.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            max_tokens: 1024,
            temperature: 0.3,
        }
    }

    /// Attaches a base64-encoded image.
    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.images.push(image);
        self
    }

    /// Sets the maximum output tokens.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A base64-encoded image sent alongside a prompt.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    /// Base64 payload (no data-URL prefix).
    pub base64_data: String,
    /// Media type, e.g. "image/jpeg".
    pub media_type: String,
}

impl ImageAttachment {
    /// Creates a JPEG attachment, the format the upload boundary produces.
    pub fn jpeg(base64_data: impl Into<String>) -> Self {
        Self {
            base64_data: base64_data.into(),
            media_type: "image/jpeg".to_string(),
        }
    }
}

/// Raw response text from the provider.
#[derive(Debug, Clone)]
pub struct ReasoningResponse {
    /// Full generated text.
    pub text: String,
    /// Model that produced it.
    pub model: String,
}

/// Reasoning provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    /// No provider credentials configured; fatal for the whole pipeline.
    #[error("reasoning provider not configured: {0}")]
    NotConfigured(&'static str),

    /// Request exceeded the bounded timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Network failure reaching the provider.
    #[error("network error: {0}")]
    Network(String),

    /// Provider rejected the credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider returned a server-side error.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Request was malformed (non-retryable 4xx).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ReasoningError {
    /// Returns true if a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReasoningError::Timeout { .. }
                | ReasoningError::Network(_)
                | ReasoningError::RateLimited { .. }
                | ReasoningError::Unavailable(_)
        )
    }
}
