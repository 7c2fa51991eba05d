//! Provider-neutral types for the text-generation client.
//!
//! DESIGN
//! ======
//! The surfaces (chat, workshop, dialogue) only ever see these types plus the
//! [`TextGen`] trait. The Gemini wire format stays inside `gemini.rs`, and
//! tests swap the whole upstream out with a mock `TextGen` impl.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by text-generation client operations.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The credential environment variable is not set. Checked lazily, at
    /// first upstream use.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request to the upstream API failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The upstream API returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The upstream response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),
}

// =============================================================================
// TURNS
// =============================================================================

/// Who produced a turn. Mirrors the upstream role vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single turn in a multi-turn exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

// =============================================================================
// GENERATION OPTIONS
// =============================================================================

/// Requested shape of the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Plain prose.
    #[default]
    FreeText,
    /// A single JSON object, parsed by the caller.
    JsonObject,
}

/// Per-call generation knobs. The model id is configuration, not a knob.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationOptions {
    /// Sampling temperature. `None` uses the upstream default.
    pub temperature: Option<f32>,
    pub response_format: ResponseFormat,
}

// =============================================================================
// COMPLETION
// =============================================================================

/// The upstream's generated text.
///
/// An empty completion is a legitimate upstream outcome, not an error:
/// `text` is `None` and each surface substitutes its own fallback string.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: Option<String>,
}

impl Completion {
    /// The generated text, or `fallback` when the model produced none.
    #[must_use]
    pub fn text_or(self, fallback: &str) -> String {
        match self.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => fallback.to_string(),
        }
    }
}

// =============================================================================
// TEXT GENERATION TRAIT
// =============================================================================

/// Async trait over the upstream text-generation call. Enables mocking in
/// tests. One-shot calls pass a single user turn; sessions pass their
/// accumulated history.
#[async_trait::async_trait]
pub trait TextGen: Send + Sync {
    /// Generate text for the given turns.
    ///
    /// # Errors
    ///
    /// Returns a [`GenAiError`] if the request fails or the response body is
    /// malformed. A completion with no text is `Ok` with `text: None`.
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[Turn],
        options: &GenerationOptions,
    ) -> Result<Completion, GenAiError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
