//! Text generation — Gemini-backed client for the interactive surfaces.
//!
//! DESIGN
//! ======
//! The `TextGen` trait is the seam: the real [`gemini::GeminiClient`] sits
//! behind it in production and tests inject mocks. [`Llm`] is the shared,
//! lazily-initialized handle the surfaces hold — the credential is only read
//! (and the HTTP client only built) on the first upstream use, and concurrent
//! first callers coalesce on a single initialization.

pub mod config;
pub mod gemini;
pub mod session;
pub mod types;

use std::sync::Arc;

pub use session::GenSession;
pub use types::{Completion, GenAiError, GenerationOptions, ResponseFormat, TextGen, Turn};

// =============================================================================
// SHARED CLIENT HANDLE
// =============================================================================

/// Shared handle to the upstream client.
///
/// Cloning is cheap; all clones resolve to the same client. A failed
/// initialization (missing credential, bad config) is not cached, so a later
/// call retries once the environment is fixed.
#[derive(Clone)]
pub struct Llm {
    cell: Arc<tokio::sync::OnceCell<Arc<dyn TextGen>>>,
}

impl Llm {
    /// Handle that builds the real Gemini client from the environment on
    /// first use.
    #[must_use]
    pub fn new() -> Self {
        Self { cell: Arc::new(tokio::sync::OnceCell::new()) }
    }

    /// Handle pre-initialized with the given client. Used by tests to inject
    /// a mock `TextGen`.
    #[must_use]
    pub fn with_client(client: Arc<dyn TextGen>) -> Self {
        Self { cell: Arc::new(tokio::sync::OnceCell::from(client)) }
    }

    /// Resolve the shared client, initializing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::MissingApiKey`] when no credential is configured,
    /// or [`GenAiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub async fn client(&self) -> Result<Arc<dyn TextGen>, GenAiError> {
        let client = self
            .cell
            .get_or_try_init(|| async {
                let config = config::GenAiConfig::from_env()?;
                let client = gemini::GeminiClient::new(config)?;
                tracing::info!(model = %client.model(), "text-generation client initialized");
                Ok::<_, GenAiError>(Arc::new(client) as Arc<dyn TextGen>)
            })
            .await?;
        Ok(client.clone())
    }
}

impl Default for Llm {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TEST DOUBLES
// =============================================================================
