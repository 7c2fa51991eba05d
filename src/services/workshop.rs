//! Mutation workshop — one-shot (idea, filter) → mutated instructions.
//!
//! DESIGN
//! ======
//! Stateless upstream call at maximum temperature. This surface never
//! surfaces a hard error: transport and parse failures degrade to a fixed
//! rejection string, an empty completion to a fixed empty-output string.
//! The stored result is last-result-wins.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::llm::{GenerationOptions, Llm, ResponseFormat, Turn};
use crate::prompts;

/// Maximum creative variance for mutations.
const MUTATION_TEMPERATURE: f32 = 1.0;

// =============================================================================
// TYPES
// =============================================================================

/// The four metamodel filters. Unknown filters do not exist at this layer;
/// callers parse user input before constructing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationFilter {
    Glitch,
    Fragment,
    Sabotage,
    Code,
}

impl MutationFilter {
    /// Label embedded in the prompt template.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Glitch => "GLITCH",
            Self::Fragment => "FRAGMENT",
            Self::Sabotage => "SABOTAGE",
            Self::Code => "CODE",
        }
    }

    /// Parse a user-supplied filter name, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GLITCH" => Some(Self::Glitch),
            "FRAGMENT" => Some(Self::Fragment),
            "SABOTAGE" => Some(Self::Sabotage),
            "CODE" => Some(Self::Code),
            _ => None,
        }
    }
}

/// Last produced output. `text` is `None` until the first mutation lands.
#[derive(Debug, Clone, Default)]
pub struct MutationResult {
    pub text: Option<String>,
    pub is_loading: bool,
}

// =============================================================================
// WORKSHOP
// =============================================================================

pub struct Workshop {
    llm: Llm,
    result: Mutex<MutationResult>,
}

impl Workshop {
    #[must_use]
    pub fn new(llm: Llm) -> Self {
        Self { llm, result: Mutex::new(MutationResult::default()) }
    }

    /// Snapshot of the last result.
    #[must_use]
    pub fn last_result(&self) -> MutationResult {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.lock().is_loading
    }

    /// Mutate an idea through one of the four filters.
    ///
    /// Blank ideas and requests while one is outstanding are rejected as
    /// no-ops (`None`). Otherwise always produces text: the model's output,
    /// or a fixed fallback when the upstream call fails or returns nothing.
    pub async fn mutate(&self, idea: &str, filter: MutationFilter) -> Option<String> {
        let idea = idea.trim();

        {
            let mut result = self.lock();
            if idea.is_empty() || result.is_loading {
                return None;
            }
            // New request replaces whatever was shown before.
            result.text = None;
            result.is_loading = true;
        }

        let output = self.run_mutation(idea, filter).await;

        let mut result = self.lock();
        result.text = Some(output.clone());
        result.is_loading = false;
        Some(output)
    }

    async fn run_mutation(&self, idea: &str, filter: MutationFilter) -> String {
        let client = match self.llm.client().await {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "workshop: client unavailable");
                return prompts::MUTATION_ERROR_FALLBACK.to_string();
            }
        };

        let prompt = prompts::workshop_prompt(idea, filter.label());
        let options = GenerationOptions {
            temperature: Some(MUTATION_TEMPERATURE),
            response_format: ResponseFormat::FreeText,
        };

        match client.generate(None, &[Turn::user(prompt)], &options).await {
            Ok(completion) => completion.text_or(prompts::MUTATION_EMPTY_FALLBACK),
            Err(e) => {
                warn!(error = %e, filter = filter.label(), "workshop: mutation failed");
                prompts::MUTATION_ERROR_FALLBACK.to_string()
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MutationResult> {
        self.result.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "workshop_test.rs"]
mod tests;
