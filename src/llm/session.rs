//! Client-accumulated multi-turn session.
//!
//! DESIGN
//! ======
//! The `generateContent` endpoint is stateless, so multi-turn context is
//! carried client-side: every send replays the accumulated turn history.
//! A failed send removes the pending user turn again, so retrying the same
//! text does not duplicate history.

use std::sync::Arc;

use super::types::{Completion, GenAiError, GenerationOptions, TextGen, Turn};

pub struct GenSession {
    llm: Arc<dyn TextGen>,
    system: String,
    options: GenerationOptions,
    turns: Vec<Turn>,
}

impl GenSession {
    #[must_use]
    pub fn new(llm: Arc<dyn TextGen>, system: impl Into<String>, options: GenerationOptions) -> Self {
        Self { llm, system: system.into(), options, turns: Vec::new() }
    }

    /// Send one user turn with the full prior history as context.
    ///
    /// On success the user turn and the model's reply (when non-empty) are
    /// committed to the history. On failure the user turn is rolled back.
    ///
    /// # Errors
    ///
    /// Propagates the upstream [`GenAiError`].
    pub async fn send(&mut self, text: &str) -> Result<Completion, GenAiError> {
        self.turns.push(Turn::user(text));

        match self
            .llm
            .generate(Some(&self.system), &self.turns, &self.options)
            .await
        {
            Ok(completion) => {
                if let Some(reply) = &completion.text {
                    self.turns.push(Turn::model(reply.clone()));
                }
                Ok(completion)
            }
            Err(e) => {
                self.turns.pop();
                Err(e)
            }
        }
    }

    /// Accumulated wire history, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
