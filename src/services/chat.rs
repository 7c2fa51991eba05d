//! Chat companion — ordered conversation history over a multi-turn session.
//!
//! DESIGN
//! ======
//! The visible history is append-only: user message, then exactly one
//! assistant (or error-flagged) message per resolved send. The busy flag is
//! flipped synchronously on both sides of the await point, so a second send
//! while one is in flight is rejected, never queued. The underlying
//! `GenSession` is created lazily on the first send; upstream failures keep
//! the user's message visible and append a fixed fallback bubble instead of
//! propagating.

use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::llm::{GenSession, GenerationOptions, Llm, ResponseFormat};
use crate::prompts;

/// Creative-but-bounded sampling for the companion.
const CHAT_TEMPERATURE: f32 = 0.9;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One visible chat bubble. Immutable once appended.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
}

impl ChatMessage {
    fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into(), is_error: false }
    }

    fn assistant(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, text: text.into(), is_error: false }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, text: text.into(), is_error: true }
    }
}

struct ChatInner {
    messages: Vec<ChatMessage>,
    outstanding: bool,
    session: Option<GenSession>,
}

// =============================================================================
// CHAT SESSION
// =============================================================================

pub struct ChatSession {
    llm: Llm,
    inner: Mutex<ChatInner>,
}

impl ChatSession {
    /// New session seeded with the companion's greeting.
    #[must_use]
    pub fn new(llm: Llm) -> Self {
        let inner = ChatInner {
            messages: vec![ChatMessage::assistant(prompts::CHAT_GREETING)],
            outstanding: false,
            session: None,
        };
        Self { llm, inner: Mutex::new(inner) }
    }

    /// Snapshot of the visible history, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().messages.clone()
    }

    /// `true` while a send is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.lock().outstanding
    }

    /// Send one user turn and await the companion's reply.
    ///
    /// Blank input and sends while another is outstanding are rejected as
    /// no-ops (`None`). Otherwise returns the appended assistant message,
    /// which carries `is_error` when the upstream call failed.
    pub async fn send(&self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();

        // Guard + user append happen synchronously, before any await.
        let session = {
            let mut inner = self.lock();
            if text.is_empty() || inner.outstanding {
                return None;
            }
            inner.outstanding = true;
            inner.messages.push(ChatMessage::user(text));
            inner.session.take()
        };

        let (session, reply) = self.run_turn(session, text).await;

        let mut inner = self.lock();
        inner.session = session;
        inner.messages.push(reply.clone());
        inner.outstanding = false;
        Some(reply)
    }

    /// Resolve the client (lazily), run one turn, and map every failure to
    /// an error-flagged fallback bubble.
    async fn run_turn(&self, session: Option<GenSession>, text: &str) -> (Option<GenSession>, ChatMessage) {
        let mut session = match session {
            Some(session) => session,
            None => match self.llm.client().await {
                Ok(client) => GenSession::new(
                    client,
                    prompts::METAMODEL_SYSTEM_INSTRUCTION,
                    GenerationOptions {
                        temperature: Some(CHAT_TEMPERATURE),
                        response_format: ResponseFormat::FreeText,
                    },
                ),
                Err(e) => {
                    warn!(error = %e, "chat: client unavailable");
                    return (None, ChatMessage::error(prompts::CHAT_ERROR_FALLBACK));
                }
            },
        };

        let reply = match session.send(text).await {
            Ok(completion) => ChatMessage::assistant(completion.text_or(prompts::CHAT_EMPTY_FALLBACK)),
            Err(e) => {
                warn!(error = %e, "chat: send failed");
                ChatMessage::error(prompts::CHAT_ERROR_FALLBACK)
            }
        };
        (Some(session), reply)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChatInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
