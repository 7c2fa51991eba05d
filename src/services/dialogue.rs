//! Guided dialogue — the two-phase challenge with "EL PULPO METAMODELADO".
//!
//! DESIGN
//! ======
//! The transition table is a pure function: `step(&mut state, event)` returns
//! the effect to perform and never touches the network, so the whole table is
//! testable without a mock upstream. The `Dialogue` executor performs the
//! returned effect against the shared client and feeds the outcome back in as
//! another event.
//!
//! Phases: IDLE -> THINKING -> WAITING_INPUT -> THINKING -> FEEDBACK -> IDLE.
//! A failed mood analysis drops back to IDLE with nothing retained; a failed
//! verdict rolls back to WAITING_INPUT so the same question can be retried.
//! Points reach the shared score exactly once, on the transition into
//! FEEDBACK.

use std::sync::{Mutex, PoisonError};

use serde::Deserialize;
use tracing::{info, warn};

use crate::llm::{GenAiError, GenerationOptions, Llm, ResponseFormat, Turn};
use crate::prompts;
use crate::state::Progress;

// =============================================================================
// STRUCTURED RESPONSE CONTRACTS
// =============================================================================

/// Phase-1 response: mood -> concept, cryptic thought, challenge question.
/// Every field is required; a missing field is a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MoodAnalysis {
    pub concept: String,
    pub thought: String,
    pub question: String,
}

/// Phase-2 response: answer -> feedback and a point award.
///
/// `points` is taken as the model sends it; only the score award is clamped
/// below at zero, because the accumulator never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerVerdict {
    pub feedback: String,
    pub points: i64,
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Thinking,
    WaitingInput,
    Feedback,
}

/// The dialogue's visible state. Mutated only by [`step`].
#[derive(Debug, Clone)]
pub struct DialogueState {
    pub phase: Phase,
    /// The octopus's visible message.
    pub message: String,
    pub concept: Option<String>,
    pub question: Option<String>,
    pub points_earned: i64,
}

impl DialogueState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            message: prompts::DIALOGUE_GREETING.to_string(),
            concept: None,
            question: None,
            points_earned: 0,
        }
    }
}

impl Default for DialogueState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogueEvent {
    /// User submitted a mood while IDLE.
    MoodSubmitted(String),
    /// User submitted an answer while WAITING_INPUT.
    AnswerSubmitted(String),
    AnalysisOk(MoodAnalysis),
    AnalysisFailed,
    VerdictOk(AnswerVerdict),
    VerdictFailed,
    /// Leave FEEDBACK for a fresh round.
    Reset,
}

/// What the executor must do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueEffect {
    None,
    RequestAnalysis { mood: String },
    RequestVerdict { question: String, answer: String },
    /// Propagate the round's points to the shared score. Emitted exactly
    /// once per WAITING_INPUT -> FEEDBACK transition.
    AwardPoints(i64),
}

/// Pure transition function. Events that do not apply to the current phase
/// (including blank submissions) leave the state untouched.
pub fn step(state: &mut DialogueState, event: DialogueEvent) -> DialogueEffect {
    match (state.phase, event) {
        (Phase::Idle, DialogueEvent::MoodSubmitted(mood)) if !mood.trim().is_empty() => {
            state.phase = Phase::Thinking;
            DialogueEffect::RequestAnalysis { mood: mood.trim().to_string() }
        }
        (Phase::Thinking, DialogueEvent::AnalysisOk(analysis)) => {
            state.phase = Phase::WaitingInput;
            state.message =
                prompts::dialogue_question_message(&analysis.concept, &analysis.thought, &analysis.question);
            state.concept = Some(analysis.concept);
            state.question = Some(analysis.question);
            DialogueEffect::None
        }
        (Phase::Thinking, DialogueEvent::AnalysisFailed) => {
            // No partial state survives a failed analysis.
            state.phase = Phase::Idle;
            state.message = prompts::DIALOGUE_ANALYSIS_FAILURE.to_string();
            state.concept = None;
            state.question = None;
            DialogueEffect::None
        }
        (Phase::WaitingInput, DialogueEvent::AnswerSubmitted(answer)) if !answer.trim().is_empty() => {
            state.phase = Phase::Thinking;
            DialogueEffect::RequestVerdict {
                question: state.question.clone().unwrap_or_default(),
                answer: answer.trim().to_string(),
            }
        }
        (Phase::Thinking, DialogueEvent::VerdictOk(verdict)) => {
            state.phase = Phase::Feedback;
            state.message = verdict.feedback;
            state.points_earned = verdict.points;
            DialogueEffect::AwardPoints(verdict.points)
        }
        (Phase::Thinking, DialogueEvent::VerdictFailed) => {
            // The question stays open so the user can retry; no points.
            state.phase = Phase::WaitingInput;
            state.message = prompts::DIALOGUE_FEEDBACK_FAILURE.to_string();
            DialogueEffect::None
        }
        (Phase::Feedback, DialogueEvent::Reset) => {
            state.phase = Phase::Idle;
            state.message = prompts::DIALOGUE_RESET_GREETING.to_string();
            state.concept = None;
            state.question = None;
            state.points_earned = 0;
            DialogueEffect::None
        }
        _ => DialogueEffect::None,
    }
}

// =============================================================================
// EXECUTOR
// =============================================================================

pub struct Dialogue {
    llm: Llm,
    state: Mutex<DialogueState>,
}

impl Dialogue {
    #[must_use]
    pub fn new(llm: Llm) -> Self {
        Self { llm, state: Mutex::new(DialogueState::new()) }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> DialogueState {
        self.lock().clone()
    }

    /// Submit user text for the current phase: a mood while IDLE, an answer
    /// while WAITING_INPUT. Anything else (blank text, THINKING, FEEDBACK)
    /// is a no-op. Returns the state after the round-trip settles.
    pub async fn submit(&self, text: &str, progress: &Progress) -> DialogueState {
        let effect = {
            let mut state = self.lock();
            let event = match state.phase {
                Phase::Idle => DialogueEvent::MoodSubmitted(text.to_string()),
                Phase::WaitingInput => DialogueEvent::AnswerSubmitted(text.to_string()),
                Phase::Thinking | Phase::Feedback => return state.clone(),
            };
            step(&mut state, event)
        };

        match effect {
            DialogueEffect::RequestAnalysis { mood } => {
                let event = match self.request_analysis(&mood).await {
                    Ok(analysis) => {
                        info!(concept = %analysis.concept, "dialogue: analysis received");
                        DialogueEvent::AnalysisOk(analysis)
                    }
                    Err(e) => {
                        warn!(error = %e, "dialogue: analysis failed");
                        DialogueEvent::AnalysisFailed
                    }
                };
                let mut state = self.lock();
                step(&mut state, event);
                state.clone()
            }
            DialogueEffect::RequestVerdict { question, answer } => {
                let event = match self.request_verdict(&question, &answer).await {
                    Ok(verdict) => {
                        info!(points = verdict.points, "dialogue: verdict received");
                        DialogueEvent::VerdictOk(verdict)
                    }
                    Err(e) => {
                        warn!(error = %e, "dialogue: verdict failed");
                        DialogueEvent::VerdictFailed
                    }
                };
                let mut state = self.lock();
                if let DialogueEffect::AwardPoints(points) = step(&mut state, event) {
                    progress.add_points(u64::try_from(points.max(0)).unwrap_or(0));
                }
                state.clone()
            }
            DialogueEffect::None | DialogueEffect::AwardPoints(_) => self.state(),
        }
    }

    /// Leave FEEDBACK and restore the greeting. No-op in other phases.
    pub fn reset(&self) -> DialogueState {
        let mut state = self.lock();
        step(&mut state, DialogueEvent::Reset);
        state.clone()
    }

    async fn request_analysis(&self, mood: &str) -> Result<MoodAnalysis, GenAiError> {
        self.request_json(prompts::mood_analysis_prompt(mood)).await
    }

    async fn request_verdict(&self, question: &str, answer: &str) -> Result<AnswerVerdict, GenAiError> {
        self.request_json(prompts::answer_feedback_prompt(question, answer)).await
    }

    /// One-shot JSON-format call, decoded into a typed contract. An empty
    /// completion or a malformed body is a parse failure — callers treat it
    /// exactly like a transport failure.
    async fn request_json<T: for<'de> Deserialize<'de>>(&self, prompt: String) -> Result<T, GenAiError> {
        let client = self.llm.client().await?;
        let options = GenerationOptions { temperature: None, response_format: ResponseFormat::JsonObject };
        let completion = client.generate(None, &[Turn::user(prompt)], &options).await?;
        let body = completion
            .text
            .ok_or_else(|| GenAiError::ApiParse("empty structured response".into()))?;
        serde_json::from_str(&body).map_err(|e| GenAiError::ApiParse(e.to_string()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DialogueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "dialogue_test.rs"]
mod tests;
