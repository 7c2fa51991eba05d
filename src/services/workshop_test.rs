use std::sync::Arc;

use super::*;
use crate::llm::testing::{self, GatedGen, ScriptedGen};

fn workshop_with(upstream: Arc<ScriptedGen>) -> Workshop {
    Workshop::new(Llm::with_client(upstream))
}

#[tokio::test]
async fn mutate_returns_upstream_text_verbatim() {
    let upstream = ScriptedGen::new(vec![testing::text("1. Pinta a ciegas.\n2. Invierte el lienzo.")]);
    let workshop = workshop_with(upstream.clone());

    let output = workshop.mutate("bloqueo creativo", MutationFilter::Glitch).await.unwrap();
    assert_eq!(output, "1. Pinta a ciegas.\n2. Invierte el lienzo.");

    let result = workshop.last_result();
    assert_eq!(result.text.as_deref(), Some("1. Pinta a ciegas.\n2. Invierte el lienzo."));
    assert!(!result.is_loading);

    // One stateless call: no system instruction, max temperature, the
    // filter label embedded in the prompt.
    let calls = upstream.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].system.is_none());
    assert_eq!(calls[0].turns.len(), 1);
    assert!(calls[0].turns[0].text.contains("bloqueo creativo"));
    assert!(calls[0].turns[0].text.contains("GLITCH"));
    assert!((calls[0].options.temperature.unwrap() - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn failure_degrades_to_fixed_fallback() {
    let upstream = ScriptedGen::new(vec![testing::failure()]);
    let workshop = workshop_with(upstream);

    let output = workshop.mutate("bloqueo creativo", MutationFilter::Glitch).await.unwrap();
    assert_eq!(output, prompts::MUTATION_ERROR_FALLBACK);
    assert!(!workshop.is_busy());
}

#[tokio::test]
async fn empty_completion_degrades_to_empty_fallback() {
    let upstream = ScriptedGen::new(vec![testing::empty()]);
    let workshop = workshop_with(upstream);

    let output = workshop.mutate("retrato aburrido", MutationFilter::Sabotage).await.unwrap();
    assert_eq!(output, prompts::MUTATION_EMPTY_FALLBACK);
}

#[tokio::test]
async fn blank_idea_is_a_no_op() {
    let upstream = ScriptedGen::new(vec![]);
    let workshop = workshop_with(upstream.clone());

    assert!(workshop.mutate("  ", MutationFilter::Code).await.is_none());
    assert_eq!(upstream.call_count(), 0);
    assert!(workshop.last_result().text.is_none());
}

#[tokio::test]
async fn new_request_overwrites_previous_result() {
    let upstream = ScriptedGen::new(vec![testing::text("primera"), testing::text("segunda")]);
    let workshop = workshop_with(upstream);

    workshop.mutate("idea", MutationFilter::Glitch).await.unwrap();
    workshop.mutate("idea", MutationFilter::Fragment).await.unwrap();
    assert_eq!(workshop.last_result().text.as_deref(), Some("segunda"));
}

#[tokio::test]
async fn request_while_outstanding_is_rejected() {
    let upstream = GatedGen::new("mutación");
    let workshop = Arc::new(Workshop::new(Llm::with_client(upstream.clone())));

    let first = tokio::spawn({
        let workshop = workshop.clone();
        async move { workshop.mutate("idea", MutationFilter::Glitch).await }
    });

    while !workshop.is_busy() {
        tokio::task::yield_now().await;
    }

    assert!(workshop.mutate("otra idea", MutationFilter::Code).await.is_none());
    assert_eq!(upstream.call_count(), 1);

    upstream.release();
    assert_eq!(first.await.unwrap().unwrap(), "mutación");
}

#[test]
fn filter_parse_accepts_known_names_case_insensitively() {
    assert_eq!(MutationFilter::parse("glitch"), Some(MutationFilter::Glitch));
    assert_eq!(MutationFilter::parse(" SABOTAGE "), Some(MutationFilter::Sabotage));
    assert_eq!(MutationFilter::parse("Fragment"), Some(MutationFilter::Fragment));
    assert_eq!(MutationFilter::parse("code"), Some(MutationFilter::Code));
    assert_eq!(MutationFilter::parse("ruido"), None);
}
