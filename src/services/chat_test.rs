use std::sync::Arc;

use super::*;
use crate::llm::testing::{self, GatedGen, ScriptedGen};

fn chat_with(upstream: Arc<ScriptedGen>) -> ChatSession {
    ChatSession::new(Llm::with_client(upstream))
}

#[tokio::test]
async fn starts_with_greeting() {
    let chat = chat_with(ScriptedGen::new(vec![]));
    let messages = chat.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, ChatRole::Assistant);
    assert_eq!(messages[0].text, prompts::CHAT_GREETING);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn send_appends_user_then_assistant_in_order() {
    let upstream = ScriptedGen::new(vec![testing::text("Rompe el trance."), testing::text("Beta perpetuo.")]);
    let chat = chat_with(upstream.clone());

    chat.send("estoy bloqueado").await.unwrap();
    chat.send("¿y ahora?").await.unwrap();

    let messages = chat.messages();
    let roles: Vec<ChatRole> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![ChatRole::Assistant, ChatRole::User, ChatRole::Assistant, ChatRole::User, ChatRole::Assistant]
    );
    assert_eq!(messages[2].text, "Rompe el trance.");
    assert_eq!(messages[4].text, "Beta perpetuo.");
    assert!(!chat.is_busy());

    // The session carried the first exchange into the second call.
    let calls = upstream.calls();
    assert_eq!(calls[1].turns.len(), 3);
}

#[tokio::test]
async fn blank_input_is_a_no_op() {
    let upstream = ScriptedGen::new(vec![]);
    let chat = chat_with(upstream.clone());

    assert!(chat.send("").await.is_none());
    assert!(chat.send("   \n").await.is_none());

    assert_eq!(chat.messages().len(), 1);
    assert_eq!(upstream.call_count(), 0);
    assert!(!chat.is_busy());
}

#[tokio::test]
async fn failure_appends_error_flagged_fallback_and_clears_busy() {
    let upstream = ScriptedGen::new(vec![testing::failure(), testing::text("recuperado")]);
    let chat = chat_with(upstream);

    let reply = chat.send("hola").await.unwrap();
    assert!(reply.is_error);
    assert_eq!(reply.text, prompts::CHAT_ERROR_FALLBACK);

    let messages = chat.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, ChatRole::User);
    assert!(messages[2].is_error);
    assert!(!chat.is_busy());

    // The surface stays usable: an immediate retry goes through.
    let reply = chat.send("hola").await.unwrap();
    assert!(!reply.is_error);
    assert_eq!(reply.text, "recuperado");
}

#[tokio::test]
async fn empty_completion_uses_fallback_text_without_error_flag() {
    let upstream = ScriptedGen::new(vec![testing::empty()]);
    let chat = chat_with(upstream);

    let reply = chat.send("hola").await.unwrap();
    assert!(!reply.is_error);
    assert_eq!(reply.text, prompts::CHAT_EMPTY_FALLBACK);
}

#[tokio::test]
async fn send_while_outstanding_is_rejected_with_one_upstream_call() {
    let upstream = GatedGen::new("respuesta");
    let chat = Arc::new(ChatSession::new(Llm::with_client(upstream.clone())));

    let first = tokio::spawn({
        let chat = chat.clone();
        async move { chat.send("primero").await }
    });

    // Wait until the first send is parked inside the upstream call.
    while !chat.is_busy() {
        tokio::task::yield_now().await;
    }

    assert!(chat.send("segundo").await.is_none());
    assert_eq!(upstream.call_count(), 1);

    upstream.release();
    let reply = first.await.unwrap().unwrap();
    assert_eq!(reply.text, "respuesta");
    assert_eq!(upstream.call_count(), 1);

    // Only the first user message and its reply were appended.
    let messages = chat.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].text, "primero");
}

#[tokio::test]
async fn missing_credential_degrades_to_error_bubble() {
    // Llm::new with no GEMINI_API_KEY in the environment fails lazily on
    // first use; the chat surface converts that into an error bubble.
    unsafe { std::env::remove_var("GEMINI_API_KEY") };
    let chat = ChatSession::new(Llm::new());

    let reply = chat.send("hola").await.unwrap();
    assert!(reply.is_error);
    assert_eq!(reply.text, prompts::CHAT_ERROR_FALLBACK);
    assert!(!chat.is_busy());
}
