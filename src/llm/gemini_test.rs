use super::*;

fn make_response(candidates: serde_json::Value) -> String {
    serde_json::json!({
        "candidates": candidates,
        "modelVersion": "gemini-2.5-flash",
        "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
    })
    .to_string()
}

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([
        { "content": { "role": "model", "parts": [{ "text": "Hola, entidad." }] } }
    ]));
    let completion = parse_response(&json).unwrap();
    assert_eq!(completion.text.as_deref(), Some("Hola, entidad."));
}

#[test]
fn parse_joins_multiple_parts() {
    let json = make_response(serde_json::json!([
        { "content": { "role": "model", "parts": [{ "text": "uno " }, { "text": "dos" }] } }
    ]));
    let completion = parse_response(&json).unwrap();
    assert_eq!(completion.text.as_deref(), Some("uno dos"));
}

#[test]
fn parse_no_candidates_is_empty_completion() {
    let json = make_response(serde_json::json!([]));
    let completion = parse_response(&json).unwrap();
    assert!(completion.text.is_none());
}

#[test]
fn parse_whitespace_only_text_is_empty_completion() {
    let json = make_response(serde_json::json!([
        { "content": { "role": "model", "parts": [{ "text": "  \n" }] } }
    ]));
    let completion = parse_response(&json).unwrap();
    assert!(completion.text.is_none());
}

#[test]
fn parse_candidate_without_content_is_empty_completion() {
    // Safety-blocked candidates arrive with a finishReason and no content.
    let json = make_response(serde_json::json!([{ "finishReason": "SAFETY" }]));
    let completion = parse_response(&json).unwrap();
    assert!(completion.text.is_none());
}

#[test]
fn parse_invalid_json() {
    let result = parse_response("not json");
    assert!(matches!(result.unwrap_err(), GenAiError::ApiParse(_)));
}

#[test]
fn build_request_maps_roles_and_options() {
    let turns = vec![Turn::user("hola"), Turn::model("saludos"), Turn::user("sigo")];
    let options = GenerationOptions { temperature: Some(0.9), response_format: ResponseFormat::FreeText };
    let body = serde_json::to_value(build_request(Some("instrucción"), &turns, &options)).unwrap();

    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][1]["role"], "model");
    assert_eq!(body["contents"][2]["parts"][0]["text"], "sigo");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "instrucción");
    assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert!(body["generationConfig"].get("responseMimeType").is_none());
}

#[test]
fn build_request_json_format_sets_mime_type() {
    let turns = vec![Turn::user("analiza")];
    let options = GenerationOptions { temperature: None, response_format: ResponseFormat::JsonObject };
    let body = serde_json::to_value(build_request(None, &turns, &options)).unwrap();

    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert!(body.get("systemInstruction").is_none());
    assert!(body["generationConfig"].get("temperature").is_none());
}
