//! Gemini `generateContent` API client.
//!
//! Thin HTTP wrapper for `/v1beta/models/{model}:generateContent`. Request
//! construction (`build_request`) and response parsing (`parse_response`)
//! are pure for testability.

use std::time::Duration;

use super::config::GenAiConfig;
use super::types::{Completion, GenAiError, GenerationOptions, ResponseFormat, Role, TextGen, Turn};

const JSON_MIME_TYPE: &str = "application/json";

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    config: GenAiConfig,
}

impl GeminiClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::HttpClientBuild`] if the HTTP client fails to
    /// construct.
    pub fn new(config: GenAiConfig) -> Result<Self, GenAiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| GenAiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Model this client targets.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        )
    }
}

#[async_trait::async_trait]
impl TextGen for GeminiClient {
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[Turn],
        options: &GenerationOptions,
    ) -> Result<Completion, GenAiError> {
        let body = build_request(system, turns, options);

        let response = self
            .http
            .post(self.url())
            .json(&body)
            .send()
            .await
            .map_err(|e| GenAiError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GenAiError::ApiRequest(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(GenAiError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireInstruction<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: WireGenerationConfig,
}

#[derive(serde::Serialize)]
struct WireContent<'a> {
    role: &'static str,
    parts: Vec<WirePart<'a>>,
}

#[derive(serde::Serialize)]
struct WireInstruction<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(serde::Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(serde::Serialize)]
struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(serde::Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(serde::Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(serde::Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

// =============================================================================
// REQUEST BUILDING
// =============================================================================

fn build_request<'a>(
    system: Option<&'a str>,
    turns: &'a [Turn],
    options: &GenerationOptions,
) -> ApiRequest<'a> {
    let contents = turns
        .iter()
        .map(|turn| WireContent {
            role: match turn.role {
                Role::User => "user",
                Role::Model => "model",
            },
            parts: vec![WirePart { text: &turn.text }],
        })
        .collect();

    let response_mime_type = match options.response_format {
        ResponseFormat::FreeText => None,
        ResponseFormat::JsonObject => Some(JSON_MIME_TYPE),
    };

    ApiRequest {
        contents,
        system_instruction: system.map(|text| WireInstruction { parts: vec![WirePart { text }] }),
        generation_config: WireGenerationConfig { temperature: options.temperature, response_mime_type },
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<Completion, GenAiError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| GenAiError::ApiParse(e.to_string()))?;

    // Join the text parts of the first candidate. A response with no
    // candidates or no text is a legitimate empty completion.
    let text = api
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|joined| !joined.trim().is_empty());

    Ok(Completion { text })
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
