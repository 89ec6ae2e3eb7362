//! Gemini `generateContent` client behind the core advisory contract.

use std::time::Duration;

use medcalc_core::advisory::{AdvisoryRequest, AdvisoryService, AdvisorySettings, BoxFuture};
use medcalc_core::errors::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application version (from Cargo.toml)
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> CalcResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("MedCalc/{}", CURRENT_VERSION))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CalcError::advisory(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http, api_key })
    }

    async fn generate(&self, request: &AdvisoryRequest) -> CalcResult<Option<String>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CalcError::advisory("no API key configured (set API_KEY or GEMINI_API_KEY)")
        })?;

        let url = format!("{}/{}:generateContent", API_BASE, request.settings.model);
        debug!(%url, "calling Gemini");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::new(&request.prompt, &request.settings))
            .send()
            .await
            .map_err(|e| CalcError::advisory(format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(CalcError::advisory(format!("Gemini API returned {}", response.status())));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CalcError::advisory(format!("Failed to parse response: {}", e)))?;

        Ok(body.text())
    }
}

impl AdvisoryService for GeminiClient {
    fn complete<'a>(
        &'a self,
        request: &'a AdvisoryRequest,
    ) -> BoxFuture<'a, CalcResult<Option<String>>> {
        Box::pin(self.generate(request))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str, settings: &AdvisorySettings) -> Self {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                max_output_tokens: settings.max_output_tokens,
                thinking_config: ThinkingConfig {
                    thinking_budget: settings.thinking_budget,
                },
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}
