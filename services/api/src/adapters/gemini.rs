//! services/api/src/adapters/gemini.rs
//!
//! Adapter for Google's Gemini `generateContent` endpoint.
//! It implements the `IdeaGenerationService` port from the `core` crate.

use async_trait::async_trait;
use idea_radar_core::ports::{IdeaGenerationService, PortError, PortResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

const TEMPERATURE: f32 = 0.8;
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;
const MAX_OUTPUT_TOKENS: u32 = 2048;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

fn build_request(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            top_k: TOP_K,
            top_p: TOP_P,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|&category| SafetySetting {
                category,
                threshold: SAFETY_THRESHOLD,
            })
            .collect(),
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `IdeaGenerationService` using a Gemini model.
#[derive(Clone)]
pub struct GeminiIdeasAdapter {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiIdeasAdapter {
    pub fn new(
        http: reqwest::Client,
        api_base: String,
        model: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            api_base,
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

//=========================================================================================
// `IdeaGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdeaGenerationService for GeminiIdeasAdapter {
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PortError::MissingCredentials("GEMINI_API_KEY".to_string()))?;

        debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting ideas");

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&build_request(prompt))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PortError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PortError::InvalidResponse(format!("Gemini payload: {}", e)))?;

        payload.into_text().ok_or_else(|| {
            PortError::InvalidResponse("No content received from Gemini".to_string())
        })
    }
}
