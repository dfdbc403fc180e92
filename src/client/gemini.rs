//! Direct-to-model client
//!
//! Sends the frame and a category-specific instruction to the Gemini
//! `generateContent` REST endpoint, constrained to JSON output matching
//! `AnalysisResult`, then parses the returned text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use super::{prompt, AnalysisClient, AnalysisError};
use crate::config::GeminiSettings;
use crate::media::CapturedFrame;
use crate::state::data::{AnalysisCategory, AnalysisResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    InlineData(Blob<'a>),
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            url: format!(
                "{}/v1beta/models/{}:generateContent",
                settings.endpoint.trim_end_matches('/'),
                settings.model
            ),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn analyze(
        &self,
        frame: &CapturedFrame,
        category: AnalysisCategory,
    ) -> Result<AnalysisResult, AnalysisError> {
        let Some(api_key) = self.api_key.as_deref() else {
            error!("❌ Cannot analyze: no API key configured");
            return Err(AnalysisError::MissingCredentials);
        };

        let request = build_request(frame, category);
        debug!("POST {} ({} analysis)", self.url, category);

        let response = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Error calling the Gemini API: {}", e);
                AnalysisError::Unreachable
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("❌ Failed to read Gemini response body: {}", e);
            AnalysisError::Unreachable
        })?;

        if !status.is_success() {
            error!(
                "❌ Gemini API returned {}: {}",
                status,
                String::from_utf8_lossy(&body)
            );
            return Err(AnalysisError::Rejected(format!(
                "The AI service rejected the request (status {}).",
                status.as_u16()
            )));
        }

        parse_response(&body)
    }
}

fn build_request(frame: &CapturedFrame, category: AnalysisCategory) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData(Blob {
                    mime_type: CapturedFrame::MIME_TYPE,
                    data: &frame.jpeg_base64,
                }),
                Part::Text(prompt::instruction(category)),
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: prompt::response_schema(),
        },
    }
}

/// Pull the model's JSON text out of a `generateContent` response
fn parse_response(body: &[u8]) -> Result<AnalysisResult, AnalysisError> {
    let response: GenerateContentResponse = serde_json::from_slice(body).map_err(|e| {
        error!("❌ Unreadable Gemini response: {}", e);
        AnalysisError::InvalidResponse
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        error!("❌ Gemini response carried no text");
        return Err(AnalysisError::InvalidResponse);
    }

    AnalysisResult::from_json(text).map_err(|e| {
        error!("❌ Gemini output did not match the result schema: {}", e);
        AnalysisError::InvalidResponse
    })
}
