//! Backend proxy client
//!
//! Posts `{image, type}` to `{base_url}/analyse` and reads the result body
//! as-is. On a non-success status the body's `error` field is surfaced, or a
//! message built from the status code when there is none.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{AnalysisClient, AnalysisError};
use crate::config::ProxySettings;
use crate::media::CapturedFrame;
use crate::state::data::{AnalysisCategory, AnalysisResult};

#[derive(Serialize)]
struct AnalyseRequest<'a> {
    image: &'a str,
    #[serde(rename = "type")]
    category: AnalysisCategory,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(settings: &ProxySettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/analyse", settings.base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisClient for ProxyClient {
    fn name(&self) -> &'static str {
        "proxy"
    }

    async fn analyze(
        &self,
        frame: &CapturedFrame,
        category: AnalysisCategory,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request = AnalyseRequest { image: &frame.jpeg_base64, category };
        debug!("POST {} ({} analysis)", self.endpoint, category);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Analysis request to {} failed: {}", self.endpoint, e);
                AnalysisError::Unreachable
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            error!("❌ Failed to read analysis response body: {}", e);
            AnalysisError::Unreachable
        })?;

        interpret_response(status, &body)
    }
}

/// Map a status code and raw body onto the analysis outcome
pub fn interpret_response(status: u16, body: &[u8]) -> Result<AnalysisResult, AnalysisError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body).map_err(|e| {
            error!("❌ Analysis response did not match the expected shape: {}", e);
            AnalysisError::InvalidResponse
        });
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Analysis request failed with status {status}"));

    error!("❌ Analysis backend returned {}: {}", status, message);
    Err(AnalysisError::Rejected(message))
}
