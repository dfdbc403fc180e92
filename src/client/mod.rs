/// Analysis client module
///
/// One trait, two interchangeable backends:
/// - `gemini.rs` - sends the frame straight to the generative model
/// - `proxy.rs` - posts the frame to the backend's `/analyse` endpoint
///
/// The backend is picked once, from `AppConfig`, when the app starts.

pub mod gemini;
pub mod prompt;
pub mod proxy;

#[cfg(test)]
mod testing;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, BackendKind};
use crate::media::CapturedFrame;
use crate::state::data::{AnalysisCategory, AnalysisResult};

pub use gemini::GeminiClient;
pub use proxy::ProxyClient;

/// User-facing failure of one analysis attempt.
///
/// Transport and parse errors are logged where they happen and never
/// reach the UI in raw form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The service answered with an error (message is safe to show)
    #[error("{0}")]
    Rejected(String),

    #[error("Could not reach the analysis service. Please check your connection and try again.")]
    Unreachable,

    #[error("Failed to get analysis from AI. The response was not in the expected format.")]
    InvalidResponse,

    #[error("No API key is configured. Set GEMINI_API_KEY and restart the app.")]
    MissingCredentials,
}

/// Performs exactly one request per call; no retries
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    async fn analyze(
        &self,
        frame: &CapturedFrame,
        category: AnalysisCategory,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// Compose the client selected by configuration
pub fn build_client(config: &AppConfig) -> Arc<dyn AnalysisClient> {
    let client: Arc<dyn AnalysisClient> = match config.backend {
        BackendKind::Gemini => Arc::new(GeminiClient::new(&config.gemini)),
        BackendKind::Proxy => Arc::new(ProxyClient::new(&config.proxy)),
    };
    info!("🔌 Analysis backend: {}", client.name());
    client
}
