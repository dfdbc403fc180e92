//! Application configuration
//!
//! Built once at startup from the process environment and handed to the
//! analysis client constructor. Nothing else reads the environment.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

use crate::media::MediaTools;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Which analysis client the application is composed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Call the generative model directly
    Gemini,
    /// Go through the backend proxy's `/analyse` endpoint
    Proxy,
}

/// Settings for the direct-to-model client
#[derive(Clone, Serialize)]
pub struct GeminiSettings {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Settings for the backend proxy client
#[derive(Debug, Clone, Serialize)]
pub struct ProxySettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub gemini: GeminiSettings,
    pub proxy: ProxySettings,
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let backend_url = get("ANALYSIS_BACKEND_URL");
        let default_backend = if backend_url.is_some() {
            BackendKind::Proxy
        } else {
            BackendKind::Gemini
        };

        let backend = match get("ANALYSIS_BACKEND").map(|v| v.to_lowercase()) {
            None => default_backend,
            Some(v) if v == "gemini" || v == "direct" => BackendKind::Gemini,
            Some(v) if v == "proxy" || v == "backend" => BackendKind::Proxy,
            Some(other) => {
                warn!("⚠️  Unknown ANALYSIS_BACKEND '{}', using {:?}", other, default_backend);
                default_backend
            }
        };

        let api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));

        let config = Self {
            backend,
            gemini: GeminiSettings {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                endpoint: get("GEMINI_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            },
            proxy: ProxySettings {
                base_url: backend_url.unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            },
            ffmpeg_path: get("FFMPEG_PATH").map(PathBuf::from).unwrap_or_else(|| "ffmpeg".into()),
            ffprobe_path: get("FFPROBE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| "ffprobe".into()),
        };

        if config.backend == BackendKind::Gemini && config.gemini.api_key.is_none() {
            // Startup continues; the request itself will fail
            warn!("⚠️  GEMINI_API_KEY / API_KEY not set. Analysis requests will fail until it is.");
        }

        config
    }

    pub fn media_tools(&self) -> MediaTools {
        MediaTools {
            ffmpeg: self.ffmpeg_path.clone(),
            ffprobe: self.ffprobe_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.backend, BackendKind::Gemini);
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.proxy.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.media_tools(), MediaTools::default());
    }

    #[test]
    fn test_backend_url_selects_proxy() {
        let config = config_with(&[("ANALYSIS_BACKEND_URL", "http://10.0.0.5:9000")]);
        assert_eq!(config.backend, BackendKind::Proxy);
        assert_eq!(config.proxy.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn test_explicit_backend_wins() {
        let config = config_with(&[
            ("ANALYSIS_BACKEND", "Gemini"),
            ("ANALYSIS_BACKEND_URL", "http://10.0.0.5:9000"),
            ("API_KEY", "abc"),
        ]);
        assert_eq!(config.backend, BackendKind::Gemini);
        assert_eq!(config.gemini.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_unknown_backend_falls_back() {
        let config = config_with(&[("ANALYSIS_BACKEND", "carrier-pigeon")]);
        assert_eq!(config.backend, BackendKind::Gemini);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = config_with(&[("GEMINI_API_KEY", "  "), ("API_KEY", "fallback")]);
        assert_eq!(config.gemini.api_key.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config_with(&[("GEMINI_API_KEY", "super-secret")]);
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
