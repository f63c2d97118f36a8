//! Hosted LLM providers
//!
//! A [`Provider`] sends one rendered prompt to a remote model and returns the
//! raw reply text. Validation of that text is left to
//! [`ReviewResult::parse`](crate::review::ReviewResult::parse), so every
//! provider is held to the same contract whatever its native guarantees.

mod chat;
mod gemini;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{ProviderConfig, ProviderKind};
use crate::{Error, Result};

pub use chat::ChatCompletionsProvider;
pub use gemini::GeminiProvider;

/// User agent sent with every provider request
pub(crate) const USER_AGENT: &str = concat!("codelens/", env!("CARGO_PKG_VERSION"));

/// A single prompt sent to a provider
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System message
    pub system: String,
    /// User message
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// JSON schema the reply should conform to
    pub schema: Value,
}

/// Trait for hosted LLM providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the name of this provider
    fn name(&self) -> &'static str;

    /// Send the request and return the model's reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Build the provider selected by `config`
pub fn build_provider(config: &ProviderConfig, api_key: String) -> Result<Box<dyn Provider>> {
    let provider: Box<dyn Provider> = match config.kind {
        ProviderKind::Groq | ProviderKind::OpenAi => Box::new(ChatCompletionsProvider::new(
            config.kind.name(),
            config.base_url(),
            api_key,
            config.model(),
            config.structured_output(),
        )?),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(
            config.base_url(),
            api_key,
            config.model(),
        )?),
    };
    Ok(provider)
}

/// Build the shared HTTP client
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Validate a base URL and strip any trailing slash
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| Error::Config(format!("Invalid provider base URL '{}': {}", base_url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "Provider base URL must be http or https: {}",
            base_url
        )));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

/// Turn a non-success HTTP response into a provider error
pub(crate) async fn status_error(provider: &'static str, response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::provider(provider, format!("HTTP {} - {}", status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.groq.com/openai/v1/").unwrap(),
            "https://api.groq.com/openai/v1"
        );
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_build_provider_per_kind() {
        let mut config = ProviderConfig::default();
        let provider = build_provider(&config, "key".to_string()).unwrap();
        assert_eq!(provider.name(), "groq");

        config.kind = ProviderKind::OpenAi;
        let provider = build_provider(&config, "key".to_string()).unwrap();
        assert_eq!(provider.name(), "openai");

        config.kind = ProviderKind::Gemini;
        let provider = build_provider(&config, "key".to_string()).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_build_provider_rejects_bad_url() {
        let config = ProviderConfig {
            base_url: Some("::nope".to_string()),
            ..ProviderConfig::default()
        };
        assert!(matches!(
            build_provider(&config, "key".to_string()),
            Err(Error::Config(_))
        ));
    }
}
