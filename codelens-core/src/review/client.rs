//! Review client: prompt, provider call, validation

use std::time::Duration;

use tracing::{debug, info, warn};

use super::{ReviewPrompt, ReviewResult};
use crate::config::{Config, ProviderConfig};
use crate::provider::{build_provider, CompletionRequest, Provider};
use crate::{Error, Language, Result, Secrets};

/// Per-request settings for the review client
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewSettings {
    /// Sampling temperature sent to the provider
    pub temperature: f32,
    /// Upper bound on a single provider call
    pub timeout: Duration,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self::from(&ProviderConfig::default())
    }
}

impl From<&ProviderConfig> for ReviewSettings {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            temperature: config.temperature,
            timeout: config.timeout,
        }
    }
}

/// Sends review prompts to a provider and validates the replies
pub struct ReviewClient {
    provider: Box<dyn Provider>,
    settings: ReviewSettings,
}

impl ReviewClient {
    /// Create a client around an existing provider
    pub fn new(provider: impl Provider + 'static, settings: ReviewSettings) -> Self {
        Self {
            provider: Box::new(provider),
            settings,
        }
    }

    /// Create a client from configuration and secrets
    ///
    /// Fails with [`Error::Config`] when no API key is available for the
    /// configured provider.
    pub fn from_config(config: &Config, secrets: &Secrets) -> Result<Self> {
        let kind = config.provider.kind;
        let api_key = secrets.api_key(kind).ok_or_else(|| {
            Error::Config(format!(
                "{} credential not set. Set {} (or CODELENS_API_KEY) \
                 or add api_key under [{}] in ~/.config/codelens/secrets.toml",
                kind,
                kind.api_key_env(),
                kind
            ))
        })?;

        let provider = build_provider(&config.provider, api_key)?;

        info!(
            provider = %kind,
            model = %config.provider.model(),
            "Created review client"
        );

        Ok(Self {
            provider,
            settings: ReviewSettings::from(&config.provider),
        })
    }

    /// Get the provider name
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Get the request settings
    pub fn settings(&self) -> &ReviewSettings {
        &self.settings
    }

    /// Request a review of `source_code`
    ///
    /// Makes exactly one provider call. The reply must contain non-empty
    /// `review` and `optimalCode` strings, which are returned untouched.
    pub async fn request_review(&self, source_code: &str, language: Language) -> Result<ReviewResult> {
        if source_code.trim().is_empty() {
            return Err(Error::Validation(crate::session::EMPTY_SOURCE_MESSAGE.to_string()));
        }

        let prompt = ReviewPrompt::new(source_code, language);
        let request = CompletionRequest {
            system: prompt.system,
            prompt: prompt.user,
            temperature: self.settings.temperature,
            schema: ReviewResult::json_schema(),
        };

        info!(
            provider = self.provider.name(),
            language = %language,
            bytes = source_code.len(),
            "Requesting code review"
        );

        let text = match tokio::time::timeout(self.settings.timeout, self.provider.complete(&request)).await {
            Ok(reply) => reply?,
            Err(_) => {
                warn!(
                    provider = self.provider.name(),
                    timeout = ?self.settings.timeout,
                    "Provider did not respond in time"
                );
                return Err(Error::Timeout(self.settings.timeout));
            }
        };

        let result = ReviewResult::parse(&text)?;

        debug!(
            review_bytes = result.review.len(),
            optimal_code_bytes = result.optimal_code.len(),
            "Received valid review"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for ReviewClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewClient")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::secrets::ProviderSecrets;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Records requests and replies with a fixed text
    struct RecordingProvider {
        reply: String,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl Provider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(String::new())
        }
    }

    fn recording(reply: &str) -> (RecordingProvider, Arc<Mutex<Vec<CompletionRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingProvider {
                reply: reply.to_string(),
                seen: Arc::clone(&seen),
            },
            seen,
        )
    }

    #[tokio::test]
    async fn test_request_review_success() {
        let (provider, seen) =
            recording(r##"{"review": "# Summary\nFine.", "optimalCode": "fn main() {}"}"##);
        let client = ReviewClient::new(provider, ReviewSettings::default());

        let result = client
            .request_review("fn main(){}", Language::Rust)
            .await
            .unwrap();

        assert_eq!(result.review, "# Summary\nFine.");
        assert_eq!(result.optimal_code, "fn main() {}");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].prompt.contains("```rust\nfn main(){}\n```"));
        assert_eq!(seen[0].temperature, 0.3);
        assert_eq!(seen[0].schema, ReviewResult::json_schema());
    }

    #[tokio::test]
    async fn test_request_review_malformed() {
        let (provider, _) = recording(r#"{"review": "no code here"}"#);
        let client = ReviewClient::new(provider, ReviewSettings::default());

        let err = client
            .request_review("print(1)", Language::Python)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_request_review_rejects_blank_source() {
        let (provider, seen) = recording("{}");
        let client = ReviewClient::new(provider, ReviewSettings::default());

        let err = client
            .request_review(" \n\t", Language::Go)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_review_timeout() {
        let settings = ReviewSettings {
            temperature: 0.0,
            timeout: Duration::from_millis(20),
        };
        let client = ReviewClient::new(SlowProvider, settings);

        let err = client
            .request_review("SELECT 1;", Language::Sql)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[test]
    fn test_from_config_without_credential() {
        let mut config = Config::default();
        config.provider.kind = ProviderKind::Gemini;

        // Only fails if nothing is set in the environment for gemini
        if std::env::var("CODELENS_API_KEY").is_err() && std::env::var("GEMINI_API_KEY").is_err() {
            let err = ReviewClient::from_config(&config, &Secrets::default()).unwrap_err();
            assert!(matches!(err, Error::Config(ref m) if m.contains("credential not set")));
        }
    }

    #[test]
    fn test_from_config_with_file_credential() {
        let config = Config::default();
        let secrets = Secrets {
            groq: ProviderSecrets {
                api_key: Some("gsk_test".to_string()),
            },
            ..Secrets::default()
        };

        let client = ReviewClient::from_config(&config, &secrets).unwrap();
        assert_eq!(client.provider_name(), "groq");
        assert_eq!(client.settings().timeout, Duration::from_secs(60));
    }
}
