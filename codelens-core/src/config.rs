//! Configuration management for Codelens
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (CODELENS_*)
//! 3. Config file (~/.config/codelens/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hosted LLM service to use for reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// Short name used in config, logs and messages
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "openai/gpt-oss-20b",
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-2.5-flash",
        }
    }

    /// API root used when none is configured
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    /// Provider-specific environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(format!(
                "Unknown provider '{}'. Expected one of: groq, openai, gemini",
                other
            )),
        }
    }
}

/// How a chat-completions provider is asked for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuredOutput {
    /// Strict JSON schema response format
    JsonSchema,
    /// Plain JSON mode; shape is only checked locally
    JsonObject,
}

/// Provider-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which provider to call
    pub kind: ProviderKind,

    /// Model to use (provider default if unset)
    pub model: Option<String>,

    /// API root (provider default if unset)
    pub base_url: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on a single provider call
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// JSON mode for chat-completions providers (ignored by Gemini)
    pub structured_output: Option<StructuredOutput>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: None,
            base_url: None,
            temperature: 0.3,
            timeout: Duration::from_secs(60),
            structured_output: None,
        }
    }
}

impl ProviderConfig {
    /// Effective model name
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }

    /// Effective API root
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
    }

    /// Select a provider
    ///
    /// Switching to a different provider drops the model, base URL and JSON
    /// mode set for the previous one, so the new provider's defaults apply.
    pub fn switch_to(&mut self, kind: ProviderKind) {
        if kind != self.kind {
            self.model = None;
            self.base_url = None;
            self.structured_output = None;
        }
        self.kind = kind;
    }

    /// Effective structured output mode
    ///
    /// Groq defaults to JSON mode, OpenAI to a strict schema.
    pub fn structured_output(&self) -> StructuredOutput {
        self.structured_output.unwrap_or(match self.kind {
            ProviderKind::Groq => StructuredOutput::JsonObject,
            ProviderKind::OpenAi | ProviderKind::Gemini => StructuredOutput::JsonSchema,
        })
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Provider configuration
    pub provider: ProviderConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/codelens/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codelens").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - CODELENS_PROVIDER: Provider kind
    /// - CODELENS_MODEL: Model to use
    /// - CODELENS_BASE_URL: API root
    /// - CODELENS_TIMEOUT: Request timeout (e.g. "90s", "2m")
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(kind) = var("CODELENS_PROVIDER") {
            self.provider.switch_to(kind.parse().map_err(Error::Config)?);
        }

        if let Some(model) = var("CODELENS_MODEL") {
            self.provider.model = Some(model);
        }

        if let Some(base_url) = var("CODELENS_BASE_URL") {
            self.provider.base_url = Some(base_url);
        }

        if let Some(timeout) = var("CODELENS_TIMEOUT") {
            self.provider.timeout = humantime_serde::re::humantime::parse_duration(&timeout)
                .map_err(|e| Error::Config(format!("Invalid CODELENS_TIMEOUT '{}': {}", timeout, e)))?;
        }

        Ok(self)
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, provider: Option<ProviderKind>, model: Option<String>) -> Self {
        if let Some(kind) = provider {
            self.provider.switch_to(kind);
        }

        if let Some(m) = model {
            self.provider.model = Some(m);
        }

        self
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let temperature = self.provider.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::Config(format!(
                "temperature must be between 0 and 2, got {}",
                temperature
            )));
        }

        if self.provider.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }

        Ok(())
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(provider: Option<ProviderKind>, model: Option<String>) -> Result<Self> {
        let config = Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(provider, model);
        config.validate()?;
        Ok(config)
    }
}
