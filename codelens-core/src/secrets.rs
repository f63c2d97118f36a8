//! Secrets management for Codelens
//!
//! Provider API keys are stored separately from configuration to avoid
//! accidental sharing. The secrets file is located at
//! `~/.config/codelens/secrets.toml` and must have restrictive permissions
//! (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (CODELENS_API_KEY, then GROQ_API_KEY / OPENAI_API_KEY / GEMINI_API_KEY)
//! 2. Secrets file (~/.config/codelens/secrets.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ProviderKind;
use crate::{Error, Result};

/// Generic API key variable, checked before the provider-specific one
const API_KEY_ENV: &str = "CODELENS_API_KEY";

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// Groq credentials
    pub groq: ProviderSecrets,
    /// OpenAI credentials
    pub openai: ProviderSecrets,
    /// Gemini credentials
    pub gemini: ProviderSecrets,
}

/// Credentials for one provider
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderSecrets {
    /// API key
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSecrets")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        let secrets_path = Self::default_secrets_path();

        if let Some(path) = secrets_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        // Check file permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            // Check if file is readable by group or others (mode & 0o077)
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        for entry in [&mut secrets.groq, &mut secrets.openai, &mut secrets.gemini] {
            if let Some(ref mut key) = entry.api_key {
                *key = key.trim().to_string();
            }
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/codelens/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("codelens").join("secrets.toml"))
    }

    fn section(&self, kind: ProviderKind) -> &ProviderSecrets {
        match kind {
            ProviderKind::Groq => &self.groq,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
        }
    }

    /// Get the API key for a provider with environment variable override
    ///
    /// Priority: CODELENS_API_KEY > provider env var > secrets file
    pub fn api_key(&self, kind: ProviderKind) -> Option<String> {
        self.api_key_from(kind, |name| std::env::var(name).ok())
    }

    fn api_key_from(&self, kind: ProviderKind, var: impl Fn(&str) -> Option<String>) -> Option<String> {
        for name in [API_KEY_ENV, kind.api_key_env()] {
            if let Some(key) = var(name) {
                let key = key.trim().to_string();
                if !key.is_empty() {
                    debug!(variable = name, "Using API key from environment variable");
                    return Some(key);
                }
            }
        }

        // Fall back to secrets file
        if let Some(ref key) = self.section(kind).api_key {
            if !key.is_empty() {
                debug!(provider = %kind, "Using API key from secrets file");
                return Some(key.clone());
            }
        }

        None
    }

    /// Create a template secrets file at the default location
    ///
    /// Creates parent directories if needed and sets secure permissions
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;
        Self::create_template_at(&path)?;
        Ok(path)
    }

    /// Create a template secrets file at `path`
    pub fn create_template_at(path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        // Don't overwrite existing file
        if path.exists() {
            return Err(Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }

        let template = r#"# Codelens Secrets
# This file contains sensitive credentials - do not share or commit to version control
#
# IMPORTANT: This file must have restrictive permissions (chmod 600)
# Environment variables (CODELENS_API_KEY, GROQ_API_KEY, ...) take priority.

[groq]
# Create at: https://console.groq.com/keys
api_key = ""

[openai]
api_key = ""

[gemini]
# Create at: https://aistudio.google.com/apikey
api_key = ""
"#;

        std::fs::write(path, template).map_err(Error::Io)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms).map_err(Error::Io)?;
        }

        warn!(path = %path.display(), "Created secrets template - please edit and add your API key");

        Ok(())
    }
}
