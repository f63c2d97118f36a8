//! Google Gemini `generateContent` provider

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{http_client, normalize_base_url, status_error, CompletionRequest, Provider};
use crate::{Error, Result};

const NAME: &str = "gemini";

/// Provider for the Gemini API, using its native `responseSchema`
#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a Gemini provider
    pub fn new(base_url: &str, api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: normalize_base_url(base_url)?,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Convert a JSON schema into Gemini's OpenAPI-subset schema
///
/// Type names are upper-cased and `additionalProperties` is dropped, since the
/// API rejects it.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                match key.as_str() {
                    "additionalProperties" => {}
                    "type" => {
                        let ty = value
                            .as_str()
                            .map(|s| Value::String(s.to_ascii_uppercase()))
                            .unwrap_or_else(|| value.clone());
                        out.insert(key.clone(), ty);
                    }
                    _ => {
                        out.insert(key.clone(), to_gemini_schema(value));
                    }
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_gemini_schema).collect()),
        other => other.clone(),
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": request.system }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "responseMimeType": "application/json",
                "responseSchema": to_gemini_schema(&request.schema),
            }
        });

        debug!(provider = NAME, model = %self.model, "Sending generateContent request");

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(NAME, e))?;

        if !response.status().is_success() {
            return Err(status_error(NAME, response).await);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(NAME, e))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::MalformedResponse(
                "provider returned no candidate text".to_string(),
            ));
        }

        Ok(text)
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
