//! OpenAI-compatible chat completions provider (Groq, OpenAI)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, normalize_base_url, status_error, CompletionRequest, Provider};
use crate::config::StructuredOutput;
use crate::review::SCHEMA_NAME;
use crate::{Error, Result};

/// Provider speaking the `/chat/completions` protocol
#[derive(Clone)]
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    name: &'static str,
    base_url: String,
    api_key: String,
    model: String,
    structured_output: StructuredOutput,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a provider for an OpenAI-compatible endpoint
    pub fn new(
        name: &'static str,
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        structured_output: StructuredOutput,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            name,
            base_url: normalize_base_url(base_url)?,
            api_key: api_key.into(),
            model: model.into(),
            structured_output,
        })
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    fn response_format(&self, schema: &Value) -> Value {
        match self.structured_output {
            StructuredOutput::JsonSchema => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": schema,
                }
            }),
            StructuredOutput::JsonObject => json!({ "type": "json_object" }),
        }
    }
}

#[async_trait]
impl Provider for ChatCompletionsProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            response_format: self.response_format(&request.schema),
        };

        debug!(
            provider = self.name,
            model = %self.model,
            structured_output = ?self.structured_output,
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::provider(self.name, e))?;

        if !response.status().is_success() {
            return Err(status_error(self.name, response).await);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(self.name, e))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::MalformedResponse("provider returned no message content".to_string()))
    }
}

impl std::fmt::Debug for ChatCompletionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsProvider")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
