//! The two-field review result contract

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{Error, Result};

/// Name of the structured-output schema sent to providers
pub(crate) const SCHEMA_NAME: &str = "CodeReview";

/// A validated code review: Markdown feedback plus rewritten code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    /// Review in Markdown
    pub review: String,
    /// Complete optimized version of the reviewed code
    #[serde(rename = "optimalCode")]
    pub optimal_code: String,
}

impl ReviewResult {
    /// Parse and validate raw provider text
    ///
    /// Both fields must be present, strings, and non-empty. Values are returned
    /// exactly as the model produced them.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::MalformedResponse(format!("reply is not valid JSON: {}", e)))?;

        let object = value
            .as_object()
            .ok_or_else(|| Error::MalformedResponse("reply is not a JSON object".to_string()))?;

        let field = |name: &str| -> Result<String> {
            match object.get(name).and_then(Value::as_str) {
                Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
                Some(_) => Err(Error::MalformedResponse(format!("field '{}' is empty", name))),
                None => Err(Error::MalformedResponse(format!(
                    "field '{}' is missing or not a string",
                    name
                ))),
            }
        };

        Ok(Self {
            review: field("review")?,
            optimal_code: field("optimalCode")?,
        })
    }

    /// JSON schema describing the expected reply
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "review": { "type": "string" },
                "optimalCode": { "type": "string" }
            },
            "required": ["review", "optimalCode"],
            "additionalProperties": false
        })
    }
}
