//! Google Gemini `generateContent` provider and wire types

use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{CredentialProvider, LlmProvider};
use crate::agents::error::{LlmError, LlmResult};
use crate::domain::FunctionCall;

/// Default REST endpoint for the Gemini API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// Request types

/// Body of a `generateContent` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Omitted entirely when the agent has no enabled tools
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDeclarations>>,
}

/// One conversation turn (or the system instruction, which has no role)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Content without a role, as used for `systemInstruction`
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallPart>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_call: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallPart {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

/// Wrapper Gemini expects around the declaration list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclarations {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

/// Schema type tags understood by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub properties: Properties,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub description: String,
}

/// Property map that serializes in insertion order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties(pub Vec<(String, PropertySchema)>);

impl Properties {
    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

// Response types

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
    #[serde(default)]
    pub total_token_count: Option<u32>,
}

impl UsageMetadata {
    /// Reported total, or prompt plus candidates when the total is absent
    pub fn total_tokens(&self) -> u64 {
        match self.total_token_count {
            Some(total) => u64::from(total),
            None => {
                u64::from(self.prompt_token_count.unwrap_or(0))
                    + u64::from(self.candidates_token_count.unwrap_or(0))
            }
        }
    }
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text of the first candidate; empty when there is none
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// Function calls requested by the first candidate
    pub fn function_calls(&self) -> Vec<FunctionCall> {
        self.first_parts()
            .iter()
            .filter_map(|p| p.function_call.as_ref())
            .map(|fc| FunctionCall {
                name: fc.name.clone(),
                args: fc
                    .args
                    .clone()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            })
            .collect()
    }
}

/// Google Gemini LLM Provider
pub struct GeminiProvider {
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    timeout: Option<Duration>,
}

impl GeminiProvider {
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a fresh HTTP client for one request
    pub fn client(&self) -> LlmResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(LlmError::from)
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> LlmResult<GenerateContentResponse> {
        let api_key = self
            .credentials
            .api_key()
            .await
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::Authentication("No Gemini API key configured".to_string()))?;

        let response = self
            .client()?
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication(error_text),
                code => LlmError::Api {
                    status: code,
                    message: error_text,
                },
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::llm::StaticCredential;
    use serde_json::json;

    #[test]
    fn test_request_without_tools_has_no_tools_key() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("user", "hello")],
            system_instruction: Some(Content::instruction("be brief")),
            tools: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
    }

    #[test]
    fn test_properties_keep_insertion_order() {
        let props = Properties(vec![
            (
                "zeta".to_string(),
                PropertySchema {
                    schema_type: SchemaType::String,
                    description: String::new(),
                },
            ),
            (
                "alpha".to_string(),
                PropertySchema {
                    schema_type: SchemaType::Boolean,
                    description: String::new(),
                },
            ),
        ]);
        let text = serde_json::to_string(&props).unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
        assert!(text.contains("\"BOOLEAN\""));
    }

    #[test]
    fn test_response_text_and_calls() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Checking "},
                        {"text": "now."},
                        {"functionCall": {"name": "check_order_status", "args": {"order_id": "42"}}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
        }))
        .unwrap();

        assert_eq!(response.text(), "Checking now.");
        let calls = response.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args["order_id"], "42");
        assert_eq!(response.usage_metadata.unwrap().total_token_count, Some(17));
    }

    #[test]
    fn test_total_tokens_falls_back_without_overflow() {
        let reported = UsageMetadata {
            prompt_token_count: Some(3),
            candidates_token_count: Some(4),
            total_token_count: Some(9),
        };
        assert_eq!(reported.total_tokens(), 9);

        let summed = UsageMetadata {
            prompt_token_count: Some(u32::MAX),
            candidates_token_count: Some(u32::MAX),
            total_token_count: None,
        };
        assert_eq!(summed.total_tokens(), 2 * u64::from(u32::MAX));

        assert_eq!(UsageMetadata::default().total_tokens(), 0);
    }

    #[test]
    fn test_empty_response_has_empty_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
        assert!(response.function_calls().is_empty());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = GeminiProvider::new(
            "http://localhost:9/v1beta/",
            Arc::new(StaticCredential(None)),
        );
        assert_eq!(
            provider.endpoint("gemini-3-flash-preview"),
            "http://localhost:9/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let provider = GeminiProvider::new("http://127.0.0.1:1", Arc::new(StaticCredential(None)));
        let request = GenerateContentRequest {
            contents: vec![Content::text("user", "hi")],
            system_instruction: None,
            tools: None,
        };
        let err = provider
            .generate_content("gemini-3-flash-preview", &request)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Authentication(_)));
    }
}
