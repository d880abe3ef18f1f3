//! LLM provider seam
//!
//! The sandbox talks to a single hosted model family (Gemini) through the
//! [`LlmProvider`] trait. Credentials are looked up through a
//! [`CredentialProvider`] each time a request is made, so rotating a key in the
//! secrets store or the environment takes effect on the next turn.

mod gemini;

pub use gemini::*;

use async_trait::async_trait;

use crate::agents::error::LlmResult;

/// Source of the API key used for outbound model calls
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve the current API key, if one is configured
    async fn api_key(&self) -> Option<String>;
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Perform exactly one `generateContent` call for `model`
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> LlmResult<GenerateContentResponse>;
}

/// Fixed credential, mostly useful in tests and for one-off tooling
pub struct StaticCredential(pub Option<String>);

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}
