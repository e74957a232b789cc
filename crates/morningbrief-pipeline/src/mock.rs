use async_trait::async_trait;

use crate::provider::{CompletionRequest, LlmProvider, ProviderError};

/// Deterministic offline provider, used when no API key is configured and
/// in tests. Selection prompts fall back to first-N (the reply is not a
/// JSON index array); summarization prompts get a canned sentence, so the
/// formatter still has text to work with.
pub struct MockProvider;

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, _req: &CompletionRequest) -> Result<String, ProviderError> {
        Ok("Summary unavailable — generated without an LLM provider.".to_string())
    }
}
