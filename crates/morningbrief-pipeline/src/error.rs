use thiserror::Error;

use crate::provider::ProviderError;

/// Errors surfaced by the content pipeline. All of them are transient from
/// the coordinator's point of view: the next firing retries naturally.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The news source could not be reached or returned a bad response.
    #[error("News fetch failed: {0}")]
    Fetch(String),

    /// The LLM provider failed outright (selection and summarization fall
    /// back before this is raised).
    #[error("LLM provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Zero articles matched any requested category. Reported, not fatal.
    #[error("No articles matched the requested categories")]
    NoArticles,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
