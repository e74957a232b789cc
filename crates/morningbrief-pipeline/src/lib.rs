//! `morningbrief-pipeline` — the content pipeline: fetch headlines per
//! category, pick the top stories with an LLM, summarize them.
//!
//! The rest of the system consumes this crate through a single seam, the
//! [`ContentPipeline`] trait, so deliveries can be tested against a fake
//! pipeline without any network access.

pub mod briefing;
pub mod error;
pub mod mock;
pub mod news;
pub mod openai;
pub mod provider;
pub mod types;

pub use briefing::{ContentPipeline, NewsBriefingPipeline};
pub use error::{PipelineError, Result};
pub use news::NewsClient;
pub use provider::{CompletionRequest, LlmProvider, ProviderError};
pub use types::{BriefingArticle, BriefingResult, RawArticle};
