use thiserror::Error;

use morningbrief_pipeline::PipelineError;
use morningbrief_store::StoreError;

/// Failure to push a message through the delivery channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Send failed: {0}")]
    Send(String),
}

/// Errors surfaced to callers of the on-demand delivery path.
/// The scheduled path absorbs all of these into logs.
#[derive(Debug, Error)]
pub enum BriefingError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("No subscriber found for chat {chat_id}")]
    NotFound { chat_id: String },

    #[error("Chat {chat_id} has no categories selected")]
    NoCategories { chat_id: String },
}

pub type Result<T> = std::result::Result<T, BriefingError>;
