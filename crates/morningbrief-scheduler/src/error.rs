use thiserror::Error;

/// Errors that can occur within the scheduler subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// A live schedule already exists for this chat identity.
    /// Callers that may race an existing entry should use `replace`.
    #[error("Schedule already exists for chat {chat_id}")]
    DuplicateSchedule { chat_id: String },

    /// Hour/minute pair outside the 24h clock.
    #[error("Invalid delivery time: {hour:02}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
