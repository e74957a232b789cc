//! `morningbrief-briefing` — the coordinator that keeps the schedule
//! registry consistent with the preference store and runs the
//! fetch → format → deliver sequence, on schedule and on demand.

pub mod channel;
pub mod coordinator;
pub mod error;
pub mod format;
pub mod greeting;

pub use channel::DeliveryChannel;
pub use coordinator::Coordinator;
pub use error::{BriefingError, ChannelError, Result};
