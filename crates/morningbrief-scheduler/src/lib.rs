//! `morningbrief-scheduler` — Tokio-based daily trigger engine and the
//! per-subscriber schedule registry.
//!
//! # Overview
//!
//! The [`engine::SchedulerEngine`] polls an in-memory trigger set every
//! second and fires any trigger whose next run time has arrived, spawning
//! the callback on its own task and rescheduling the trigger for the next
//! day. The [`registry::ScheduleRegistry`] owns the `chat_id` → trigger
//! mapping and guarantees at most one live trigger per subscriber.
//!
//! Triggers are transient: nothing here is persisted. The registry is
//! rebuilt from the preference store at startup.
//!
//! All trigger times are wall-clock HH:MM in UTC, the process-wide
//! reference timezone.

pub mod engine;
pub mod error;
pub mod registry;
pub mod schedule;
pub mod types;

pub use engine::{SchedulerEngine, TriggerSet};
pub use error::{Result, SchedulerError};
pub use registry::ScheduleRegistry;
pub use types::{DailyTime, ScheduleEntry, TriggerCallback};
