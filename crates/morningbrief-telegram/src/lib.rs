//! `morningbrief-telegram` — Telegram delivery channel and the subscriber
//! command surface.
//!
//! This crate is the preference mutation entry point: every successful
//! store write in a handler is followed by the matching coordinator
//! notification, which is what keeps the schedule registry in sync.

pub mod adapter;
pub mod channel;
pub mod context;
pub mod handler;
pub mod keyboard;
pub mod send;

pub use adapter::TelegramAdapter;
pub use channel::TelegramChannel;
pub use context::TelegramAppContext;
