use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{Result, SchedulerError};
use crate::schedule::next_daily_run;
use crate::types::{DailyTime, TriggerCallback};

/// One live daily trigger.
struct Trigger {
    chat_id: String,
    time: DailyTime,
    next_run: DateTime<Utc>,
    callback: TriggerCallback,
}

/// Shared handle to the in-memory trigger set.
///
/// Cloning shares the underlying set, so the registry can add and cancel
/// triggers while the engine loop polls them. All operations are plain map
/// mutations under one lock — fast and non-suspending.
#[derive(Clone, Default)]
pub struct TriggerSet {
    inner: Arc<Mutex<HashMap<Uuid, Trigger>>>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recurring daily trigger. Never blocks. Returns the handle
    /// used to cancel it.
    pub fn add(&self, chat_id: &str, time: DailyTime, callback: TriggerCallback) -> Result<Uuid> {
        let next_run = next_daily_run(time, Utc::now()).ok_or(SchedulerError::InvalidTime {
            hour: time.hour(),
            minute: time.minute(),
        })?;
        let id = Uuid::new_v4();
        self.inner.lock().unwrap().insert(
            id,
            Trigger {
                chat_id: chat_id.to_string(),
                time,
                next_run,
                callback,
            },
        );
        Ok(id)
    }

    /// Cancel a trigger, removing all future occurrences. Idempotent:
    /// cancelling an unknown or already-cancelled handle returns false.
    pub fn cancel(&self, id: Uuid) -> bool {
        self.inner.lock().unwrap().remove(&id).is_some()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.inner.lock().unwrap().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// Collect every trigger due at `now` and advance each to its next daily
    /// occurrence. Rescheduling happens before the callbacks run, so a slow
    /// callback can never delay its own next firing, and nothing accumulates
    /// per fire.
    pub(crate) fn take_due(&self, now: DateTime<Utc>) -> Vec<(Uuid, String, TriggerCallback)> {
        let mut inner = self.inner.lock().unwrap();
        let mut due = Vec::new();
        let mut dead = Vec::new();

        for (id, trigger) in inner.iter_mut() {
            if trigger.next_run > now {
                continue;
            }
            match next_daily_run(trigger.time, now) {
                Some(next) => trigger.next_run = next,
                None => {
                    // Unreachable for a validated DailyTime; drop the
                    // trigger rather than fire it every second.
                    error!(trigger_id = %id, "could not reschedule trigger — removing");
                    dead.push(*id);
                }
            }
            due.push((*id, trigger.chat_id.clone(), Arc::clone(&trigger.callback)));
        }
        for id in dead {
            inner.remove(&id);
        }
        due
    }
}

/// Background loop that drives the trigger set at ±1 s precision.
///
/// Each firing runs on its own Tokio task: installing a trigger never
/// blocks, and one subscriber's slow delivery never delays another's
/// scheduled time. A failure (or panic) inside a callback dies with its
/// task and leaves both the loop and the trigger's future occurrences
/// intact — the last line of failure containment for a scheduled firing.
pub struct SchedulerEngine {
    triggers: TriggerSet,
}

impl SchedulerEngine {
    pub fn new(triggers: TriggerSet) -> Self {
        Self { triggers }
    }

    /// Main event loop. Polls every second until `shutdown` broadcasts `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("scheduler engine started");

        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick(Utc::now());
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("scheduler engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    fn tick(&self, now: DateTime<Utc>) {
        for (id, chat_id, callback) in self.triggers.take_due(now) {
            info!(trigger_id = %id, chat_id = %chat_id, "firing daily trigger");
            tokio::spawn((callback)(chat_id));
        }
    }
}
