use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;
use uuid::Uuid;

use crate::error::SchedulerError;

/// Async callback invoked with the subscriber's chat identity at each firing.
///
/// Callbacks capture only the immutable `chat_id`; any mutable state (the
/// current preference record) is re-fetched inside the callback at fire time.
pub type TriggerCallback = Arc<dyn Fn(String) -> BoxFuture<'static, ()> + Send + Sync>;

/// A validated wall-clock HH:MM pair in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTime {
    hour: u8,
    minute: u8,
}

impl DailyTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, SchedulerError> {
        if hour > 23 || minute > 59 {
            return Err(SchedulerError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl std::fmt::Display for DailyTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for DailyTime {
    type Err = SchedulerError;

    /// Parse "HH:MM".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = SchedulerError::InvalidTime { hour: 0, minute: 0 };
        let (h, m) = s.split_once(':').ok_or(invalid)?;
        let hour: u8 = h
            .parse()
            .map_err(|_| SchedulerError::InvalidTime { hour: 0, minute: 0 })?;
        let minute: u8 = m
            .parse()
            .map_err(|_| SchedulerError::InvalidTime { hour: 0, minute: 0 })?;
        DailyTime::new(hour, minute)
    }
}

/// A live registry entry: one recurring trigger for one subscriber.
/// Transient — rebuilt from the preference store on restart.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub chat_id: String,
    /// Handle to the underlying trigger, owned exclusively by the registry.
    pub trigger_id: Uuid,
    /// The time the trigger was installed with. Used to detect whether an
    /// update actually changes the firing time or is a no-op.
    pub time: DailyTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_time_validates_range() {
        assert!(DailyTime::new(23, 59).is_ok());
        assert!(DailyTime::new(24, 0).is_err());
        assert!(DailyTime::new(0, 60).is_err());
    }

    #[test]
    fn daily_time_displays_zero_padded() {
        let t = DailyTime::new(7, 5).unwrap();
        assert_eq!(t.to_string(), "07:05");
    }

    #[test]
    fn daily_time_parses() {
        let t: DailyTime = "06:30".parse().unwrap();
        assert_eq!(t.hour(), 6);
        assert_eq!(t.minute(), 30);
        assert!("25:00".parse::<DailyTime>().is_err());
        assert!("noon".parse::<DailyTime>().is_err());
    }
}
