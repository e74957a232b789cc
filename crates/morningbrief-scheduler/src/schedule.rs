use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::types::DailyTime;

/// Compute the next UTC execution time for a daily trigger starting *after*
/// `from`: today's HH:MM if it is still ahead, otherwise tomorrow's.
///
/// Returns `None` only if the candidate instant cannot be represented,
/// which cannot happen for a validated [`DailyTime`] in UTC.
pub fn next_daily_run(time: DailyTime, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let candidate = Utc
        .with_ymd_and_hms(
            from.year(),
            from.month(),
            from.day(),
            time.hour() as u32,
            time.minute() as u32,
            0,
        )
        .single()?;
    if candidate > from {
        Some(candidate)
    } else {
        // Today's window has passed — advance to tomorrow.
        Some(candidate + Duration::days(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn fires_later_today_when_still_ahead() {
        let next = next_daily_run(DailyTime::new(8, 0).unwrap(), at(6, 30)).unwrap();
        assert_eq!(next.day(), 10);
        assert_eq!(next.hour(), 8);
        assert_eq!(next.minute(), 0);
    }

    #[test]
    fn rolls_to_tomorrow_when_passed() {
        let next = next_daily_run(DailyTime::new(8, 0).unwrap(), at(9, 0)).unwrap();
        assert_eq!(next.day(), 11);
        assert_eq!(next.hour(), 8);
    }

    #[test]
    fn exact_match_rolls_to_tomorrow() {
        // A trigger fired at exactly HH:MM must not fire again today.
        let next = next_daily_run(DailyTime::new(8, 0).unwrap(), at(8, 0)).unwrap();
        assert_eq!(next.day(), 11);
    }

    #[test]
    fn crosses_month_boundary() {
        let from = Utc.with_ymd_and_hms(2025, 1, 31, 23, 0, 0).unwrap();
        let next = next_daily_run(DailyTime::new(6, 0).unwrap(), from).unwrap();
        assert_eq!(next.month(), 2);
        assert_eq!(next.day(), 1);
    }
}
