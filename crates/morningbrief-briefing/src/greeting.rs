//! Time-of-day greeting policy.
//!
//! Buckets over the hour in the reference timezone:
//! morning `[5,12)`, afternoon `[12,18)`, evening `[18,5)` (wrapping past
//! midnight).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

pub fn day_part(hour: u32) -> DayPart {
    match hour {
        5..=11 => DayPart::Morning,
        12..=17 => DayPart::Afternoon,
        _ => DayPart::Evening,
    }
}

/// Build the greeting line for a briefing, splicing in the subscriber's
/// display name when one is set.
pub fn greeting(hour: u32, display_name: Option<&str>) -> String {
    let salutation = match day_part(hour) {
        DayPart::Morning => "Good morning",
        DayPart::Afternoon => "Good afternoon",
        DayPart::Evening => "Good evening",
    };
    match display_name {
        Some(name) => {
            format!("{salutation}, {name}! Here's your personalized news briefing for today.")
        }
        None => format!("{salutation}! Here's your news briefing for today."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_6_is_morning() {
        assert_eq!(day_part(6), DayPart::Morning);
        assert!(greeting(6, None).starts_with("Good morning"));
    }

    #[test]
    fn hour_14_is_afternoon() {
        assert_eq!(day_part(14), DayPart::Afternoon);
        assert!(greeting(14, None).starts_with("Good afternoon"));
    }

    #[test]
    fn hour_20_is_evening() {
        assert_eq!(day_part(20), DayPart::Evening);
        assert!(greeting(20, None).starts_with("Good evening"));
    }

    #[test]
    fn hour_3_wraps_to_evening() {
        assert_eq!(day_part(3), DayPart::Evening);
        assert!(greeting(3, None).starts_with("Good evening"));
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(day_part(4), DayPart::Evening);
        assert_eq!(day_part(5), DayPart::Morning);
        assert_eq!(day_part(11), DayPart::Morning);
        assert_eq!(day_part(12), DayPart::Afternoon);
        assert_eq!(day_part(17), DayPart::Afternoon);
        assert_eq!(day_part(18), DayPart::Evening);
    }

    #[test]
    fn display_name_is_spliced_in() {
        let text = greeting(8, Some("Alice"));
        assert!(text.contains("Good morning, Alice!"));
    }

    #[test]
    fn neutral_salutation_without_name() {
        let text = greeting(8, None);
        assert!(text.starts_with("Good morning!"));
        assert!(!text.contains(','));
    }
}
