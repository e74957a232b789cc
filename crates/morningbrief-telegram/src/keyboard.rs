//! Inline keyboards for category and delivery-time selection.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Delivery times offered in the picker (UTC).
pub const DELIVERY_TIMES: [&str; 8] = [
    "06:00", "07:00", "08:00", "09:00", "10:00", "12:00", "18:00", "20:00",
];

/// Category toggle grid, two buttons per row, check-mark on selected.
pub fn categories_keyboard(available: &[String], selected: &[String]) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = available
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|category| {
                    let emoji = if selected.contains(category) {
                        "✅"
                    } else {
                        "📰"
                    };
                    InlineKeyboardButton::callback(
                        format!("{emoji} {}", title_case(category)),
                        format!("cat_{category}"),
                    )
                })
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// Delivery time grid, two buttons per row.
pub fn times_keyboard() -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = DELIVERY_TIMES
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|time| {
                    InlineKeyboardButton::callback(format!("⏰ {time}"), format!("time_{time}"))
                })
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

pub fn settings_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "📰 Change Categories",
            "set_categories",
        )],
        vec![InlineKeyboardButton::callback(
            "⏰ Set Daily Time",
            "set_time",
        )],
        vec![InlineKeyboardButton::callback(
            "❌ Stop Briefings",
            "set_stop",
        )],
    ])
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
