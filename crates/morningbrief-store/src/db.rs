use rusqlite::Connection;

use crate::types::UserPreference;

/// Map a SELECT row (column order from PREF_SELECT_SQL) to a UserPreference.
/// Centralised here so every query in this crate stays consistent.
pub(crate) fn row_to_preference(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserPreference> {
    let categories: Vec<String> =
        serde_json::from_str(&row.get::<_, String>(2)?).unwrap_or_default();
    Ok(UserPreference {
        chat_id: row.get(0)?,
        display_name: row.get(1)?,
        categories,
        delivery_hour: row.get::<_, u32>(3)? as u8,
        delivery_minute: row.get::<_, u32>(4)? as u8,
        active: row.get::<_, i32>(5)? != 0,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(crate) const PREF_SELECT_SQL: &str = "SELECT chat_id, display_name, categories, \
     delivery_hour, delivery_minute, active, created_at, updated_at \
     FROM user_preferences";

/// Initialise the preferences schema in `conn`. Safe to call on every
/// startup — CREATE IF NOT EXISTS makes it idempotent.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS user_preferences (
            chat_id         TEXT    NOT NULL PRIMARY KEY,
            display_name    TEXT,
            categories      TEXT    NOT NULL DEFAULT '[]',  -- JSON array
            delivery_hour   INTEGER NOT NULL DEFAULT 7,
            delivery_minute INTEGER NOT NULL DEFAULT 0,
            active          INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT    NOT NULL,
            updated_at      TEXT    NOT NULL
        );

        -- sync_all() only ever scans active subscribers.
        CREATE INDEX IF NOT EXISTS idx_preferences_active
            ON user_preferences (active);",
    )
}
