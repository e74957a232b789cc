use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tracing::{info, warn};

use crate::db::{init_db, row_to_preference, PREF_SELECT_SQL};
use crate::error::{Result, StoreError};
use crate::types::{PreferenceInput, UserPreference};

/// Handle to the subscriber preference table.
///
/// Read-after-write consistent: every operation runs against the same
/// connection under one lock. Cloning shares the connection.
#[derive(Clone)]
pub struct PreferenceStore {
    conn: Arc<Mutex<Connection>>,
    max_categories: usize,
}

impl PreferenceStore {
    pub fn new(conn: Connection, max_categories: usize) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            max_categories,
        })
    }

    pub fn max_categories(&self) -> usize {
        self.max_categories
    }

    /// Look up one subscriber by chat identity.
    pub fn get(&self, chat_id: &str) -> Result<Option<UserPreference>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("{PREF_SELECT_SQL} WHERE chat_id = ?1");
        let pref = conn
            .query_row(&sql, [chat_id], row_to_preference)
            .optional()?;
        Ok(pref)
    }

    /// All subscribers with `active = true`, ordered by creation time.
    ///
    /// A malformed row is skipped with a logged warning rather than failing
    /// the whole scan — one bad record must not block startup sync.
    pub fn list_active(&self) -> Result<Vec<UserPreference>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("{PREF_SELECT_SQL} WHERE active = 1 ORDER BY created_at");
        let mut stmt = conn.prepare(&sql)?;
        let prefs = stmt
            .query_map([], row_to_preference)?
            .filter_map(|r| match r {
                Ok(pref) => Some(pref),
                Err(e) => {
                    warn!("skipping malformed preference row: {e}");
                    None
                }
            })
            .collect();
        Ok(prefs)
    }

    /// Insert or update one subscriber record.
    ///
    /// Validates field constraints, preserves `created_at` on update and
    /// refreshes `updated_at`. Returns the stored record.
    pub fn upsert(&self, input: PreferenceInput) -> Result<UserPreference> {
        validate(&input, self.max_categories)?;

        let now = Utc::now().to_rfc3339();
        let categories_json = serde_json::to_string(&input.categories)
            .map_err(|e| StoreError::InvalidPreference(e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_preferences
             (chat_id, display_name, categories, delivery_hour, delivery_minute,
              active, created_at, updated_at)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?7)
             ON CONFLICT(chat_id) DO UPDATE SET
                display_name=?2, categories=?3, delivery_hour=?4,
                delivery_minute=?5, active=?6, updated_at=?7",
            rusqlite::params![
                input.chat_id,
                input.display_name,
                categories_json,
                input.delivery_hour as u32,
                input.delivery_minute as u32,
                input.active as i32,
                now,
            ],
        )?;

        let sql = format!("{PREF_SELECT_SQL} WHERE chat_id = ?1");
        let pref = conn.query_row(&sql, [&input.chat_id], row_to_preference)?;
        info!(chat_id = %pref.chat_id, active = pref.active, "preference upserted");
        Ok(pref)
    }

    /// Remove one subscriber record. `NotFound` if no row was deleted.
    pub fn delete(&self, chat_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn.execute("DELETE FROM user_preferences WHERE chat_id = ?1", [chat_id])?;
        if n == 0 {
            return Err(StoreError::NotFound {
                chat_id: chat_id.to_string(),
            });
        }
        info!(chat_id, "preference deleted");
        Ok(())
    }

    /// Cheap liveness probe for the health endpoint.
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

fn validate(input: &PreferenceInput, max_categories: usize) -> Result<()> {
    if input.chat_id.is_empty() {
        return Err(StoreError::InvalidPreference("empty chat_id".into()));
    }
    if input.delivery_hour > 23 {
        return Err(StoreError::InvalidPreference(format!(
            "delivery_hour out of range: {}",
            input.delivery_hour
        )));
    }
    if input.delivery_minute > 59 {
        return Err(StoreError::InvalidPreference(format!(
            "delivery_minute out of range: {}",
            input.delivery_minute
        )));
    }
    if input.active && input.categories.is_empty() {
        return Err(StoreError::InvalidPreference(
            "active subscriber must have at least one category".into(),
        ));
    }
    if input.categories.len() > max_categories {
        return Err(StoreError::InvalidPreference(format!(
            "too many categories: {} (max {})",
            input.categories.len(),
            max_categories
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PreferenceStore {
        PreferenceStore::new(Connection::open_in_memory().unwrap(), 10).unwrap()
    }

    fn input(chat_id: &str) -> PreferenceInput {
        PreferenceInput {
            chat_id: chat_id.to_string(),
            display_name: Some("Alice".to_string()),
            categories: vec!["tech".to_string()],
            delivery_hour: 7,
            delivery_minute: 0,
            active: true,
        }
    }

    #[test]
    fn upsert_then_get_roundtrips() {
        let store = store();
        let saved = store.upsert(input("u1")).unwrap();
        assert_eq!(saved.chat_id, "u1");
        assert!(saved.active);

        let loaded = store.get("u1").unwrap().unwrap();
        assert_eq!(loaded.categories, vec!["tech"]);
        assert_eq!(loaded.delivery_hour, 7);
        assert_eq!(loaded.created_at, saved.created_at);
    }

    #[test]
    fn get_unknown_returns_none() {
        assert!(store().get("nobody").unwrap().is_none());
    }

    #[test]
    fn update_preserves_created_at() {
        let store = store();
        let first = store.upsert(input("u1")).unwrap();

        let mut second = input("u1");
        second.delivery_hour = 8;
        let updated = store.upsert(second).unwrap();

        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(updated.delivery_hour, 8);
    }

    #[test]
    fn list_active_skips_inactive() {
        let store = store();
        store.upsert(input("u1")).unwrap();
        let mut off = input("u2");
        off.active = false;
        off.categories.clear();
        store.upsert(off).unwrap();

        let active = store.list_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].chat_id, "u1");
    }

    #[test]
    fn active_requires_categories() {
        let store = store();
        let mut bad = input("u1");
        bad.categories.clear();
        assert!(matches!(
            store.upsert(bad),
            Err(StoreError::InvalidPreference(_))
        ));
    }

    #[test]
    fn hour_out_of_range_rejected() {
        let store = store();
        let mut bad = input("u1");
        bad.delivery_hour = 24;
        assert!(store.upsert(bad).is_err());
    }

    #[test]
    fn too_many_categories_rejected() {
        let store = store();
        let mut bad = input("u1");
        bad.categories = (0..11).map(|i| format!("cat{i}")).collect();
        assert!(store.upsert(bad).is_err());
    }

    #[test]
    fn delete_then_get_is_none() {
        let store = store();
        store.upsert(input("u1")).unwrap();
        store.delete("u1").unwrap();
        assert!(store.get("u1").unwrap().is_none());
        assert!(matches!(
            store.delete("u1"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
