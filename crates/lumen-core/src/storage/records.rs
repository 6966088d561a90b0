//! Typed access to the record slots
//!
//! Reads never fail: an absent, unreadable or malformed record is treated as
//! missing and the caller falls back to defaults. Records that only carry a
//! subset of the current fields are filled in from `Default`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::error::{StorageError, StorageResult};
use super::kv::KeyValueStore;

/// Slot holding `ReadingStats`
pub const STATS_KEY: &str = "lumen_reading_stats";

/// Slot holding `AppSettings`
pub const SETTINGS_KEY: &str = "lumen_settings";

/// Slot holding the running `InProgressSession`, absent when idle
pub const CURRENT_SESSION_KEY: &str = "lumen_current_session";

/// Read a slot as raw JSON
pub fn read_json<S>(store: &S, key: &str) -> Option<serde_json::Value>
where
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read record '{}': {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(serde_json::Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed record '{}': {}", key, e);
            None
        }
    }
}

/// Read a slot into `T`, `None` if it is absent or does not fit
pub fn load_optional<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let value = read_json(store, key)?;
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Ignoring record '{}' with unexpected shape: {}", key, e);
            None
        }
    }
}

/// Read a slot into `T`, falling back to `T::default()`
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    load_optional(store, key).unwrap_or_default()
}

/// Serialize `value` into a slot
pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppSettings, InProgressSession, ReadingStats};
    use crate::storage::MemoryStore;

    #[test]
    fn test_absent_slot_uses_defaults() {
        let store = MemoryStore::new();
        let settings: AppSettings = load_or_default(&store, SETTINGS_KEY);
        assert_eq!(settings, AppSettings::default());

        let current: Option<InProgressSession> = load_optional(&store, CURRENT_SESSION_KEY);
        assert!(current.is_none());
    }

    #[test]
    fn test_malformed_slot_uses_defaults() {
        let mut store = MemoryStore::new();
        store.set(STATS_KEY, "{not json").unwrap();

        let stats: ReadingStats = load_or_default(&store, STATS_KEY);
        assert_eq!(stats, ReadingStats::default());
    }

    #[test]
    fn test_wrong_shape_uses_defaults() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, r#"{"dailyGoal": "lots"}"#).unwrap();
        let settings: AppSettings = load_or_default(&store, SETTINGS_KEY);
        assert_eq!(settings, AppSettings::default());

        store.set(CURRENT_SESSION_KEY, "null").unwrap();
        let current: Option<InProgressSession> = load_optional(&store, CURRENT_SESSION_KEY);
        assert!(current.is_none());
    }

    #[test]
    fn test_partial_record_merges_over_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"dailyGoal": 30, "legacyTheme": "dark"}"#)
            .unwrap();

        let settings: AppSettings = load_or_default(&store, SETTINGS_KEY);
        assert_eq!(settings.daily_goal, 30);
        assert_eq!(settings.streak_threshold, 10);
        assert_eq!(settings.notification_time, "19:00");
    }

    #[test]
    fn test_write_then_read() {
        let mut store = MemoryStore::new();
        let mut settings = AppSettings::default();
        settings.daily_goal = 42;

        write_json(&mut store, SETTINGS_KEY, &settings).unwrap();
        let loaded: AppSettings = load_or_default(&store, SETTINGS_KEY);
        assert_eq!(loaded, settings);

        let raw = read_json(&store, SETTINGS_KEY).unwrap();
        assert_eq!(raw["dailyGoal"], 42);
    }
}
