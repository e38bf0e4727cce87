//! Persistence of buttons and call history.
//!
//! Records are stored as JSON text under fixed keys in any [`KeyValueStore`].
//! Reading tolerates corrupt content: the affected collection starts empty
//! and a warning is logged, so a damaged file never blocks startup.

mod backends;

pub use backends::{FileStore, MemoryStore};

use crate::Result;
use crate::model::{Button, Call};
use crate::store::{HISTORY_LIMIT, RecordStore};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const BUTTONS_KEY: &str = "api-buttons";
pub const CALLS_KEY: &str = "api-calls";
pub const DATA_VIEW_KEY: &str = "api-data-view";

/// String key-value storage backing the persisted collections
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Read a collection, falling back to empty on malformed JSON
pub fn load_records<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Result<Vec<T>> {
    let Some(text) = store.load(key)? else {
        tracing::debug!("No saved records for {}", key);
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<T>>(&text) {
        Ok(records) => {
            tracing::debug!("Loaded {} record(s) from {}", records.len(), key);
            Ok(records)
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable saved data for {}: {}", key, e);
            Ok(Vec::new())
        }
    }
}

/// Write a collection as JSON text
pub fn save_records<T: Serialize>(store: &mut impl KeyValueStore, key: &str, records: &[T]) -> Result<()> {
    let text = serde_json::to_string(records)?;
    store.save(key, &text)?;
    tracing::debug!("Saved {} record(s) to {}", records.len(), key);
    Ok(())
}

/// Load buttons and history into a record store
pub fn load_store(store: &impl KeyValueStore) -> Result<RecordStore> {
    let buttons: Vec<Button> = load_records(store, BUTTONS_KEY)?;
    let calls = consistent_calls(load_records(store, CALLS_KEY)?, CALLS_KEY);
    Ok(RecordStore::from_parts(buttons, calls))
}

/// Drop calls whose error and status disagree
fn consistent_calls(calls: Vec<Call>, key: &str) -> Vec<Call> {
    let total = calls.len();
    let kept: Vec<Call> = calls.into_iter().filter(Call::is_consistent).collect();
    if kept.len() < total {
        tracing::warn!(
            "Ignoring {} saved call(s) in {} with mismatched status and error",
            total - kept.len(),
            key
        );
    }
    kept
}

pub fn save_buttons(store: &mut impl KeyValueStore, records: &RecordStore) -> Result<()> {
    save_records(store, BUTTONS_KEY, records.buttons())
}

/// Write history, keeping only the most recent calls
pub fn save_calls(store: &mut impl KeyValueStore, records: &RecordStore) -> Result<()> {
    save_records(store, CALLS_KEY, records.persisted_calls())
}

pub fn load_data_view(store: &impl KeyValueStore) -> Result<Vec<Call>> {
    let calls = consistent_calls(load_records(store, DATA_VIEW_KEY)?, DATA_VIEW_KEY);
    Ok(calls.into_iter().filter(Call::has_data).collect())
}

pub fn save_data_view(store: &mut impl KeyValueStore, calls: &[Call]) -> Result<()> {
    save_records(store, DATA_VIEW_KEY, &calls[..calls.len().min(HISTORY_LIMIT)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallOrigin, HttpMethod};
    use crate::validate::ButtonDraft;
    use serde_json::json;

    fn button(name: &str) -> Button {
        ButtonDraft {
            name: name.to_string(),
            method: HttpMethod::Post,
            url: "https://example.com/posts".to_string(),
            headers: r#"{"Content-Type": "application/json", "X-Trace": "1"}"#.to_string(),
            body: r#"{"title": "hi"}"#.to_string(),
            description: "Creates a post".to_string(),
            ..ButtonDraft::default()
        }
        .validate()
        .unwrap()
    }

    fn call(button: &Button, status: u16) -> Call {
        let origin = CallOrigin {
            button_id: button.id.clone(),
            button_name: button.name.clone(),
            method: button.method,
            url: button.url.clone(),
        };
        if status == 0 {
            Call::failed(origin, "connection refused", 4)
        } else {
            Call::completed(origin, status, "OK", json!({"ok": true}), 25)
        }
    }

    #[test]
    fn test_buttons_round_trip() {
        let mut kv = MemoryStore::new();
        let mut records = RecordStore::new();
        records.add_button(button("one"));
        records.add_button(button("two"));

        save_buttons(&mut kv, &records).unwrap();
        let loaded = load_store(&kv).unwrap();

        assert_eq!(loaded.buttons(), records.buttons());
        assert_eq!(
            loaded.buttons()[0].created_at.timestamp_millis(),
            records.buttons()[0].created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_created_at_is_iso_8601_text() {
        let mut kv = MemoryStore::new();
        let mut records = RecordStore::new();
        records.add_button(button("one"));
        save_buttons(&mut kv, &records).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&kv.load(BUTTONS_KEY).unwrap().unwrap()).unwrap();
        let created = raw[0]["createdAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    }

    #[test]
    fn test_calls_round_trip_including_failures() {
        let mut kv = MemoryStore::new();
        let b = button("b");
        let mut records = RecordStore::new();
        records.add_call(call(&b, 200));
        records.add_call(call(&b, 0));

        save_calls(&mut kv, &records).unwrap();
        let loaded = load_store(&kv).unwrap();

        assert_eq!(loaded.calls(), records.calls());
        let failed = &loaded.calls()[0];
        assert_eq!(failed.status, 0);
        assert!(failed.response.is_none());
        assert!(failed.error.is_some());
    }

    #[test]
    fn test_history_is_capped_when_saved() {
        let mut kv = MemoryStore::new();
        let b = button("b");
        let mut records = RecordStore::new();
        for _ in 0..75 {
            records.add_call(call(&b, 200));
        }

        save_calls(&mut kv, &records).unwrap();
        let loaded = load_store(&kv).unwrap();

        assert_eq!(loaded.calls().len(), HISTORY_LIMIT);
        assert_eq!(loaded.calls()[0].id, records.calls()[0].id);
        assert_eq!(loaded.calls()[49].id, records.calls()[49].id);
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let mut kv = MemoryStore::new();
        kv.save(BUTTONS_KEY, "{not json").unwrap();
        kv.save(CALLS_KEY, r#"[{"id": 1}]"#).unwrap();

        let loaded = load_store(&kv).unwrap();
        assert!(loaded.buttons().is_empty());
        assert!(loaded.calls().is_empty());
    }

    #[test]
    fn test_invalid_utf8_file_loads_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut bytes = br#"[{"id":"btn_1","name":"Caf"#.to_vec();
        bytes.push(0xC3);
        std::fs::write(temp_dir.path().join("api-buttons.json"), bytes).unwrap();

        let loaded = load_store(&FileStore::new(temp_dir.path())).unwrap();
        assert!(loaded.buttons().is_empty());
    }

    #[test]
    fn test_calls_with_mismatched_status_are_dropped() {
        let mut kv = MemoryStore::new();
        let b = button("b");
        let mut records = RecordStore::new();
        records.add_call(call(&b, 200));
        save_calls(&mut kv, &records).unwrap();

        let mut raw: serde_json::Value =
            serde_json::from_str(&kv.load(CALLS_KEY).unwrap().unwrap()).unwrap();
        let mut no_error = raw[0].clone();
        no_error["id"] = json!("call_no_error");
        no_error["status"] = json!(0);
        let mut stray_error = raw[0].clone();
        stray_error["id"] = json!("call_stray_error");
        stray_error["error"] = json!("boom");
        raw.as_array_mut().unwrap().extend([no_error, stray_error]);
        kv.save(CALLS_KEY, &raw.to_string()).unwrap();

        let loaded = load_store(&kv).unwrap();
        assert_eq!(loaded.calls().len(), 1);
        assert_eq!(loaded.calls()[0].id, records.calls()[0].id);
    }

    #[test]
    fn test_missing_keys_load_empty() {
        let kv = MemoryStore::new();
        let loaded = load_store(&kv).unwrap();
        assert!(loaded.buttons().is_empty());
        assert!(load_data_view(&kv).unwrap().is_empty());
    }
}
