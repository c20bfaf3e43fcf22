use std::cell::RefCell;
use std::collections::HashMap;

use web_sys::{window, Storage};

pub const FIRST_VISIT_KEY: &str = "hf_first_visit";
pub const VISIT_COUNT_KEY: &str = "hf_visit_count";
pub const LOCATION_GRANTED_KEY: &str = "hf_location_granted";
/// Session-scoped.
pub const IN_APP_BANNER_DISMISSED_KEY: &str = "hf_inapp_banner_dismissed";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// `localStorage` or `sessionStorage`. Storage errors (private mode, quota)
/// are ignored.
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn local() -> Option<Self> {
        window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
    }

    pub fn session() -> Option<Self> {
        window()
            .and_then(|w| w.session_storage().ok())
            .flatten()
            .map(|storage| Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let _ = self.storage.set_item(key, value);
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitRecord {
    pub visit_count: u32,
    pub is_returning: bool,
    /// Milliseconds since the epoch.
    pub first_visit: i64,
}

impl VisitRecord {
    /// Reads the counters once at load and writes the bumped values back.
    pub fn load_and_bump(store: &dyn KeyValueStore, now_millis: i64) -> Self {
        let previous: u32 = store
            .get(VISIT_COUNT_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let first_visit = match store.get(FIRST_VISIT_KEY).and_then(|v| v.parse().ok()) {
            Some(ts) => ts,
            None => {
                store.set(FIRST_VISIT_KEY, &now_millis.to_string());
                now_millis
            }
        };
        let visit_count = previous.saturating_add(1);
        store.set(VISIT_COUNT_KEY, &visit_count.to_string());

        Self {
            visit_count,
            is_returning: previous > 0,
            first_visit,
        }
    }
}

pub fn location_previously_granted(store: &dyn KeyValueStore) -> bool {
    store.get(LOCATION_GRANTED_KEY).as_deref() == Some("true")
}

pub fn remember_location_granted(store: &dyn KeyValueStore) {
    store.set(LOCATION_GRANTED_KEY, "true");
}
