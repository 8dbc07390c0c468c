use serde::de::DeserializeOwned;
use web_sys::{window, Storage};

use crate::services::session::SessionStore;

pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

pub fn load_from_storage<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = get_local_storage()?;
    let json = storage.get_item(key).ok()??;
    serde_json::from_str(&json).ok()
}

pub fn remove_from_storage(key: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Session store backed by the browser's localStorage.
///
/// All failures degrade to "slot absent" / no-op: storage being unavailable
/// (private browsing, disabled cookies) must never take the app down.
#[derive(Clone, Default)]
pub struct LocalSessionStore;

impl SessionStore for LocalSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        get_local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = get_local_storage() {
            if storage.set_item(key, value).is_err() {
                log::error!("❌ [STORAGE] Failed to persist '{}'", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        remove_from_storage(key);
    }
}
