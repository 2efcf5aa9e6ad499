//! # Browser `localStorage` store: web persistence
//!
//! [`LocalStorageStore`] is the [`KeyValueStore`] implementation used on the
//! **web platform**. It reads and writes `window.localStorage` through `web-sys`,
//! which is where the earlier JavaScript build of the portfolio kept its
//! `users` and `currentUser` entries, so existing browsers keep their accounts.
//!
//! ## Namespacing
//!
//! An optional prefix is prepended to every key (`"<prefix>:<key>"`) so several
//! apps on the same origin do not trample each other. The unprefixed store reads
//! the legacy keys directly.
//!
//! ## Error handling
//!
//! `localStorage` can be missing (privacy modes, sandboxed iframes) or full. Reads
//! swallow both into `None`; writes report [`StoreError::Unavailable`] carrying the
//! browser's message.

use wasm_bindgen::JsValue;

use crate::kv::{KeyValueStore, StoreError};

/// `window.localStorage`-backed KeyValueStore for the web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageStore {
    prefix: Option<String>,
}

impl LocalStorageStore {
    /// Store that uses keys as-is.
    pub fn new() -> Self {
        Self::with_prefix(None)
    }

    /// Store whose keys are scoped under `prefix`.
    pub fn with_prefix(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
        }
    }

    fn scoped(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Unavailable(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

impl KeyValueStore for LocalStorageStore {
    async fn get(&self, key: &str) -> Option<String> {
        let storage = Self::storage().ok()?;
        storage.get_item(&self.scoped(key)).ok()?
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&self.scoped(key), value)
            .map_err(js_error)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(&self.scoped(key))
            .map_err(js_error)
    }
}
