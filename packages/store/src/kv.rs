//! # Key-value storage: the seam every backend plugs into
//!
//! Everything the portfolio persists (the account list, the session marker) is a
//! JSON string under a well-known key. [`KeyValueStore`] is the async interface
//! over that: `get`/`set`/`remove` on string values. Implementations live in
//! sibling modules ([`crate::memory`], [`crate::file_store`], and the browser
//! `localStorage` backend behind the `web` feature).
//!
//! ## Read vs write errors
//!
//! Reads never fail: a missing key, an unreadable file, or a browser that refuses
//! storage access all come back as `None`, so the UI degrades to "no data".
//! Writes return a [`StoreError`], because dropping a freshly registered account
//! on the floor is not something the caller should learn about by accident.
//!
//! ## JSON helpers
//!
//! | Function | Behaviour |
//! |----------|-----------|
//! | [`load_json`] | Reads and deserialises a key. Absent or corrupt JSON yields `None`. |
//! | [`save_json`] | Serialises a value and writes it under a key. |

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors raised when writing to a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Async trait for string-valued key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Option<String>>;
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// Read `key` and deserialise it, treating corrupt data as absent.
pub async fn load_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let Some(raw) = store.get(key).await else {
        tracing::debug!(key, "storage miss");
        return None;
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unparsable stored value");
            None
        }
    }
}

/// Serialise `value` as JSON and write it under `key`.
pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
