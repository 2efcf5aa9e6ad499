//! # Filesystem-backed key-value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each key as
//! its own file. It is used on native platforms to keep accounts and the session
//! marker across restarts, standing in for the browser's `localStorage`.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── users          # JSON array of stored users
//! └── currentUser    # JSON session marker (absent when logged out)
//! ```
//!
//! Keys are file names, so they are restricted to ASCII letters, digits, `_`,
//! `-` and `.` (and may not start with `.`). Anything else is rejected with
//! [`StoreError::InvalidKey`] on write and reads as absent.

use std::path::PathBuf;

use crate::kv::{KeyValueStore, StoreError};

/// Filesystem-backed KeyValueStore for native persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn key_path(&self, key: &str) -> Option<PathBuf> {
        is_valid_key(key).then(|| self.base.join(key))
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)?).ok()
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self
            .key_path(key)
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        std::fs::create_dir_all(&self.base)?;

        // Readers only ever see a complete document.
        let tmp = self.base.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self
            .key_path(key)
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
