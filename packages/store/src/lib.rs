pub mod config;
pub mod kv;
pub mod models;

mod memory;
pub use memory::MemoryStore;

mod file_store;
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageStore;

pub use config::FolioConfig;
pub use kv::{load_json, save_json, KeyValueStore, StoreError};
pub use models::{decode_users, Credential, Gender, Project, PublicUser, StoredUser};
