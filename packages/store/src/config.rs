//! # Application configuration: `folio.toml`
//!
//! Defines the TOML configuration that tunes the credential store and the project
//! catalogue (filename: [`FolioConfig::filename`] = `"folio.toml"`).
//!
//! ## Structure
//!
//! ```toml
//! [auth]
//! iterations = 150000        # PBKDF2 rounds for newly derived verifiers
//! min_password_len = 6
//!
//! [storage]
//! users_key = "users"
//! session_key = "currentUser"
//!
//! [projects]
//! url = "/projects.json"
//! cache_bust = true
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`FolioConfig`] | Top-level config. Builder helpers (`with_iterations`, `with_projects_url`), TOML (de)serialisation, and the canonical filename. |
//! | [`AuthConfig`] | PBKDF2 round count and the minimum password length. |
//! | [`StorageConfig`] | The storage keys holding the account list and the session marker. |
//! | [`ProjectsConfig`] | Where the project catalogue lives and whether requests are cache-busted. |
//!
//! Every section defaults field by field, so a missing or partial file is the
//! production configuration. `auth.iterations` must lie in
//! `1..=`[`MAX_PBKDF2_ITERATIONS`]; [`FolioConfig::from_toml`] rejects anything
//! else and [`FolioConfig::with_iterations`] clamps into that range.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{DEFAULT_PBKDF2_ITERATIONS, MAX_PBKDF2_ITERATIONS};

/// Top-level configuration stored in `folio.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub projects: ProjectsConfig,
}

/// Credential settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// PBKDF2-HMAC-SHA256 rounds used for new verifiers.
    #[serde(default = "default_iterations", deserialize_with = "bounded_iterations")]
    pub iterations: u32,
    /// Minimum accepted password length, in characters.
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,
}

fn default_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

fn bounded_iterations<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let iterations = u32::deserialize(deserializer)?;
    if iterations == 0 || iterations > MAX_PBKDF2_ITERATIONS {
        return Err(serde::de::Error::custom(format!(
            "iterations must be between 1 and {MAX_PBKDF2_ITERATIONS}, got {iterations}"
        )));
    }
    Ok(iterations)
}

fn default_min_password_len() -> usize {
    6
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            min_password_len: default_min_password_len(),
        }
    }
}

/// Storage key names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_users_key")]
    pub users_key: String,
    #[serde(default = "default_session_key")]
    pub session_key: String,
}

fn default_users_key() -> String {
    "users".to_string()
}

fn default_session_key() -> String {
    "currentUser".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_key: default_users_key(),
            session_key: default_session_key(),
        }
    }
}

/// Project catalogue location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectsConfig {
    #[serde(default = "default_projects_url")]
    pub url: String,
    /// Append a `_=<n>` query parameter to every request.
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
}

fn default_projects_url() -> String {
    "/projects.json".to_string()
}

fn default_cache_bust() -> bool {
    true
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            url: default_projects_url(),
            cache_bust: default_cache_bust(),
        }
    }
}

impl FolioConfig {
    /// Builder method to set the PBKDF2 round count, clamped to `1..=MAX_PBKDF2_ITERATIONS`.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.auth.iterations = iterations.clamp(1, MAX_PBKDF2_ITERATIONS);
        self
    }

    /// Builder method to set the project catalogue URL.
    pub fn with_projects_url(mut self, url: impl Into<String>) -> Self {
        self.projects.url = url.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "folio.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
