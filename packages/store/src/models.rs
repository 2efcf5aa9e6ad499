//! # Domain models for accounts, sessions and projects
//!
//! Defines the records the portfolio keeps in key-value storage and the project
//! entries it reads from the static catalogue. All types are
//! `Serialize + Deserialize` with the camelCase field names the earlier web build
//! wrote, so existing browser data keeps loading.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`Gender`] | The enumerated gender captured at registration (`male`, `female`, `other`). |
//! | [`PublicUser`] | The secret-free projection of an account. Used as the session marker and returned to the UI. |
//! | [`Credential`] | How an account proves its password: a PBKDF2 verifier, or a legacy plaintext password awaiting migration. Tagged by a `scheme` field. |
//! | [`StoredUser`] | A full persisted account: public fields plus its [`Credential`]. |
//! | [`Project`] | One entry of the read-only project catalogue. |
//!
//! ## Decoding the user collection
//!
//! [`decode_users`] is the only place that looks at raw user JSON. Records carrying
//! a `scheme` discriminant are decoded directly. Records written before the
//! discriminant existed are classified once by which fields they carry:
//! `passwordHash` + `salt` → [`Credential::Pbkdf2`], `password` →
//! [`Credential::Plaintext`]. Records matching neither shape, or with an unknown
//! gender, are dropped. Past this point everything matches on the enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// PBKDF2 rounds assumed for hashed records that predate the `iterations` field.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 150_000;

/// Upper bound on the round count accepted from config or stored records.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Gender captured at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown gender string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender: {0:?}")]
pub struct ParseGenderError(pub String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(ParseGenderError(other.to_string())),
        }
    }
}

/// User information safe to expose to the UI and to the session marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub username: String,
    pub email: String,
    pub gender: Gender,
}

impl PublicUser {
    /// Whether the record has the fields a session marker needs.
    pub fn is_well_formed(&self) -> bool {
        !self.username.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Password material for a stored account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme")]
pub enum Credential {
    /// PBKDF2-HMAC-SHA256 verifier; hash and salt are standard base64.
    #[serde(rename = "pbkdf2-sha256")]
    Pbkdf2 {
        #[serde(rename = "passwordHash")]
        password_hash: String,
        salt: String,
        #[serde(default = "default_iterations")]
        iterations: u32,
    },
    /// Legacy record holding the password itself.
    #[serde(rename = "plaintext")]
    Plaintext { password: String },
}

fn default_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

impl Credential {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Credential::Plaintext { .. })
    }
}

// Never print password material.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Pbkdf2 { iterations, .. } => f
                .debug_struct("Pbkdf2")
                .field("iterations", iterations)
                .finish_non_exhaustive(),
            Credential::Plaintext { .. } => f.debug_struct("Plaintext").finish_non_exhaustive(),
        }
    }
}

/// Full account record as persisted under the users key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    pub email: String,
    pub gender: Gender,
    #[serde(flatten)]
    pub credential: Credential,
}

impl StoredUser {
    /// Convert to PublicUser for session and UI consumption.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            username: self.username.clone(),
            email: self.email.clone(),
            gender: self.gender,
        }
    }

    /// Case-insensitive match on username or email.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        let id = identifier.to_lowercase();
        self.username.to_lowercase() == id || self.email.to_lowercase() == id
    }
}

/// Shape of a user record written before the `scheme` discriminant existed.
#[derive(Deserialize)]
struct UntaggedUser {
    username: String,
    email: String,
    gender: Gender,
    password: Option<String>,
    #[serde(rename = "passwordHash")]
    password_hash: Option<String>,
    salt: Option<String>,
    iterations: Option<u32>,
}

impl UntaggedUser {
    fn into_stored(self) -> Option<StoredUser> {
        let credential = match (self.password_hash, self.salt, self.password) {
            (Some(password_hash), Some(salt), _) => Credential::Pbkdf2 {
                password_hash,
                salt,
                iterations: self.iterations.unwrap_or(DEFAULT_PBKDF2_ITERATIONS),
            },
            (_, _, Some(password)) => Credential::Plaintext { password },
            _ => return None,
        };
        Some(StoredUser {
            username: self.username,
            email: self.email,
            gender: self.gender,
            credential,
        })
    }
}

/// Decode the raw users collection, dropping records that are not accounts.
///
/// Anything other than a JSON array (including unparsable text) yields an empty
/// collection.
pub fn decode_users(raw: &str) -> Vec<StoredUser> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(serde_json::Value::Array(values)) => values,
        Ok(_) => {
            tracing::warn!("stored users value is not an array; treating as empty");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored users value is not valid JSON; treating as empty");
            return Vec::new();
        }
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let decoded = if value.get("scheme").is_some() {
                serde_json::from_value::<StoredUser>(value).ok()
            } else {
                serde_json::from_value::<UntaggedUser>(value)
                    .ok()
                    .and_then(UntaggedUser::into_stored)
            };
            if decoded.is_none() {
                tracing::warn!(index, "dropping malformed stored user record");
            }
            decoded
        })
        .collect()
}

/// A portfolio project from the static catalogue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Cover image path or URL
    #[serde(default)]
    pub cover: String,
    /// Technology tags: ["Rust", "WASM"]
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    /// Publication date, ISO 8601: "2024-08-12"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Seed view count shipped with the catalogue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}
