//! # Credential store: local accounts in key-value storage
//!
//! [`CredentialStore`] registers and authenticates portfolio accounts entirely on
//! the client. The account list lives as a JSON array under the users key (default
//! `"users"`), and the signed-in account's [`PublicUser`] lives under the session
//! key (default `"currentUser"`). Both keys come from [`FolioConfig`].
//!
//! ## Operations
//!
//! | Method | Behaviour |
//! |--------|-----------|
//! | [`register`](CredentialStore::register) | Validates input, rejects a username or email already in use (case-insensitive), derives a PBKDF2 verifier with a fresh salt, appends the account, and writes the session marker. |
//! | [`login`](CredentialStore::login) | Finds the account by username or email (case-insensitive), checks the password against its [`Credential`], migrates plaintext accounts to a verifier on success, and writes the session marker. |
//! | [`logout`](CredentialStore::logout) | Removes the session marker. The account list is untouched. |
//! | [`current_user`](CredentialStore::current_user) | Reads the session marker; absent or malformed data is `None`. |
//!
//! ## Registration failures
//!
//! The account list is written before the session marker. If the marker write
//! fails, the new account is removed again (best-effort) and the storage error is
//! returned, so a retry does not trip over its own half-finished registration.
//!
//! ## Legacy migration
//!
//! A [`Credential::Plaintext`] account that logs in successfully is rewritten in
//! place as [`Credential::Pbkdf2`] using the configured round count. The rewrite is
//! best-effort: if saving fails the login still succeeds and the account stays in
//! the legacy form until the next login.
//!
//! ## Concurrency
//!
//! Each operation reads the account list, modifies it, and writes it back. Two
//! writers racing on the same storage (two browser tabs) are last-write-wins;
//! nothing detects or prevents it.

use store::config::{AuthConfig, StorageConfig};
use store::{
    decode_users, load_json, save_json, Credential, FolioConfig, Gender, KeyValueStore,
    PublicUser, StoredUser,
};

use super::error::AuthError;
use super::password;
use super::validation;

/// Input for [`CredentialStore::register`].
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
}

impl RegisterData {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            gender,
        }
    }
}

impl RegisterData {
    /// Build from raw form fields, checking the confirmation and the gender value.
    pub fn from_form(
        username: &str,
        email: &str,
        password: &str,
        confirm: &str,
        gender: &str,
    ) -> Result<Self, AuthError> {
        validation::validate_confirmation(password, confirm)?;
        let gender = validation::parse_gender(gender)?;
        Ok(Self::new(username, email, password, gender))
    }
}

impl std::fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterData")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("gender", &self.gender)
            .finish_non_exhaustive()
    }
}

/// Local account registry backed by a KeyValueStore.
pub struct CredentialStore<S: KeyValueStore> {
    store: S,
    auth: AuthConfig,
    keys: StorageConfig,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Create a credential store with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &FolioConfig::default())
    }

    pub fn with_config(store: S, config: &FolioConfig) -> Self {
        Self {
            store,
            auth: config.auth.clone(),
            keys: config.storage.clone(),
        }
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All decodable accounts, in registration order.
    pub async fn users(&self) -> Vec<StoredUser> {
        match self.store.get(&self.keys.users_key).await {
            Some(raw) => decode_users(&raw),
            None => Vec::new(),
        }
    }

    async fn save_users(&self, users: &[StoredUser]) -> Result<(), AuthError> {
        save_json(&self.store, &self.keys.users_key, users).await?;
        Ok(())
    }

    async fn set_current(&self, user: &PublicUser) -> Result<(), AuthError> {
        save_json(&self.store, &self.keys.session_key, user).await?;
        Ok(())
    }

    /// Register a new account and sign it in.
    pub async fn register(&self, data: RegisterData) -> Result<PublicUser, AuthError> {
        validation::validate_username(&data.username)?;
        validation::validate_email(&data.email)?;
        validation::validate_password(&data.password, self.auth.min_password_len)?;

        let username = data.username.trim().to_string();
        let email = data.email.trim().to_string();

        let mut users = self.users().await;
        if users
            .iter()
            .any(|u| u.matches_identifier(&username) || u.matches_identifier(&email))
        {
            tracing::info!(%username, "registration rejected: account exists");
            return Err(AuthError::DuplicateAccount);
        }

        let (password_hash, salt) =
            password::hash_password_async(&data.password, self.auth.iterations).await?;

        let user = StoredUser {
            username,
            email,
            gender: data.gender,
            credential: Credential::Pbkdf2 {
                password_hash,
                salt,
                iterations: self.auth.iterations,
            },
        };
        let public = user.to_public();

        users.push(user);
        self.save_users(&users).await?;
        if let Err(e) = self.set_current(&public).await {
            users.pop();
            if let Err(rollback) = self.save_users(&users).await {
                tracing::warn!(error = %rollback, "could not roll back unfinished registration");
            }
            return Err(e);
        }

        tracing::info!(username = %public.username, "registered account");
        Ok(public)
    }

    /// Authenticate by username or email and sign the account in.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<PublicUser, AuthError> {
        let identifier = identifier.trim();
        let mut users = self.users().await;

        let Some(index) = users.iter().position(|u| u.matches_identifier(identifier)) else {
            tracing::info!("login rejected: unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        let migrate = match &users[index].credential {
            Credential::Pbkdf2 {
                password_hash,
                salt,
                iterations,
            } => {
                if !password::verify_password_async(password, password_hash, salt, *iterations)
                    .await?
                {
                    tracing::info!(username = %users[index].username, "login rejected: wrong password");
                    return Err(AuthError::WrongPassword);
                }
                false
            }
            Credential::Plaintext { password: stored } => {
                if stored != password {
                    tracing::info!(username = %users[index].username, "login rejected: wrong password");
                    return Err(AuthError::WrongPassword);
                }
                true
            }
        };

        if migrate {
            self.migrate_legacy(&mut users, index, password).await;
        }

        let public = users[index].to_public();
        self.set_current(&public).await?;

        tracing::info!(username = %public.username, "logged in");
        Ok(public)
    }

    /// Rewrite a plaintext account as a PBKDF2 verifier. Failures are logged only.
    async fn migrate_legacy(&self, users: &mut [StoredUser], index: usize, password: &str) {
        let (password_hash, salt) =
            match password::hash_password_async(password, self.auth.iterations).await {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "legacy account migration skipped");
                    return;
                }
            };

        let previous = std::mem::replace(
            &mut users[index].credential,
            Credential::Pbkdf2 {
                password_hash,
                salt,
                iterations: self.auth.iterations,
            },
        );

        match self.save_users(users).await {
            Ok(()) => {
                tracing::info!(username = %users[index].username, "migrated legacy account to pbkdf2");
            }
            Err(e) => {
                users[index].credential = previous;
                tracing::warn!(error = %e, "legacy account migration not saved");
            }
        }
    }

    /// Sign out. Accounts are kept.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(&self.keys.session_key).await?;
        tracing::info!("logged out");
        Ok(())
    }

    /// The signed-in account, if the session marker is present and well formed.
    pub async fn current_user(&self) -> Option<PublicUser> {
        let user: PublicUser = load_json(&self.store, &self.keys.session_key).await?;
        if !user.is_well_formed() {
            tracing::warn!("ignoring malformed session marker");
            return None;
        }
        Some(user)
    }
}
