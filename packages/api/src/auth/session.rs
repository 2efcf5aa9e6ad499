//! Explicit session context.
//!
//! [`Session`] is the in-memory view of who is signed in. It is created once at
//! start-up with [`Session::restore`] and then passed to whatever needs it; the
//! sign-in operations here go through the [`CredentialStore`] and keep the
//! persisted marker and the in-memory value in step.

use store::{KeyValueStore, PublicUser};

use super::credentials::{CredentialStore, RegisterData};
use super::error::AuthError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<PublicUser>,
}

impl Session {
    /// A signed-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Rehydrate from the persisted session marker.
    pub async fn restore<S: KeyValueStore>(creds: &CredentialStore<S>) -> Self {
        Self {
            user: creds.current_user().await,
        }
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Guard for pages that need a signed-in user.
    pub fn require_user(&self) -> Result<&PublicUser, AuthError> {
        self.user.as_ref().ok_or(AuthError::NotAuthenticated)
    }

    pub async fn register<S: KeyValueStore>(
        &mut self,
        creds: &CredentialStore<S>,
        data: RegisterData,
    ) -> Result<PublicUser, AuthError> {
        let user = creds.register(data).await?;
        self.user = Some(user.clone());
        Ok(user)
    }

    /// On failure the session is left as it was.
    pub async fn login<S: KeyValueStore>(
        &mut self,
        creds: &CredentialStore<S>,
        identifier: &str,
        password: &str,
    ) -> Result<PublicUser, AuthError> {
        let user = creds.login(identifier, password).await?;
        self.user = Some(user.clone());
        Ok(user)
    }

    pub async fn logout<S: KeyValueStore>(
        &mut self,
        creds: &CredentialStore<S>,
    ) -> Result<(), AuthError> {
        creds.logout().await?;
        self.user = None;
        Ok(())
    }
}
