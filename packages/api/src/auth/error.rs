//! Errors surfaced by the credential store.
//!
//! The `Display` text of each variant is the message shown to the user.

use store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration input rejected before touching storage.
    #[error("{0}")]
    Validation(String),

    #[error("An account with this username or email already exists")]
    DuplicateAccount,

    /// No account matches the identifier.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An account matched but the password did not.
    #[error("Wrong password")]
    WrongPassword,

    #[error("Not signed in")]
    NotAuthenticated,

    /// A stored verifier could not be decoded.
    #[error("Stored account is corrupt: {0}")]
    CorruptRecord(String),

    #[error("Password derivation failed: {0}")]
    Derivation(String),

    #[error("Could not save account data: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(message.into())
    }

    /// Whether the error means "these credentials are not accepted".
    pub fn is_credential_failure(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials | AuthError::WrongPassword)
    }
}
