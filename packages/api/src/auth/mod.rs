//! Local account authentication: password derivation, validation, the
//! credential store and the session context.

mod credentials;
mod error;
pub mod password;
mod session;
pub mod validation;

pub use credentials::{CredentialStore, RegisterData};
pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use session::Session;
