//! # API crate: client-side services for the portfolio
//!
//! Everything the portfolio pages call that is more than presentation: local
//! account management and the project catalogue. Storage goes through the
//! [`store::KeyValueStore`] trait, so the same code runs against browser
//! `localStorage` on the web and a directory of files or memory elsewhere.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | PBKDF2 password verifiers, registration validation, the [`CredentialStore`] (register, login, logout, current user, legacy migration) and the explicit [`Session`] context. |
//! | [`projects`] | Fetching, parsing, searching and ordering the static project list. |

pub mod auth;
pub mod projects;

pub use auth::{AuthError, CredentialStore, RegisterData, Session};
pub use projects::{ProjectQuery, ProjectsClient, ProjectsError, SortKey};

pub use store::{FolioConfig, Gender, Project, PublicUser};
