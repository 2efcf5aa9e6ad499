//! # Project catalogue
//!
//! The portfolio's projects are a static JSON array (default `/projects.json`)
//! of [`Project`](store::Project) records. This module loads it and answers the
//! questions the Projects page asks of it.
//!
//! - [`ProjectsClient`]: GETs the catalogue with `Cache-Control: no-store` and,
//!   unless disabled in [`ProjectsConfig`](store::config::ProjectsConfig), a
//!   `_=<tick>` query parameter so every refetch bypasses intermediate caches.
//! - [`ProjectQuery`]: free-text search over title, summary and tech tags, a
//!   set of required tech tags, and newest/oldest ordering by `createdAt`.
//! - [`all_tech`]: the distinct tag list used to build filter chips.

mod client;
mod query;

pub use client::{parse_projects, request_url, ProjectsClient, ProjectsError};
pub use query::{all_tech, published_millis, ProjectQuery, SortKey};
