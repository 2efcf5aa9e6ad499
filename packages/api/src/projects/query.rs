//! Searching and ordering the project catalogue.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use store::Project;

/// Ordering by publication date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
}

/// Free-text search plus required tech tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    pub text: String,
    /// Every tag listed here must be present on a project.
    pub tech: Vec<String>,
    pub sort: SortKey,
}

impl ProjectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Adds the tag if absent, removes it if present.
    pub fn toggle_tech(&mut self, tag: &str) {
        if let Some(pos) = self.tech.iter().position(|t| t == tag) {
            self.tech.remove(pos);
        } else {
            self.tech.push(tag.to_string());
        }
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn clear_filters(&mut self) {
        self.text.clear();
        self.tech.clear();
    }

    pub fn matches(&self, project: &Project) -> bool {
        let q = self.text.trim().to_lowercase();
        let matches_text = q.is_empty()
            || project.title.to_lowercase().contains(&q)
            || project.summary.to_lowercase().contains(&q)
            || project.tech.iter().any(|t| t.to_lowercase().contains(&q));

        let matches_tech = self.tech.iter().all(|t| project.tech.contains(t));

        matches_text && matches_tech
    }

    /// Filter and sort. Ties keep catalogue order.
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let mut hits: Vec<(i64, &Project)> = projects
            .iter()
            .filter(|p| self.matches(p))
            .map(|p| (published_millis(p), p))
            .collect();

        match self.sort {
            SortKey::Newest => hits.sort_by(|a, b| b.0.cmp(&a.0)),
            SortKey::Oldest => hits.sort_by(|a, b| a.0.cmp(&b.0)),
        }

        hits.into_iter().map(|(_, p)| p).collect()
    }
}

/// Distinct tech tags across the catalogue, sorted alphabetically ignoring case.
pub fn all_tech(projects: &[Project]) -> Vec<String> {
    let mut tags: Vec<String> = projects
        .iter()
        .flat_map(|p| p.tech.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    tags.sort_by_cached_key(|t| (t.to_lowercase(), t.clone()));
    tags
}

/// Milliseconds since the epoch for `createdAt`; missing or unparsable is 0.
pub fn published_millis(project: &Project) -> i64 {
    project
        .created_at
        .as_deref()
        .and_then(parse_date_millis)
        .unwrap_or(0)
}

fn parse_date_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, title: &str, tech: &[&str], created_at: Option<&str>) -> Project {
        Project {
            id: id.to_string(),
            title: title.to_string(),
            summary: format!("{title} summary"),
            cover: String::new(),
            tech: tech.iter().map(|t| t.to_string()).collect(),
            live_url: None,
            repo_url: None,
            created_at: created_at.map(str::to_string),
            views: None,
        }
    }

    fn catalogue() -> Vec<Project> {
        vec![
            project("a", "Folio", &["Rust", "WASM"], Some("2024-08-12")),
            project("b", "Shop", &["TypeScript", "React"], Some("2023-01-05")),
            project("c", "Notes", &["Rust"], Some("2025-02-01T10:00:00Z")),
            project("d", "Draft", &["Go"], None),
        ]
    }

    fn ids(hits: &[&Project]) -> Vec<String> {
        hits.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_sort_newest_and_oldest() {
        let projects = catalogue();

        let newest = ProjectQuery::new().apply(&projects);
        assert_eq!(ids(&newest), vec!["c", "a", "b", "d"]);

        let oldest = ProjectQuery::new().with_sort(SortKey::Oldest).apply(&projects);
        assert_eq!(ids(&oldest), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_text_search_is_case_insensitive() {
        let projects = catalogue();

        let hits = ProjectQuery::new().with_text("  FOLIO ").apply(&projects);
        assert_eq!(ids(&hits), vec!["a"]);

        // Matches tech tags too
        let hits = ProjectQuery::new().with_text("react").apply(&projects);
        assert_eq!(ids(&hits), vec!["b"]);

        // Summary text
        let hits = ProjectQuery::new().with_text("draft summary").apply(&projects);
        assert_eq!(ids(&hits), vec!["d"]);
    }

    #[test]
    fn test_tech_filter_requires_all_tags() {
        let projects = catalogue();
        let mut query = ProjectQuery::new();

        query.toggle_tech("Rust");
        assert_eq!(ids(&query.apply(&projects)), vec!["c", "a"]);

        query.toggle_tech("WASM");
        assert_eq!(ids(&query.apply(&projects)), vec!["a"]);

        // Toggling again removes the tag
        query.toggle_tech("WASM");
        assert_eq!(query.tech, vec!["Rust".to_string()]);

        query.clear_filters();
        assert_eq!(query.apply(&projects).len(), 4);
    }

    #[test]
    fn test_all_tech_is_sorted_and_distinct() {
        assert_eq!(
            all_tech(&catalogue()),
            vec!["Go", "React", "Rust", "TypeScript", "WASM"]
        );

        let mixed = vec![
            project("x", "X", &["WASM", "aws"], None),
            project("y", "Y", &["Axum", "rust", "Rust"], None),
        ];
        assert_eq!(all_tech(&mixed), vec!["aws", "Axum", "Rust", "rust", "WASM"]);
    }

    #[test]
    fn test_published_millis() {
        let projects = catalogue();
        assert_eq!(published_millis(&projects[3]), 0);
        assert_eq!(
            published_millis(&project("x", "X", &[], Some("1970-01-02"))),
            86_400_000
        );
        assert_eq!(
            published_millis(&project("x", "X", &[], Some("yesterday"))),
            0
        );
        assert_eq!(
            published_millis(&project("x", "X", &[], Some("1970-01-01T00:00:01"))),
            1_000
        );
    }
}
