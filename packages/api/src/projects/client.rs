//! Fetching the project catalogue.

use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use store::config::ProjectsConfig;
use store::Project;

/// Errors raised while loading the project catalogue.
#[derive(Debug, thiserror::Error)]
pub enum ProjectsError {
    #[error("Failed: {0}")]
    Status(u16),

    #[error("Failed to load projects: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed project list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Build the request URL, appending a `_=<tick>` cache-buster.
pub fn request_url(base: &str, tick: u64) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}_={tick}")
}

/// Parse a JSON array of projects.
pub fn parse_projects(json: &str) -> Result<Vec<Project>, ProjectsError> {
    Ok(serde_json::from_str(json)?)
}

/// HTTP client for the static project list.
///
/// Dropping the future returned by [`fetch`](ProjectsClient::fetch) aborts the
/// request; callers that re-fetch simply drop the previous one.
#[derive(Clone, Debug)]
pub struct ProjectsClient {
    http: Client,
    url: String,
    cache_bust: bool,
}

impl ProjectsClient {
    /// `config.url` must be absolute on native targets.
    pub fn new(config: &ProjectsConfig) -> Self {
        Self {
            http: Client::new(),
            url: config.url.clone(),
            cache_bust: config.cache_bust,
        }
    }

    pub fn url_for(&self, tick: u64) -> String {
        if self.cache_bust {
            request_url(&self.url, tick)
        } else {
            self.url.clone()
        }
    }

    /// Load the catalogue. `tick` distinguishes successive refetches.
    pub async fn fetch(&self, tick: u64) -> Result<Vec<Project>, ProjectsError> {
        let url = self.url_for(tick);
        tracing::debug!(%url, "fetching projects");

        let response = self
            .http
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "project list request failed");
            return Err(ProjectsError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let projects = parse_projects(&body)?;
        tracing::debug!(count = projects.len(), "loaded projects");
        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CATALOGUE: &str = r#"[
        {"id":"folio","title":"Folio","summary":"This site","tech":["Rust","WASM"],"createdAt":"2024-08-12"},
        {"id":"cli","title":"Tool","summary":"A CLI","tech":["Rust"],"views":12}
    ]"#;

    fn client_for(server: &MockServer, cache_bust: bool) -> ProjectsClient {
        ProjectsClient::new(&ProjectsConfig {
            url: format!("{}/projects.json", server.uri()),
            cache_bust,
        })
    }

    #[test]
    fn test_request_url() {
        assert_eq!(request_url("/projects.json", 0), "/projects.json?_=0");
        assert_eq!(
            request_url("/projects.json?lang=en", 3),
            "/projects.json?lang=en&_=3"
        );
    }

    #[test]
    fn test_parse_projects() {
        let projects = parse_projects(CATALOGUE).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[1].views, Some(12));

        assert!(matches!(
            parse_projects(r#"{"id":"x"}"#),
            Err(ProjectsError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_sends_cache_buster() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects.json"))
            .and(query_param("_", "7"))
            .and(header("cache-control", "no-store"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CATALOGUE))
            .expect(1)
            .mount(&server)
            .await;

        let projects = client_for(&server, true).fetch(7).await.unwrap();
        assert_eq!(projects[0].id, "folio");
        assert_eq!(projects[0].tech, vec!["Rust", "WASM"]);
    }

    #[tokio::test]
    async fn test_fetch_without_cache_buster() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let client = client_for(&server, false);
        assert!(!client.url_for(5).contains("_="));
        assert!(client.fetch(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server, true).fetch(0).await.unwrap_err();
        assert!(matches!(err, ProjectsError::Status(404)));
        assert_eq!(err.to_string(), "Failed: 404");
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, true).fetch(0).await.unwrap_err();
        assert!(matches!(err, ProjectsError::Parse(_)));
    }
}
