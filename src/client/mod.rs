//! HTTP client for the dashboard backend.
//!
//! Every endpoint the dashboard reads or writes goes through [`BackendClient`].
//! Requests share one pooled `reqwest::Client` and are bounded by the
//! configured timeout so a hung backend never blocks a poll source forever.

mod error;
mod types;

pub use error::ClientError;
pub use types::{format_log_entries, HandlerState, HealthReport, LogEntry, WinnerRecord};

use crate::calendar::Event;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use types::HandlerStatusResponse;

/// Typed access to the backend API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl BackendClient {
    /// Create a client for `base_url` with a fresh connection pool.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Self::with_client(base_url, client, timeout)
    }

    /// Create a client around an existing HTTP client (for testing).
    pub fn with_client(
        base_url: &str,
        client: reqwest::Client,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            base,
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Build an endpoint URL below the base. Each segment is percent-encoded
    /// on its own, so file names cannot escape their path position.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    pub(crate) fn classify_error(&self, e: reqwest::Error) -> ClientError {
        ClientError::from_reqwest(e, self.timeout.as_secs())
    }

    /// GET and return the body, failing on non-success status.
    async fn get_text(&self, url: Url) -> Result<String, ClientError> {
        tracing::trace!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        if !response.status().is_success() {
            return Err(ClientError::Http(response.status().as_u16()));
        }

        response.text().await.map_err(|e| self.classify_error(e))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn post(&self, url: Url) -> Result<(), ClientError> {
        tracing::trace!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify_error(e))?;

        if !response.status().is_success() {
            return Err(ClientError::Http(response.status().as_u16()));
        }
        Ok(())
    }

    /// `GET /api/calendar`
    pub async fn calendar(&self) -> Result<Vec<Event>, ClientError> {
        self.get_json(self.endpoint(&["api", "calendar"])).await
    }

    /// `GET /api/event_files`
    pub async fn event_files(&self) -> Result<Vec<String>, ClientError> {
        self.get_json(self.endpoint(&["api", "event_files"])).await
    }

    /// `GET /api/event_json_content/{name}`, raw text
    pub async fn event_json_content(&self, name: &str) -> Result<String, ClientError> {
        self.get_text(self.endpoint(&["api", "event_json_content", name]))
            .await
    }

    /// `GET /api/logs`
    pub async fn logs(&self) -> Result<Vec<LogEntry>, ClientError> {
        self.get_json(self.endpoint(&["api", "logs"])).await
    }

    /// `GET /api/log_content/{name}`, raw text
    pub async fn log_content(&self, name: &str) -> Result<String, ClientError> {
        self.get_text(self.endpoint(&["api", "log_content", name]))
            .await
    }

    /// `GET /logs/`, the result files (`*.json`) linked from the log
    /// directory index.
    pub async fn result_files(&self) -> Result<Vec<Url>, ClientError> {
        let index = self.endpoint(&["logs", ""]);
        let html = self.get_text(index.clone()).await?;
        Ok(json_links(&index, &html))
    }

    /// GET one result file from [`result_files`](Self::result_files).
    pub async fn winner_record(&self, url: Url) -> Result<WinnerRecord, ClientError> {
        self.get_json(url).await
    }

    /// Every readable result file in the log directory, in listing order.
    ///
    /// Only a failed directory listing is an error. A result file that
    /// cannot be fetched or parsed is logged and left out.
    pub async fn winners(&self) -> Result<Vec<WinnerRecord>, ClientError> {
        let files = self.result_files().await?;
        let loads = files.into_iter().map(|url| async move {
            let result = self.winner_record(url.clone()).await;
            (url, result)
        });

        Ok(futures::future::join_all(loads)
            .await
            .into_iter()
            .filter_map(|(url, result)| match result {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(file = %url, error = %e, "Skipping unreadable result file");
                    None
                }
            })
            .collect())
    }

    /// `GET /api/event_handler_status`
    pub async fn handler_status(&self) -> Result<HandlerState, ClientError> {
        let response: HandlerStatusResponse = self
            .get_json(self.endpoint(&["api", "event_handler_status"]))
            .await?;
        Ok(HandlerState::from_reported(&response.status))
    }

    /// `POST /api/event_handler/start`
    pub async fn start_handler(&self) -> Result<(), ClientError> {
        self.post(self.endpoint(&["api", "event_handler", "start"]))
            .await
    }

    /// `POST /api/event_handler/stop`
    pub async fn stop_handler(&self) -> Result<(), ClientError> {
        self.post(self.endpoint(&["api", "event_handler", "stop"]))
            .await
    }
}

/// Parse and check a backend base URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let invalid = |reason: &str| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base"));
    }
    Ok(url)
}

/// Every distinct `href` in a directory index that names a `.json` file,
/// resolved against the index URL, in page order.
fn json_links(index: &Url, html: &str) -> Vec<Url> {
    let mut links: Vec<Url> = Vec::new();
    for rest in html.split("href=").skip(1) {
        let mut chars = rest.chars();
        let href = match chars.next() {
            Some(quote @ ('"' | '\'')) => chars.as_str().split(quote).next(),
            _ => rest.split(|c: char| c.is_whitespace() || c == '>').next(),
        };
        let Some(href) = href.filter(|h| h.ends_with(".json")) else {
            continue;
        };
        if let Ok(url) = index.join(href) {
            if !links.contains(&url) {
                links.push(url);
            }
        }
    }
    links
}

/// Pretty-print JSON text, or return it unchanged when it is not JSON.
pub fn pretty_json(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(base, Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_endpoint_from_root() {
        let c = client("http://localhost:5000");
        assert_eq!(
            c.endpoint(&["api", "calendar"]).as_str(),
            "http://localhost:5000/api/calendar"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let c = client("http://mc.example.com/panel/");
        assert_eq!(
            c.endpoint(&["api", "logs"]).as_str(),
            "http://mc.example.com/panel/api/logs"
        );
    }

    #[test]
    fn test_endpoint_encodes_file_names() {
        let c = client("http://localhost:5000");
        let url = c.endpoint(&["api", "log_content", "../secret log.txt"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/log_content/..%2Fsecret%20log.txt"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("ftp://localhost"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("mailto:ops@example.com"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_pretty_json_formats_objects() {
        let pretty = pretty_json(r#"{"Event":"Build","Leaders":["a"]}"#);
        assert!(pretty.contains("\n"));
        assert!(pretty.contains("\"Event\": \"Build\""));
    }

    #[test]
    fn test_pretty_json_passes_through_text() {
        assert_eq!(pretty_json("not json {"), "not json {");
    }

    #[test]
    fn test_json_links_from_directory_index() {
        let index = Url::parse("http://localhost:5000/logs/").unwrap();
        let html = r#"<ul>
            <li><a href="event_logs.txt">event_logs.txt</a></li>
            <li><a href="Build-Contest-06-01-2024.json">Build-Contest-06-01-2024.json</a></li>
            <li><a href='/logs/PvP-Night-06-02-2024.json'>PvP</a></li>
            <li><a href=Race%20Day.json>Race</a></li>
            <li><a href="Build-Contest-06-01-2024.json">again</a></li>
        </ul>"#;

        let links: Vec<String> = json_links(&index, html)
            .into_iter()
            .map(|u| u.to_string())
            .collect();
        assert_eq!(
            links,
            vec![
                "http://localhost:5000/logs/Build-Contest-06-01-2024.json",
                "http://localhost:5000/logs/PvP-Night-06-02-2024.json",
                "http://localhost:5000/logs/Race%20Day.json",
            ]
        );
    }

    #[test]
    fn test_result_index_keeps_base_prefix() {
        let c = client("http://mc.example.com/panel");
        assert_eq!(
            c.endpoint(&["logs", ""]).as_str(),
            "http://mc.example.com/panel/logs/"
        );
    }
}
