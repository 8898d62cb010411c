use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::search_results::parse_search_results;
use super::{LookupClient, LookupError, LookupFuture, PageSummary};
use crate::config::ConfigError;

const DEFAULT_WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org";
const DEFAULT_WEB_SEARCH_BASE_URL: &str = "https://html.duckduckgo.com";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct HttpLookupConfig {
    pub wikipedia_base_url: String,
    pub web_search_base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpLookupConfig {
    fn default() -> Self {
        Self {
            wikipedia_base_url: DEFAULT_WIKIPEDIA_BASE_URL.to_string(),
            web_search_base_url: DEFAULT_WEB_SEARCH_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryPayload {
    title: Option<String>,
    extract: Option<String>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<ContentUrl>,
}

#[derive(Debug, Deserialize)]
struct ContentUrl {
    page: Option<String>,
}

impl From<SummaryPayload> for PageSummary {
    fn from(payload: SummaryPayload) -> Self {
        Self {
            title: payload.title,
            extract: payload.extract,
            page_url: payload
                .content_urls
                .and_then(|urls| urls.desktop)
                .and_then(|desktop| desktop.page),
        }
    }
}

/// `LookupClient` backed by the Wikipedia REST API, DuckDuckGo's HTML
/// endpoint and plain page fetches.
#[derive(Clone)]
pub struct HttpLookupClient {
    client: reqwest::Client,
    config: HttpLookupConfig,
}

impl HttpLookupClient {
    pub fn new(config: HttpLookupConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self { client, config })
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, LookupError> {
        debug!(url = %url, "lookup request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        Ok(response)
    }

    async fn summary(&self, title: &str) -> Result<PageSummary, LookupError> {
        let url = endpoint_url(
            &self.config.wikipedia_base_url,
            &["api", "rest_v1", "page", "summary", title],
        )?;

        let payload = self
            .get(url)
            .await?
            .json::<SummaryPayload>()
            .await
            .map_err(body_error)?;

        Ok(payload.into())
    }

    async fn titles(&self, query: &str, limit: usize) -> Result<Vec<String>, LookupError> {
        let mut url = endpoint_url(&self.config.wikipedia_base_url, &["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "opensearch")
            .append_pair("search", query)
            .append_pair("limit", &limit.to_string())
            .append_pair("format", "json");

        let payload = self
            .get(url)
            .await?
            .json::<Value>()
            .await
            .map_err(body_error)?;

        Ok(opensearch_titles(&payload, limit))
    }

    async fn search(&self, query: &str, count: usize) -> Result<Vec<String>, LookupError> {
        let mut url = endpoint_url(&self.config.web_search_base_url, &["html", ""])?;
        url.query_pairs_mut().append_pair("q", query);

        let body = self.get(url).await?.text().await.map_err(body_error)?;
        Ok(parse_search_results(
            &body,
            &self.config.web_search_base_url,
            count,
        ))
    }

    async fn page(&self, url: &str) -> Result<String, LookupError> {
        let url = Url::parse(url).map_err(|err| LookupError::InvalidUrl(err.to_string()))?;
        self.get(url).await?.text().await.map_err(body_error)
    }
}

impl LookupClient for HttpLookupClient {
    fn page_summary<'a>(&'a self, title: &'a str) -> LookupFuture<'a, PageSummary> {
        Box::pin(self.summary(title))
    }

    fn search_titles<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> LookupFuture<'a, Vec<String>> {
        Box::pin(self.titles(query, limit))
    }

    fn web_search<'a>(&'a self, query: &'a str, count: usize) -> LookupFuture<'a, Vec<String>> {
        Box::pin(self.search(query, count))
    }

    fn fetch_page<'a>(&'a self, url: &'a str) -> LookupFuture<'a, String> {
        Box::pin(self.page(url))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, LookupError> {
    Url::parse(raw).map_err(|err| LookupError::InvalidUrl(err.to_string()))
}

/// Appends `segments` to whatever path the configured base url carries.
fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url, LookupError> {
    let mut url = parse_base_url(base)?;
    url.path_segments_mut()
        .map_err(|_| LookupError::InvalidUrl("base url cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Transport(err.to_string())
    }
}

fn body_error(err: reqwest::Error) -> LookupError {
    if err.is_decode() {
        LookupError::InvalidPayload(err.to_string())
    } else {
        transport_error(err)
    }
}

// Opensearch answers `[query, [titles], [descriptions], [urls]]`.
fn opensearch_titles(payload: &Value, limit: usize) -> Vec<String> {
    let Some(items) = payload.as_array() else {
        return Vec::new();
    };
    if items.len() < 3 {
        return Vec::new();
    }

    items[1]
        .as_array()
        .map(|titles| {
            titles
                .iter()
                .filter_map(Value::as_str)
                .take(limit)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PageSummary, SummaryPayload, endpoint_url, opensearch_titles};

    #[test]
    fn endpoint_url_keeps_base_path_prefix() {
        let summary = endpoint_url(
            "https://mirror.example/wiki-proxy/",
            &["api", "rest_v1", "page", "summary", "Black_hole"],
        )
        .expect("summary url should build");
        let opensearch = endpoint_url("https://mirror.example/wiki-proxy", &["w", "api.php"])
            .expect("opensearch url should build");
        let search = endpoint_url("https://search.example/ddg", &["html", ""])
            .expect("search url should build");

        assert_eq!(
            summary.as_str(),
            "https://mirror.example/wiki-proxy/api/rest_v1/page/summary/Black_hole"
        );
        assert_eq!(opensearch.as_str(), "https://mirror.example/wiki-proxy/w/api.php");
        assert_eq!(search.as_str(), "https://search.example/ddg/html/");
    }

    #[test]
    fn endpoint_url_on_bare_host_starts_at_root() {
        let url = endpoint_url("https://en.wikipedia.org", &["w", "api.php"])
            .expect("url should build");

        assert_eq!(url.as_str(), "https://en.wikipedia.org/w/api.php");
    }

    #[test]
    fn opensearch_titles_reads_second_element() {
        let payload = json!([
            "gravity",
            ["Gravity", "Gravity (2013 film)", "Gravitation"],
            ["", "", ""],
            ["https://en.wikipedia.org/wiki/Gravity", "", ""]
        ]);

        assert_eq!(
            opensearch_titles(&payload, 2),
            vec!["Gravity".to_string(), "Gravity (2013 film)".to_string()]
        );
    }

    #[test]
    fn opensearch_titles_rejects_short_or_foreign_payloads() {
        assert!(opensearch_titles(&json!(["gravity", ["Gravity"]]), 3).is_empty());
        assert!(opensearch_titles(&json!({"error": "bad"}), 3).is_empty());
        assert!(opensearch_titles(&json!(["gravity", [], [], []]), 3).is_empty());
    }

    #[test]
    fn summary_payload_maps_nested_page_url() {
        let payload: SummaryPayload = serde_json::from_value(json!({
            "title": "Gravity",
            "extract": "Gravity is a fundamental interaction.",
            "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Gravity" } }
        }))
        .expect("payload should decode");

        let summary = PageSummary::from(payload);
        assert_eq!(summary.title.as_deref(), Some("Gravity"));
        assert_eq!(
            summary.page_url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Gravity")
        );
    }

    #[test]
    fn summary_payload_tolerates_missing_fields() {
        let payload: SummaryPayload =
            serde_json::from_value(json!({ "type": "not_found" })).expect("payload should decode");

        assert_eq!(PageSummary::from(payload), PageSummary::default());
    }
}
