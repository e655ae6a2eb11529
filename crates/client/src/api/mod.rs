//! Course-search backend client.
//!
//! ### Endpoints
//!
//! - `POST /search_by_title`, `POST /search_by_code`: `{searchTerm}` → `{status, courses}`
//! - `POST /search_by_professor`: `{searchTerm}` → `{status, results}`
//! - `POST /save_location`: `{latitude, longitude}` → acknowledgement
//! - `POST /ask_question`: `{question, conversation_history}` → `{status, answer}`
//!
//! Error responses carry `{status: "error", message}` with a 2xx status.
//! Anything else that goes wrong (non-2xx, timeout, bad JSON) is a transport
//! failure.

pub mod error;
pub mod response;

pub use error::ApiError;
pub use response::{AskResponse, SearchPayload, classify_professor_results};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use coursefind_core::{AppConfig, Error, SearchMode};
use reqwest::header;
use serde_json::{Value, json};
use url::Url;

use response::{CourseSearchResponse, ProfessorSearchResponse};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "coursefind/0.1";

/// Endpoint for a mode given by name. Unknown names use the title endpoint.
pub fn endpoint_for(mode: &str) -> &'static str {
    SearchMode::from_name(mode).endpoint()
}

/// Sends JSON to the backend and returns the decoded JSON reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError>;
}

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Backend base URL; endpoint paths are resolved against it.
    pub base_url: Url,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: coursefind/0.x).
    pub user_agent: String,
}

impl HttpConfig {
    pub fn new(base_url: Url) -> Self {
        Self { base_url, timeout: DEFAULT_TIMEOUT, user_agent: DEFAULT_USER_AGENT.to_string() }
    }

    /// Build from application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        Ok(Self { base_url, timeout: config.timeout(), user_agent: config.user_agent.clone() })
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(mut config: HttpConfig) -> Result<Self, ApiError> {
        if !config.base_url.path().ends_with('/') {
            let path = format!("{}/", config.base_url.path());
            config.base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, base_url: config.base_url })
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.url_for(path)?;
        let start = Instant::now();

        let response = self
            .http
            .post(url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("{} responded {} in {:?}", url, status, start.elapsed());

        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned));
            return Err(ApiError::HttpError { status: status.as_u16(), message });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Typed client over a [`Transport`].
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn Transport>,
}

impl SearchClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client speaking HTTP to the configured backend.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(HttpConfig::from_app_config(config)?)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Run a search against the endpoint for `mode`.
    ///
    /// The term is sent exactly as given. A `status: "error"` reply becomes
    /// [`Error::Server`]; every other failure becomes [`Error::Transport`].
    pub async fn search(&self, mode: SearchMode, term: &str) -> Result<SearchPayload, Error> {
        let endpoint = endpoint_for(mode.as_str());
        tracing::debug!(%mode, endpoint, "dispatching search");

        let raw = self
            .transport
            .post_json(endpoint, json!({ "searchTerm": term }))
            .await?;

        if mode.returns_courses() {
            let parsed: CourseSearchResponse =
                serde_json::from_value(raw).map_err(|e| ApiError::Parse(e.to_string()))?;
            parsed.into_payload()
        } else {
            let parsed: ProfessorSearchResponse =
                serde_json::from_value(raw).map_err(|e| ApiError::Parse(e.to_string()))?;
            parsed.into_payload()
        }
    }

    /// Report the user's position. The acknowledgement body is ignored.
    pub async fn save_location(&self, latitude: f64, longitude: f64) -> Result<(), Error> {
        let ack = self
            .transport
            .post_json("/save_location", json!({ "latitude": latitude, "longitude": longitude }))
            .await?;
        tracing::debug!("location saved: {}", ack);
        Ok(())
    }

    /// Ask the course assistant a question.
    pub async fn ask_question(&self, question: &str, history: Value) -> Result<AskResponse, ApiError> {
        let raw = self
            .transport
            .post_json("/ask_question", json!({ "question": question, "conversation_history": history }))
            .await?;
        serde_json::from_value(raw).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays one canned reply and records every request.
    struct CannedTransport {
        reply: Result<Value, ApiError>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl CannedTransport {
        fn new(reply: Result<Value, ApiError>) -> Arc<Self> {
            Arc::new(Self { reply, requests: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
            self.requests.lock().unwrap().push((path.to_string(), body));
            self.reply.clone()
        }
    }

    #[test]
    fn test_endpoint_for_falls_back_to_title() {
        assert_eq!(endpoint_for("title"), "/search_by_title");
        assert_eq!(endpoint_for("professor"), "/search_by_professor");
        assert_eq!(endpoint_for("code"), "/search_by_code");
        assert_eq!(endpoint_for("semester"), "/search_by_title");
    }

    #[test]
    fn test_http_transport_joins_paths() {
        let transport =
            HttpTransport::new(HttpConfig::new(Url::parse("http://courses.example.edu/api").unwrap())).unwrap();
        assert_eq!(
            transport.url_for("/search_by_code").unwrap().as_str(),
            "http://courses.example.edu/api/search_by_code"
        );
    }

    #[tokio::test]
    async fn test_search_sends_term_as_typed() {
        let transport = CannedTransport::new(Ok(json!({"status": "success", "courses": []})));
        let client = SearchClient::new(transport.clone());

        let payload = client.search(SearchMode::Code, " 101 ").await.unwrap();
        assert_eq!(payload, SearchPayload::Courses(vec![]));

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].0, "/search_by_code");
        assert_eq!(requests[0].1, json!({"searchTerm": " 101 "}));
    }

    #[tokio::test]
    async fn test_search_dispatches_through_endpoint_for() {
        for mode in SearchMode::ALL {
            let transport = CannedTransport::new(Ok(json!({"status": "success", "courses": [], "results": []})));
            SearchClient::new(transport.clone()).search(mode, "x").await.unwrap();
            assert_eq!(transport.requests.lock().unwrap()[0].0, endpoint_for(mode.as_str()));
        }
    }

    #[tokio::test]
    async fn test_search_malformed_body_is_transport_error() {
        let transport = CannedTransport::new(Ok(json!({"status": "success", "courses": "nope"})));
        let client = SearchClient::new(transport);

        let err = client.search(SearchMode::Title, "calc").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_search_timeout_is_transport_error() {
        let client = SearchClient::new(CannedTransport::new(Err(ApiError::Timeout)));
        let err = client.search(SearchMode::Professor, "smith").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_save_location_body() {
        let transport = CannedTransport::new(Ok(json!({"status": "success"})));
        let client = SearchClient::new(transport.clone());

        client.save_location(34.05, -118.24).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].0, "/save_location");
        assert_eq!(requests[0].1, json!({"latitude": 34.05, "longitude": -118.24}));
    }
}
