//! HTTP transport abstraction
//!
//! Endpoints build an [`HttpRequest`] carrying its own [`AuthHeaders`] and
//! hand it to an [`HttpTransport`]. The real transport is backed by
//! `reqwest`; tests inject [`MockHttpTransport`] to observe requests without
//! network access.

use crate::error::{RestError, RestResult};
use async_trait::async_trait;
use decagon_auth::AuthHeaders;
use reqwest::{Client, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST with a JSON body
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// One authenticated request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method
    pub method: HttpMethod,
    /// Path relative to the base URL (e.g. "/conversation/new")
    pub path: &'static str,
    /// Query parameters
    pub query: Vec<(&'static str, String)>,
    /// Auth headers minted for this request only
    pub headers: AuthHeaders,
    /// JSON body (POST only)
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Create a GET request
    pub fn get(path: &'static str, headers: AuthHeaders) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            query: Vec::new(),
            headers,
            body: None,
        }
    }

    /// Create a POST request with a JSON body
    pub fn post(path: &'static str, headers: AuthHeaders, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            query: Vec::new(),
            headers,
            body: Some(body),
        }
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }
}

/// Raw response as received from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transport abstraction
///
/// Implementations send exactly the headers carried by the request; they
/// hold no per-user state of their own.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the raw response
    async fn execute(&self, request: HttpRequest) -> RestResult<HttpResponse>;
}

/// Real transport using `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for the given base URL
    ///
    /// # Errors
    /// Returns [`RestError::Configuration`] if the URL is not an absolute
    /// http(s) URL, or [`RestError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> RestResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| RestError::Configuration(format!("invalid base_url {}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RestError::Configuration(format!(
                "base_url must use http or https, got {}",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = request.path))]
    async fn execute(&self, request: HttpRequest) -> RestResult<HttpResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        for (name, value) in request.headers.header_pairs() {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, len = body.len(), "Received response");

        Ok(HttpResponse { status, body })
    }
}

/// Mock transport for testing
///
/// Records every request and replays queued responses. When the queue is
/// empty it answers `200 {}`.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockHttpTransport {
    requests: parking_lot::Mutex<Vec<HttpRequest>>,
    responses: parking_lot::Mutex<std::collections::VecDeque<RestResult<HttpResponse>>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockHttpTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn push_json(&self, status: u16, body: Value) {
        self.responses.lock().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    /// Queue a raw response body
    pub fn push_raw(&self, status: u16, body: impl Into<String>) {
        self.responses.lock().push_back(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: RestError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests seen so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn execute(&self, request: HttpRequest) -> RestResult<HttpResponse> {
        self.requests.lock().push(request);
        self.responses.lock().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                body: "{}".to_string(),
            })
        })
    }
}
