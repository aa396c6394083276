//! HTTP transport seam
//!
//! [`Transport`] is the opaque authenticated request/response client the
//! Edge DNS facade talks to. [`ReqwestTransport`] is the production
//! implementation; request signing is delegated to a [`RequestSigner`].
//!
//! A transport only fails for requests that never produced a status.
//! Mapping statuses to errors is the facade's job.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use zonesync_core::{Error, Result};

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Version reported in the User-Agent header
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base, e.g. `zones/example.com/recordsets`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of the first query parameter named `key`
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response: status plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Authenticated request/response client
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return whatever status the server answered with
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// EdgeGrid API client credentials
#[derive(Clone)]
pub struct EdgeGridCredentials {
    pub client_token: String,
    /// ⚠️ NEVER log this value
    pub client_secret: String,
    pub access_token: String,
}

// Custom Debug implementation that hides every token
impl fmt::Debug for EdgeGridCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdgeGridCredentials")
            .field("client_token", &"<REDACTED>")
            .field("client_secret", &"<REDACTED>")
            .field("access_token", &"<REDACTED>")
            .finish()
    }
}

/// The parts of a request an authentication scheme signs
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    pub method: Method,
    /// Absolute URL including the query string
    pub url: &'a str,
    pub body: &'a [u8],
}

/// Produces authentication headers for a request
pub trait RequestSigner: Send + Sync {
    /// Return the headers (name, value) to attach to `request`
    fn sign(
        &self,
        credentials: &EdgeGridCredentials,
        request: &SignableRequest<'_>,
    ) -> Result<Vec<(String, String)>>;
}

/// Production transport over `reqwest`
pub struct ReqwestTransport {
    /// `https://{host}/config-dns/v2/`
    base: reqwest::Url,
    client: reqwest::Client,
    credentials: EdgeGridCredentials,
    signer: Arc<dyn RequestSigner>,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base", &self.base.as_str())
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl ReqwestTransport {
    /// Create a transport for the Edge DNS API on `host`
    pub fn new(
        host: &str,
        credentials: EdgeGridCredentials,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self> {
        let base = reqwest::Url::parse(&format!("https://{}/config-dns/v2/", host))
            .map_err(|e| Error::config(format!("Invalid Edge DNS host {}: {}", host, e)))?;

        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base,
            client,
            credentials,
            signer,
        })
    }

    /// Resolve a request to its absolute URL
    pub fn url_for(&self, request: &ApiRequest) -> Result<reqwest::Url> {
        let mut url = self
            .base
            .join(&request.path)
            .map_err(|e| Error::http(format!("Invalid request path {}: {}", request.path, e)))?;

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        Ok(url)
    }
}

/// `zonesync/<version> zonesync-provider-edgedns/<version>`
pub fn user_agent() -> String {
    format!("zonesync/{} zonesync-provider-edgedns/{}", VERSION, VERSION)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        let body = match &request.body {
            Some(value) => serde_json::to_vec(value)?,
            None => Vec::new(),
        };

        let headers = self.signer.sign(
            &self.credentials,
            &SignableRequest {
                method: request.method,
                url: url.as_str(),
                body: &body,
            },
        )?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url.clone()),
            Method::Post => self.client.post(url.clone()),
            Method::Put => self.client.put(url.clone()),
            Method::Delete => self.client.delete(url.clone()),
        };
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        if request.body.is_some() {
            builder = builder
                .header("Content-Type", "application/json")
                .body(body);
        }

        tracing::debug!("{} {}", request.method, url.path());

        let response = builder
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body: {}", e)))?;

        Ok(ApiResponse::new(status, text))
    }
}
