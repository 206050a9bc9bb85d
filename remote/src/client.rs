//! Shared HTTP plumbing for the REST adapters.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::RemoteError;

/// Default overall request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// `reqwest::Client` plus a base URL and optional bearer token.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    bearer: Option<String>,
}

/// Error envelope used by both services:
/// `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Client(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `{base}/{collection}/{key}` with `key` percent-encoded as one path
    /// segment, so `/`, `?` and `#` inside it cannot reach another resource.
    pub(crate) fn document_url(&self, collection: &str, key: &str) -> Result<Url, RemoteError> {
        // Dot segments are dropped by URL normalisation.
        if key.is_empty() || key == "." || key == ".." {
            return Err(RemoteError::InvalidKey(key.to_string()));
        }
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RemoteError::Client(format!("invalid base url {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Client(format!("base url {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push(collection)
            .push(key);
        Ok(url)
    }

    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.request(method, self.url(path)))
    }

    pub(crate) fn request_url(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.authorize(self.http.request(method, url))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, RemoteError> {
        builder.send().await.map_err(RemoteError::from_reqwest)
    }

    /// Decode a 2xx body, or turn any other status into [`RemoteError::Status`].
    pub(crate) async fn json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(response).await);
        }
        response.json().await.map_err(RemoteError::from_reqwest)
    }

    pub(crate) async fn status_error(response: reqwest::Response) -> RemoteError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        RemoteError::Status {
            status,
            message: error_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
        }
    }
}

/// Pull `error.message` out of an error body, if it has one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|env| env.error.message)
        .filter(|m| !m.is_empty())
}
