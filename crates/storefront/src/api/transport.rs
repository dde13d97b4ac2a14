//! Request/response transport for the web-larek API.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use super::ApiError;

/// HTTP method used for requests that carry a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiPostMethod {
    #[default]
    Post,
    Put,
    Delete,
}

impl From<ApiPostMethod> for reqwest::Method {
    fn from(method: ApiPostMethod) -> Self {
        match method {
            ApiPostMethod::Post => Self::POST,
            ApiPostMethod::Put => Self::PUT,
            ApiPostMethod::Delete => Self::DELETE,
        }
    }
}

/// A generic JSON request/response client.
///
/// Paths are relative to the API base (e.g. `/product/`).
pub trait Transport {
    /// Fetch and decode `path`.
    fn get<T: DeserializeOwned>(&self, path: &str) -> impl Future<Output = Result<T, ApiError>>;

    /// Send `body` to `path` and decode the reply.
    fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        method: ApiPostMethod,
    ) -> impl Future<Output = Result<T, ApiError>>;
}

/// Error body returned by the API on failure.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// [`Transport`] over HTTP, backed by `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// The API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL verbatim, keeping the base's own path.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            error!(
                status = %status,
                message = %message,
                "API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }
}

impl Transport for HttpTransport {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path)?;
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        method: ApiPostMethod,
    ) -> Result<T, ApiError> {
        let url = self.url(path)?;
        let method = reqwest::Method::from(method);
        debug!(%url, %method, "request");
        let response = self.client.request(method, url).json(body).send().await?;
        Self::handle_response(response).await
    }
}
