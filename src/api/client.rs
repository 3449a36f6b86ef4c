//! The HTTP client for the Cashlyzer REST API.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::api::ApiError;

/// How long to wait for the API before giving up on a request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The bearer token the API issued at log-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap the raw token string issued by the API.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A client for the Cashlyzer REST API.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the API served at `base_url`, e.g. "https://api.cashlyzer.com/api".
    ///
    /// # Errors
    /// Returns [ApiError::Network] if the TLS backend cannot be initialised.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);

        match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Send a GET request and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::GET, path, Some(token))).await?;
        decode(response).await
    }

    /// Send a GET request, mapping a 404 response to `None`.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<Option<T>, ApiError> {
        match self.get(path, token).await {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::NotFound { .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Send a POST request with a JSON body.
    ///
    /// `token` is `None` for the auth endpoints that are called before the
    /// user has a session.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AuthToken>,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::POST, path, token).json(body)).await?;
        decode(response).await
    }

    /// Send a POST request without a body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::POST, path, Some(token))).await?;
        decode(response).await
    }

    /// Send a PUT request with a JSON body.
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::PUT, path, Some(token)).json(body)).await?;
        decode(response).await
    }

    /// Send a PATCH request without a body.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::PATCH, path, Some(token))).await?;
        decode(response).await
    }

    /// Send a DELETE request.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AuthToken,
    ) -> Result<T, ApiError> {
        let response = send(self.request(Method::DELETE, path, Some(token))).await?;
        decode(response).await
    }
}

/// Send the request and turn non-success status codes into errors.
async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = ApiError::from_status(status, &body);
    tracing::debug!("API responded with {status}: {body}");

    Err(error)
}

/// Decode a JSON response body. An empty body decodes as JSON `null`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    let body = if body.trim().is_empty() { "null" } else { &body };

    serde_json::from_str(body).map_err(|error| ApiError::Decode(error.to_string()))
}
