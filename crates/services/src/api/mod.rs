//! HTTP client for the quiz platform API.
//!
//! The server speaks snake_case JSON; responses are mapped into `quiz_core`
//! types here so nothing above this module sees wire shapes.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

mod content;
mod detail;
mod quiz;
mod users;
mod wire;

pub use users::LoginResponse;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: Url::parse(base_url.trim())?,
            timeout,
        })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn base(&self) -> &str {
        self.config.base_url.as_str().trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base(), path.trim_start_matches('/'))
    }

    /// Public prefix under which uploaded files are served.
    fn files_base(&self) -> String {
        self.url("uploads")
    }

    /// Send a request and turn non-2xx answers into `ApiError::HttpStatus`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::HttpStatus {
            status,
            message: detail::error_message(status, &body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(ApiConfig::new(base, ApiConfig::DEFAULT_TIMEOUT).unwrap()).unwrap()
    }

    #[test]
    fn urls_join_without_double_slashes() {
        assert_eq!(client("http://localhost:8000").url("/quizzes"), "http://localhost:8000/quizzes");
        assert_eq!(client("http://host/api/").url("users/3"), "http://host/api/users/3");
        assert_eq!(client("http://host/api").files_base(), "http://host/api/uploads");
    }

    #[test]
    fn relative_base_is_rejected() {
        let err = ApiConfig::new("/api", ApiConfig::DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
