use std::{sync::Arc, time::Duration};

use reqwest::{header::COOKIE, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    application::repositories::cookie_repository::CookieRepository,
    domain::models::anonymous_key::ANON_KEY_COOKIE_NAME,
    services::error::RemoteError,
};

const API_PREFIX: [&str; 2] = ["api", "v1"];
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the VK service API.
///
/// With a cookie jar attached, every request carries the anonymous key the
/// way a browser would send it to the service.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    cookies: Option<Arc<dyn CookieRepository>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, RemoteError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RemoteError::InternalError(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InternalError(format!(
                "Invalid API base URL: {}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            cookies: None,
        })
    }

    pub fn with_cookies(mut self, cookies: Arc<dyn CookieRepository>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/v1/{segments...}` with every segment percent-encoded, so
    /// ids containing `/` stay a single path parameter.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_PREFIX).extend(segments);
        }
        url
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!("{} {}", method, url);
        let request = self.client.request(method, url);
        match self.anonymous_key() {
            Some(key) => request.header(COOKIE, format!("{}={}", ANON_KEY_COOKIE_NAME, key)),
            None => request,
        }
    }

    fn anonymous_key(&self) -> Option<String> {
        let cookies = self.cookies.as_ref()?;
        cookies.get(ANON_KEY_COOKIE_NAME).unwrap_or_else(|e| {
            warn!("Sending request without anonymous key: {}", e);
            None
        })
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::from_status(status, &body))
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }

    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        self.send(request).await.map(|_| ())
    }

    pub async fn send_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>, RemoteError> {
        let bytes = self
            .send(request)
            .await?
            .bytes()
            .await
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
