pub mod auth;
pub mod directory;
pub mod groups;

use crate::config::DEFAULT_GRAPH_ENDPOINT;
use crate::error::{GroupctlError, Result};
use auth::AccessToken;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

pub const GRAPH_API_BASE: &str = DEFAULT_GRAPH_ENDPOINT;

/// Graph API client bound to one access token
pub struct GraphClient {
    client: Client,
    access_token: AccessToken,
    base_url: String,
}

impl GraphClient {
    /// Client for a Graph endpoint such as [`GRAPH_API_BASE`]
    pub fn with_base_url(access_token: AccessToken, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a request for `endpoint`, relative to the client's base URL
    pub fn request(&self, endpoint: &str) -> GraphRequest<'_> {
        GraphRequest {
            client: self,
            url: format!("{}/{}", self.base_url, endpoint.trim_start_matches('/')),
        }
    }
}

/// A single Graph request. The URL is fixed when the request is built, so
/// `url()` always reports what is (or was) sent.
pub struct GraphRequest<'a> {
    client: &'a GraphClient,
    url: String,
}

/// One page of a Graph collection
#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl<'a> GraphRequest<'a> {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET a single entity
    pub async fn get<T: for<'de> Deserialize<'de>>(&self) -> Result<T> {
        let resp = self.send(Method::GET, None::<&()>).await?;
        Ok(resp.json::<T>().await?)
    }

    /// GET the first page of a collection. Further pages are not fetched.
    pub async fn get_first_page<T: for<'de> Deserialize<'de>>(&self) -> Result<Vec<T>> {
        let page: PaginatedResponse<T> = self.get().await?;
        if let Some(next) = &page.next_link {
            tracing::debug!(
                "{} returned {} items and more are available at {}",
                self.url,
                page.value.len(),
                next
            );
        }
        Ok(page.value)
    }

    /// POST a JSON body and decode the created entity
    pub async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(&self, body: &T) -> Result<R> {
        let resp = self.send(Method::POST, Some(body)).await?;
        Ok(resp.json::<R>().await?)
    }

    /// PUT (upsert) a JSON body and decode the resulting entity
    pub async fn put<T: Serialize, R: for<'de> Deserialize<'de>>(&self, body: &T) -> Result<R> {
        let resp = self.send(Method::PUT, Some(body)).await?;
        Ok(resp.json::<R>().await?)
    }

    async fn send<T: Serialize>(&self, method: Method, body: Option<&T>) -> Result<reqwest::Response> {
        if self.client.access_token.is_expired() {
            return Err(GroupctlError::AuthError(format!(
                "Access token expired at {}. Sign in again.",
                self.client.access_token.expires_at
            )));
        }

        tracing::debug!("{} {}", method, self.url);

        let mut request = self
            .client
            .client
            .request(method, &self.url)
            .bearer_auth(self.client.access_token.secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        tracing::debug!("{} -> {}", self.url, status);

        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let enhanced_error = crate::error::enhance_graph_error(&error_text);
            return Err(GroupctlError::GraphApiError(format!(
                "HTTP {}: {}",
                status, enhanced_error
            )));
        }

        Ok(resp)
    }
}
