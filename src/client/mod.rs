//! HTTP client for the asset-monitor API.
//!
//! [`ApiClient`] wraps the JSON envelopes; [`ResourceCollection`] keeps a
//! paginated view of one collection in sync with the server.

mod resource;

pub use resource::{CollectionSnapshot, ResourceCollection};

use crate::handlers::common::{DataResponse, PaginatedResponse};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Thin JSON client bound to one server
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<String, ClientError> {
        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%method, path, status = status.as_u16(), "API response");

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    /// `GET path?page=..&per_page=..`
    #[instrument(skip(self))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedResponse<T>, ClientError> {
        let path = format!("{}?page={}&per_page={}", path, page, per_page);
        let text = self.send(Method::GET, &path, None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    #[instrument(skip(self, body))]
    pub async fn create<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        let text = self.send(Method::POST, path, Some(&body)).await?;
        let envelope: DataResponse<T> = serde_json::from_str(&text)?;
        Ok(envelope.data)
    }

    #[instrument(skip(self, body))]
    pub async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        id: i32,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        let text = self
            .send(Method::PUT, &format!("{}/{}", path, id), Some(&body))
            .await?;
        let envelope: DataResponse<T> = serde_json::from_str(&text)?;
        Ok(envelope.data)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str, id: i32) -> Result<(), ClientError> {
        self.send(Method::DELETE, &format!("{}/{}", path, id), None)
            .await?;
        Ok(())
    }
}
