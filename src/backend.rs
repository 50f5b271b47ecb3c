//! The search backend, seen from the session.
//!
//! The backend owns the index, ranking and highlighting; the session only
//! knows the `GET /api/episodes` contract. `SearchBackend` is the seam:
//! `HttpBackend` speaks the contract over HTTP, tests plug in the in-memory
//! `testing::CorpusBackend`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::SearchError;
use crate::request::RequestDescriptor;
use crate::types::ResultPage;

/// Something that can answer an episodes request.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<ResultPage, SearchError>;
}

#[async_trait]
impl<B: SearchBackend + ?Sized> SearchBackend for Arc<B> {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<ResultPage, SearchError> {
        (**self).fetch(request).await
    }
}

/// `GET {base_url}/api/episodes?...` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<ResultPage, SearchError> {
        let url = request.url(&self.base_url);
        debug!(%url, "GET episodes");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Backend {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| SearchError::Decode(e.to_string()))
    }
}
