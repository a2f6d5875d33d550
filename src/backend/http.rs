//! reqwest-based [`Backend`] implementation.

use std::time::Duration;

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::{Backend, ChatReply, ChatRequest, Document, StatsPayload, document_path};
use crate::error::{BackendError, BackendResult};

/// HTTP client for the backend.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use query_desk::backend::{Backend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://127.0.0.1:8000", Duration::from_secs(60))?;
/// let stats = backend.fetch_stats().await?;
/// println!("{} queries", stats.total_queries);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the backend at `base_url`.
    ///
    /// `timeout` bounds each whole request, so a hung backend surfaces as an
    /// ordinary failure.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> BackendResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> BackendResult<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Routes are joined relative to the base, so keep any path prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> BackendResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn check_status(response: reqwest::Response) -> BackendResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn fetch_stats(&self) -> BackendResult<StatsPayload> {
        let url = self.url("/admin/stats")?;
        tracing::debug!(url = %url, "Fetching admin stats");
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn send_chat(&self, request: &ChatRequest) -> BackendResult<ChatReply> {
        let url = self.url("/chat")?;
        tracing::debug!(
            url = %url,
            session_id = %request.session_id,
            query_length = request.query.len(),
            "Sending chat query"
        );
        let response = self.http.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn fetch_document(&self, filename: &str) -> BackendResult<Document> {
        let url = self.url(&document_path(filename))?;
        let response = self.http.get(url).send().await?;
        let response = Self::check_status(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(BackendError::from))
            .boxed();

        Ok(Document { content_type, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let backend = HttpBackend::new("http://example.com/rag", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url().as_str(), "http://example.com/rag/");
        assert_eq!(
            backend.url("/admin/stats").unwrap().as_str(),
            "http://example.com/rag/admin/stats"
        );
    }

    #[test]
    fn test_document_url_is_encoded() {
        let backend = HttpBackend::new("http://example.com", Duration::from_secs(1)).unwrap();
        assert_eq!(
            backend.url(&document_path("a b.pdf")).unwrap().as_str(),
            "http://example.com/data/a%20b.pdf"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpBackend::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, BackendError::InvalidUrl(_)));
    }
}
