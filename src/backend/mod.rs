//! Access to the question-answering backend.
//!
//! The backend is an external service; this crate only consumes it. Three
//! routes are used:
//!
//! - `GET /admin/stats` for the dashboard
//! - `POST /chat` for the chat widget
//! - `GET /data/<filename>` for cited documents
//!
//! Components depend on the [`Backend`] trait so tests can swap in a fake.

mod http;
mod types;

use axum::body::Bytes;
use futures::stream::BoxStream;
use url::Url;

pub use http::HttpBackend;
pub use types::{ChatReply, ChatRequest, RecentQuery, SourceReference, StatsPayload};

use crate::error::BackendResult;

/// A document fetched from `/data/<filename>`, streamed.
pub struct Document {
    /// Content type reported by the backend, if any.
    pub content_type: Option<String>,
    /// Body chunks.
    pub body: BoxStream<'static, BackendResult<Bytes>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// The backend operations the components need.
#[async_trait::async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// `GET /admin/stats`.
    async fn fetch_stats(&self) -> BackendResult<StatsPayload>;

    /// `POST /chat`.
    async fn send_chat(&self, request: &ChatRequest) -> BackendResult<ChatReply>;

    /// `GET /data/<filename>`.
    async fn fetch_document(&self, filename: &str) -> BackendResult<Document>;
}

/// Site-relative path of a cited document: `/data/<filename>`, with the
/// filename encoded as a single path segment.
pub fn document_path(filename: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return format!("/data/{filename}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push("data").push(filename);
    }
    url.path().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_path_plain() {
        assert_eq!(document_path("doc.PDF"), "/data/doc.PDF");
    }

    #[test]
    fn test_document_path_encodes_segment() {
        assert_eq!(document_path("time table.pdf"), "/data/time%20table.pdf");
        assert_eq!(document_path("a/b#c.pdf"), "/data/a%2Fb%23c.pdf");
    }
}
