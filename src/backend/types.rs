//! Wire types exchanged with the backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question, already trimmed.
    pub query: String,
    /// Opaque session identifier generated on the client.
    pub session_id: String,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Answer text shown to the user.
    pub answer: String,
    /// Documents the backend cites for the answer.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<SourceReference>,
    /// Short summary the backend keeps for its own history. Not displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Pointer to a document that supports an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    /// File name under the backend's `/data/` route. The backend sends `null`
    /// for chunks without file metadata; anything but a string is dropped.
    #[serde(default, deserialize_with = "lenient_filename")]
    pub filename: Option<String>,
    /// 1-based page number. Values that are not a positive whole number
    /// (`3.5`, `-1`, `"three"`) are dropped rather than failing the reply.
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<u32>,
}

impl SourceReference {
    /// Reference to `filename`, optionally at `page`.
    pub fn new(filename: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            filename: Some(filename.into()),
            page,
        }
    }

    /// The filename when it names a PDF (extension compared case-insensitively).
    pub fn pdf_filename(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .filter(|name| name.to_lowercase().ends_with(".pdf"))
    }
}

/// Aggregate statistics from `GET /admin/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsPayload {
    #[serde(default)]
    pub total_queries: u64,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub failed: u64,
    /// Most recent exchanges, oldest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recent_queries: Vec<RecentQuery>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub failed_questions: Vec<String>,
    /// Query count per day, keyed by `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub daily_stats: BTreeMap<String, u64>,
}

/// One entry of `recent_queries`.
///
/// The backend sends its whole history record (answer, timestamp, sources
/// and so on); only the two displayed fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub summary: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_filename<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => Some(name),
        _ => None,
    })
}

#[allow(clippy::cast_sign_loss)]
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let page = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(page
        .and_then(|p| u32::try_from(p).ok())
        .filter(|&p| p > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_reply_without_sources() {
        let reply: ChatReply = serde_json::from_str(r#"{"answer":"hi"}"#).unwrap();
        assert_eq!(reply.answer, "hi");
        assert!(reply.sources.is_empty());

        let reply: ChatReply = serde_json::from_str(r#"{"answer":"hi","sources":null}"#).unwrap();
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn test_source_with_null_filename() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"answer":"a","sources":[{"filename":null,"page":null},{"filename":"x.pdf"}],"summary":"s"}"#,
        )
        .unwrap();
        assert_eq!(reply.sources.len(), 2);
        assert_eq!(reply.sources[0].pdf_filename(), None);
        assert_eq!(reply.sources[1].pdf_filename(), Some("x.pdf"));
        assert_eq!(reply.sources[1].page, None);
        assert_eq!(reply.summary.as_deref(), Some("s"));
    }

    #[test]
    fn test_odd_page_values_do_not_fail_the_reply() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"answer":"42","sources":[
                {"filename":"a.pdf","page":3.0},
                {"filename":"b.pdf","page":-2},
                {"filename":"c.pdf","page":"7"},
                {"filename":"d.pdf","page":2.5},
                {"filename":"e.pdf","page":0},
                {"filename":"f.pdf","page":{"n":1}},
                {"filename":12,"page":1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(reply.answer, "42");
        let pages: Vec<_> = reply.sources.iter().map(|s| s.page).collect();
        assert_eq!(
            pages,
            [Some(3), None, Some(7), None, None, None, Some(1)]
        );
        assert_eq!(reply.sources[6].filename, None);
    }

    #[test]
    fn test_pdf_extension_is_case_insensitive() {
        assert!(SourceReference::new("doc.PDF", None).pdf_filename().is_some());
        assert!(SourceReference::new("Doc.Pdf", None).pdf_filename().is_some());
        assert!(SourceReference::new("notes.txt", None).pdf_filename().is_none());
        assert!(SourceReference::new("pdf", None).pdf_filename().is_none());
    }

    #[test]
    fn test_stats_payload_ignores_history_fields() {
        let json = r#"{
            "total_queries": 3,
            "successful": 2,
            "failed": 1,
            "recent_queries": [
                {"query": "q1", "answer": "a1", "session_id": "s", "timestamp": "2024-05-01T10:00:00",
                 "sources": [], "summary": "sum1", "failed": false}
            ],
            "failed_questions": ["q3"],
            "daily_stats": {"2024-05-02": 1, "2024-05-01": 2}
        }"#;
        let stats: StatsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_queries, 3);
        assert_eq!(stats.recent_queries[0].summary, "sum1");
        assert_eq!(stats.failed_questions, vec!["q3".to_string()]);
        assert_eq!(stats.daily_stats.len(), 2);
    }

    #[test]
    fn test_stats_payload_missing_fields_default() {
        let stats: StatsPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(stats, StatsPayload::default());
    }
}
