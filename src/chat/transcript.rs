//! The append-only list of rendered chat entries.

use std::sync::{Arc, PoisonError, RwLock};

use crate::backend::{SourceReference, document_path};

/// A chat bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    /// `true` for the user's own text, `false` for backend answers.
    pub is_user: bool,
}

/// Affordance for opening a cited PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfPreview {
    pub filename: String,
    /// 1-based page to open at.
    pub page: u32,
    /// Site-relative document URL, `/data/<filename>`.
    pub url: String,
}

impl PdfPreview {
    /// Preview for `source`, if it cites a PDF. A missing page opens page 1.
    pub fn from_source(source: &SourceReference) -> Option<Self> {
        let filename = source.pdf_filename()?;
        Some(Self {
            filename: filename.to_string(),
            page: source.page.filter(|p| *p > 0).unwrap_or(1),
            url: document_path(filename),
        })
    }

    /// Document URL with the page fragment PDF viewers understand.
    pub fn deep_link(&self) -> String {
        format!("{}#page={}", self.url, self.page)
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    Message(ChatMessage),
    Preview(PdfPreview),
}

impl ChatEntry {
    /// A user bubble.
    pub fn user(text: impl Into<String>) -> Self {
        Self::Message(ChatMessage {
            text: text.into(),
            is_user: true,
        })
    }

    /// A backend bubble.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::Message(ChatMessage {
            text: text.into(),
            is_user: false,
        })
    }
}

/// Where the widget appends entries.
pub trait MessageSink: Send + Sync {
    /// Append `entry` at the end of the display.
    fn append(&self, entry: ChatEntry);
}

/// In-memory transcript. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Arc<RwLock<Vec<ChatEntry>>>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries, in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<ChatEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the message bubbles.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ChatEntry::Message(m) => Some(m),
                ChatEntry::Preview(_) => None,
            })
            .collect()
    }

    /// Only the previews.
    #[must_use]
    pub fn previews(&self) -> Vec<PdfPreview> {
        self.entries()
            .into_iter()
            .filter_map(|e| match e {
                ChatEntry::Preview(p) => Some(p),
                ChatEntry::Message(_) => None,
            })
            .collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for Transcript {
    fn append(&self, entry: ChatEntry) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_defaults_to_page_one() {
        let preview = PdfPreview::from_source(&SourceReference::new("rules.pdf", None)).unwrap();
        assert_eq!(preview.page, 1);
        assert_eq!(preview.deep_link(), "/data/rules.pdf#page=1");
    }

    #[test]
    fn test_preview_deep_link() {
        let preview = PdfPreview::from_source(&SourceReference::new("doc.PDF", Some(3))).unwrap();
        assert_eq!(preview.url, "/data/doc.PDF");
        assert_eq!(preview.deep_link(), "/data/doc.PDF#page=3");
    }

    #[test]
    fn test_no_preview_for_other_files() {
        assert!(PdfPreview::from_source(&SourceReference::new("list.csv", Some(2))).is_none());
        assert!(PdfPreview::from_source(&SourceReference::default()).is_none());
    }

    #[test]
    fn test_transcript_clones_share_entries() {
        let transcript = Transcript::new();
        let other = transcript.clone();
        other.append(ChatEntry::user("hi"));
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].text, "hi");
        assert!(transcript.messages()[0].is_user);
    }
}
