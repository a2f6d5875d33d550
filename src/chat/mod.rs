//! Chat widget.
//!
//! Sends user questions to the backend and appends the user's text, the
//! answer, and a preview for every cited PDF to a [`MessageSink`].
//!
//! # Flow
//!
//! 1. [`ChatWidget::submit`] trims the input. Blank input is ignored.
//!    Otherwise the user bubble is appended at once and a [`PendingReply`]
//!    is returned.
//! 2. [`PendingReply::resolve`] performs the request and appends the answer
//!    and previews, or [`FALLBACK_MESSAGE`] if anything went wrong.
//!
//! Requests are independent. Several may be in flight; each appends its
//! own reply whenever it resolves.

mod transcript;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub use transcript::{ChatEntry, ChatMessage, MessageSink, PdfPreview, Transcript};

use crate::backend::{Backend, ChatReply, ChatRequest};
use crate::error::{BackendError, BackendResult};
use crate::session::SessionId;

/// Shown in place of an answer when a request fails.
pub const FALLBACK_MESSAGE: &str = "Sorry, an error occurred.";

/// Whether the widget is waiting on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    AwaitingResponse,
}

/// The chat widget.
///
/// Cheap to clone; clones share the backend, sink and in-flight count.
#[derive(Clone)]
pub struct ChatWidget {
    backend: Arc<dyn Backend>,
    sink: Arc<dyn MessageSink>,
    session_id: SessionId,
    in_flight: Arc<AtomicUsize>,
    deadline: Option<Duration>,
}

impl std::fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("backend", &self.backend)
            .field("session_id", &self.session_id)
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl ChatWidget {
    /// Widget talking to `backend` as `session_id`, appending to `sink`.
    pub fn new(backend: Arc<dyn Backend>, session_id: SessionId, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            backend,
            sink,
            session_id,
            in_flight: Arc::new(AtomicUsize::new(0)),
            deadline: None,
        }
    }

    /// Give up on a reply after `deadline` and show the fallback instead.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Session this widget sends with every query.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Current state.
    pub fn state(&self) -> WidgetState {
        if self.in_flight.load(Ordering::SeqCst) == 0 {
            WidgetState::Idle
        } else {
            WidgetState::AwaitingResponse
        }
    }

    /// Submit the contents of `input`.
    ///
    /// Blank input is left untouched and yields `None`. Otherwise the user
    /// bubble is appended, `input` is cleared, and the returned reply must be
    /// resolved to issue the request.
    pub fn submit(&self, input: &mut String) -> Option<PendingReply> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();

        self.sink.append(ChatEntry::user(query.clone()));
        input.clear();

        Some(PendingReply {
            guard: InFlight::enter(&self.in_flight),
            widget: self.clone(),
            request: ChatRequest {
                query,
                session_id: self.session_id.to_string(),
            },
        })
    }

    /// Send an already-displayed `query` and append the reply.
    ///
    /// Used where the user bubble is drawn elsewhere (the HTML surface
    /// inserts it in the browser). Blank queries are ignored.
    pub async fn complete(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        let _guard = InFlight::enter(&self.in_flight);
        self.exchange(ChatRequest {
            query: query.to_string(),
            session_id: self.session_id.to_string(),
        })
        .await;
    }

    async fn send(&self, request: &ChatRequest) -> BackendResult<ChatReply> {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.backend.send_chat(request))
                .await
                .unwrap_or(Err(BackendError::Timeout(limit))),
            None => self.backend.send_chat(request).await,
        }
    }

    async fn exchange(&self, request: ChatRequest) {
        match self.send(&request).await {
            Ok(reply) => {
                tracing::info!(
                    name: "chat.reply.received",
                    session_id = %request.session_id,
                    sources = reply.sources.len(),
                    "Chat reply received"
                );
                self.sink.append(ChatEntry::bot(reply.answer));
                for preview in reply.sources.iter().filter_map(PdfPreview::from_source) {
                    self.sink.append(ChatEntry::Preview(preview));
                }
            }
            Err(e) => {
                tracing::error!(
                    name: "chat.request.failed",
                    session_id = %request.session_id,
                    error = %e,
                    "Chat request failed"
                );
                self.sink.append(ChatEntry::bot(FALLBACK_MESSAGE));
            }
        }
    }
}

/// A submitted query whose reply has not been appended yet.
#[derive(Debug)]
#[must_use = "the request is only sent when the reply is resolved"]
pub struct PendingReply {
    guard: InFlight,
    widget: ChatWidget,
    request: ChatRequest,
}

impl PendingReply {
    /// The request that will be sent.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Send the request and append the outcome. Never fails.
    pub async fn resolve(self) {
        let Self {
            guard,
            widget,
            request,
        } = self;
        widget.exchange(request).await;
        drop(guard);
    }
}

/// Counts an outstanding request for as long as it lives.
#[derive(Debug)]
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
