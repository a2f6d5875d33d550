//! Terminal rendering of the dashboard and the chat widget.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use url::Url;

use crate::admin::Dashboard;
use crate::chat::{ChatEntry, ChatWidget, MessageSink};

/// Plain-text dashboard.
pub fn render_stats(dashboard: &Dashboard) -> String {
    let Some(view) = dashboard.view() else {
        return "Stats unavailable.\n".to_string();
    };

    let mut out = format!(
        "Total queries: {}\nSuccessful:    {}\nFailed:        {}\n",
        view.total, view.successful, view.failed
    );

    out.push_str("\nRecent queries:\n");
    for item in &view.recent {
        out.push_str(&format!("  Q: {}\n  A: {}\n", item.query, item.summary));
    }

    out.push_str("\nFailed questions:\n");
    for q in &view.failed_questions {
        out.push_str(&format!("  - {q}\n"));
    }

    out.push_str("\nQueries per day:\n");
    let peak = view.chart.values().iter().copied().max().unwrap_or(0).max(1);
    for (date, count) in view.chart.labels().iter().zip(view.chart.values()) {
        let width = usize::try_from(u128::from(*count) * 40 / u128::from(peak)).unwrap_or(40);
        out.push_str(&format!("  {date} {:<40} {count}\n", "#".repeat(width)));
    }
    out
}

/// Prints chat entries as they are appended.
pub struct TerminalSink {
    out: Mutex<Box<dyn Write + Send>>,
    backend_url: Url,
    echo_user: bool,
}

impl std::fmt::Debug for TerminalSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSink")
            .field("backend_url", &self.backend_url)
            .field("echo_user", &self.echo_user)
            .finish_non_exhaustive()
    }
}

impl TerminalSink {
    /// Sink writing to `out`. Preview links are made absolute against
    /// `backend_url`. User bubbles are only printed when `echo_user` is set,
    /// since an interactive terminal already shows what was typed.
    pub fn new(out: impl Write + Send + 'static, backend_url: Url, echo_user: bool) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            backend_url,
            echo_user,
        }
    }

    fn format(&self, entry: &ChatEntry) -> Option<String> {
        match entry {
            ChatEntry::Message(m) if m.is_user => self.echo_user.then(|| format!("you> {}", m.text)),
            ChatEntry::Message(m) => Some(format!("bot> {}", m.text)),
            ChatEntry::Preview(p) => {
                let link = p.deep_link();
                let link = self
                    .backend_url
                    .join(link.trim_start_matches('/'))
                    .map_or(link, |u| u.to_string());
                Some(format!("     [pdf] Open {}: {link}", p.filename))
            }
        }
    }
}

impl MessageSink for TerminalSink {
    fn append(&self, entry: ChatEntry) {
        let Some(line) = self.format(&entry) else {
            return;
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "Failed to write chat output");
        }
    }
}

/// Read queries line by line and submit each one.
///
/// Every submission runs as its own task, so replies print as they arrive
/// rather than in submission order. Returns once input ends and every
/// outstanding reply has been appended.
pub async fn run_chat<R>(widget: &ChatWidget, input: R) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut pending = JoinSet::new();

    while let Some(mut line) = lines.next_line().await? {
        if let Some(reply) = widget.submit(&mut line) {
            pending.spawn(reply.resolve());
        }
        reap_finished(&mut pending);
    }

    while let Some(result) = pending.join_next().await {
        log_task_failure(result);
    }
    Ok(())
}

/// Drop handles of replies that already resolved.
fn reap_finished(pending: &mut JoinSet<()>) {
    while let Some(result) = pending.try_join_next() {
        log_task_failure(result);
    }
}

fn log_task_failure(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Chat task failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::StatsView;
    use crate::backend::{RecentQuery, SourceReference, StatsPayload};
    use crate::chat::PdfPreview;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_render_stats() {
        let view = StatsView::from_payload(StatsPayload {
            total_queries: 2,
            successful: 1,
            failed: 1,
            recent_queries: vec![RecentQuery {
                query: "When?".into(),
                summary: "Now".into(),
            }],
            failed_questions: vec!["Why?".into()],
            daily_stats: [("2024-01-02".to_string(), 2)].into_iter().collect(),
        });
        let text = render_stats(&Dashboard::Loaded(view));
        assert!(text.contains("Total queries: 2"));
        assert!(text.contains("  Q: When?\n  A: Now"));
        assert!(text.contains("  - Why?"));
        assert!(text.contains("2024-01-02"));
    }

    #[test]
    fn test_render_stats_with_huge_counts() {
        let view = StatsView::from_payload(StatsPayload {
            daily_stats: [
                ("2024-01-01".to_string(), u64::MAX),
                ("2024-01-02".to_string(), u64::MAX / 2),
            ]
            .into_iter()
            .collect(),
            ..StatsPayload::default()
        });
        let text = render_stats(&Dashboard::Loaded(view));
        assert!(text.contains(&format!("2024-01-01 {} {}", "#".repeat(40), u64::MAX)));
    }

    #[tokio::test]
    async fn test_finished_replies_are_reaped() {
        let mut pending = JoinSet::new();
        for _ in 0..3 {
            pending.spawn(async {});
        }
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        reap_finished(&mut pending);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_render_unavailable() {
        assert_eq!(render_stats(&Dashboard::Unavailable), "Stats unavailable.\n");
    }

    #[test]
    fn test_sink_output() {
        let buf = SharedBuf::default();
        let sink = TerminalSink::new(
            buf.clone(),
            Url::parse("http://backend:8000/").unwrap(),
            false,
        );
        sink.append(ChatEntry::user("hello"));
        sink.append(ChatEntry::bot("42"));
        sink.append(ChatEntry::Preview(
            PdfPreview::from_source(&SourceReference::new("doc.PDF", Some(3))).unwrap(),
        ));

        let text = buf.text();
        assert!(!text.contains("you> hello"));
        assert!(text.contains("bot> 42\n"));
        assert!(text.contains("Open doc.PDF: http://backend:8000/data/doc.PDF#page=3"));
    }

    #[test]
    fn test_sink_echoes_user_when_asked() {
        let buf = SharedBuf::default();
        let sink = TerminalSink::new(buf.clone(), Url::parse("http://b/").unwrap(), true);
        sink.append(ChatEntry::user("hello"));
        assert_eq!(buf.text(), "you> hello\n");
    }
}
