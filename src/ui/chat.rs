//! Chat page and reply fragments.
//!
//! The page posts the form to `/ui/chat` with HTMX and appends the returned
//! fragment to `#chat-container`. The user's bubble and the session id are
//! handled in the browser before the request leaves: the bubble is appended
//! immediately, and the id is kept in `localStorage` under `sessionId`.
//!
//! htmx collects form values before `htmx:beforeRequest`, so the id is
//! written into the hidden field on load and into the request parameters in
//! `htmx:configRequest`.

use super::components::{ButtonSize, ButtonVariant, button, send_icon};
use super::html_escape;
use super::preview::{self, PreviewStyle};
use super::shell::{Nav, html_shell};
use crate::chat::{ChatEntry, ChatMessage};

const USER_BUBBLE: &str = "p-3 rounded-lg max-w-xs bg-blue-500 text-white self-end ml-auto";
const BOT_BUBBLE: &str = "p-3 rounded-lg max-w-xs bg-white text-gray-800";

/// The full chat page.
pub fn page() -> String {
    let send = button(
        ButtonVariant::Primary,
        ButtonSize::Icon,
        r#"id="send-btn" type="submit" aria-label="Send""#,
        &send_icon("h-5 w-5"),
    );

    let content = format!(
        r##"<div class="flex flex-col h-[calc(100vh-8rem)] bg-gray-50 rounded-2xl shadow overflow-hidden">
    <div id="chat-container" class="flex-1 overflow-y-auto p-4 flex flex-col gap-2" aria-live="polite"></div>
    <form id="chat-form" class="flex gap-2 p-3 bg-white border-t border-gray-200"
          hx-post="/ui/chat"
          hx-target="#chat-container"
          hx-swap="beforeend scroll:bottom"
          hx-on::config-request="queryDesk.configure(event)"
          hx-on::before-request="queryDesk.beforeSend(event, this)"
          hx-on::after-request="queryDesk.afterSend(this)">
        <input type="hidden" name="session_id" value="">
        <input id="query-input" name="query" type="text" autocomplete="off"
               placeholder="Ask a question..."
               class="flex-1 px-4 py-2 rounded-lg border border-gray-300 focus:outline-none focus:ring-2 focus:ring-blue-500">
        {send}
    </form>
</div>"##
    );

    html_shell("Chat", Nav::Chat, &content, &client_script())
}

/// Browser glue: session id and the optimistic user bubble.
fn client_script() -> String {
    format!(
        r#"<script>
window.queryDesk = {{
    sessionId() {{
        let id = localStorage.getItem('sessionId');
        if (!id) {{
            id = Math.random().toString(36).substr(2, 9);
            localStorage.setItem('sessionId', id);
        }}
        return id;
    }},
    configure(event) {{
        event.detail.parameters.session_id = this.sessionId();
    }},
    beforeSend(event, form) {{
        const input = form.querySelector('[name=query]');
        const query = input.value.trim();
        if (!query) {{
            event.preventDefault();
            return;
        }}
        const bubble = document.createElement('div');
        bubble.className = '{USER_BUBBLE}';
        bubble.textContent = query;
        const container = document.getElementById('chat-container');
        container.appendChild(bubble);
        container.scrollTop = container.scrollHeight;
    }},
    afterSend(form) {{
        form.reset();
        form.querySelector('[name=session_id]').value = this.sessionId();
    }},
}};
document.querySelector('#chat-form [name=session_id]').value = queryDesk.sessionId();
</script>"#
    )
}

/// Render one chat bubble.
pub fn render_message(message: &ChatMessage) -> String {
    let class = if message.is_user { USER_BUBBLE } else { BOT_BUBBLE };
    format!(
        r#"<div class="chat-message {class}">{}</div>"#,
        html_escape(&message.text)
    )
}

/// Render transcript entries as the fragment appended to the chat container.
pub fn render_entries(entries: &[ChatEntry], style: PreviewStyle) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            ChatEntry::Message(message) => render_message(message),
            ChatEntry::Preview(p) => preview::render(p, style),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SourceReference;
    use crate::chat::PdfPreview;

    #[test]
    fn test_page_has_form_and_container() {
        let html = page();
        assert!(html.contains(r#"id="chat-container""#));
        assert!(html.contains(r#"hx-post="/ui/chat""#));
        assert!(html.contains(r#"name="session_id""#));
        assert!(html.contains("localStorage.getItem('sessionId')"));
        assert!(html.contains(r##"hx-target="#chat-container""##));
        assert!(html.contains("hx-swap=\"beforeend scroll:bottom\""));
    }

    #[test]
    fn test_session_id_is_set_before_values_are_collected() {
        let html = page();
        assert!(html.contains(r#"hx-on::config-request="queryDesk.configure(event)""#));
        assert!(html.contains("event.detail.parameters.session_id = this.sessionId();"));
        assert!(
            html.contains("document.querySelector('#chat-form [name=session_id]').value = queryDesk.sessionId();")
        );
        // before-request fires after htmx has read the form, too late for the id.
        let start = html.find("beforeSend(event, form)").unwrap();
        let end = html.find("afterSend(form)").unwrap();
        assert!(!html[start..end].contains("session_id"));
    }

    #[test]
    fn test_bot_message_is_escaped() {
        let html = render_message(&ChatMessage {
            text: "1 < 2 & <script>".into(),
            is_user: false,
        });
        assert!(html.contains("1 &lt; 2 &amp; &lt;script&gt;"));
        assert!(html.contains("bg-white"));
    }

    #[test]
    fn test_entries_render_in_order() {
        let entries = vec![
            ChatEntry::bot("42"),
            ChatEntry::Preview(
                PdfPreview::from_source(&SourceReference::new("doc.PDF", Some(3))).unwrap(),
            ),
        ];
        let html = render_entries(&entries, PreviewStyle::Button);
        let answer = html.find(">42<").unwrap();
        let preview = html.find("/data/doc.PDF#page=3").unwrap();
        assert!(answer < preview);
    }
}
