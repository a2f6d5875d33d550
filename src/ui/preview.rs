//! PDF preview affordances.
//!
//! Two renderings exist: a plain "Open <file>" button, and an inline card
//! with a header, actions and an embedded viewer. [`PreviewStyle`] picks one.

use serde::Deserialize;

use super::components::{
    ButtonSize, ButtonVariant, badge, button, download_icon, external_link_icon,
    file_icon,
};
use super::html_escape;
use crate::chat::PdfPreview;

/// How cited PDFs are shown in the chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStyle {
    /// A button that opens the document in a new tab.
    #[default]
    Button,
    /// A card embedding the document in an iframe.
    Inline,
}

/// Render `preview` in the given style.
pub fn render(preview: &PdfPreview, style: PreviewStyle) -> String {
    match style {
        PreviewStyle::Button => render_button(preview),
        PreviewStyle::Inline => render_inline(preview),
    }
}

fn render_button(preview: &PdfPreview) -> String {
    let link = html_escape(&preview.deep_link());
    let attrs = format!(
        r#"type="button" data-href="{link}" onclick="window.open(this.dataset.href, '_blank')""#
    );
    format!(
        r#"<div class="pdf-preview my-2">{}</div>"#,
        button(
            ButtonVariant::Secondary,
            ButtonSize::Md,
            &attrs,
            &format!("Open {}", html_escape(&preview.filename)),
        )
    )
}

fn render_inline(preview: &PdfPreview) -> String {
    let name = html_escape(&preview.filename);
    let link = html_escape(&preview.deep_link());
    let url = html_escape(&preview.url);
    let page = badge(&format!("Page {}", preview.page));
    let action = "inline-flex items-center gap-1 px-3 py-1 rounded text-xs text-blue-700 hover:bg-blue-50";

    format!(
        r#"<div class="pdf-preview my-2 rounded-xl border border-gray-200 bg-white shadow-sm overflow-hidden max-w-md">
    <div class="flex items-center justify-between px-3 py-2 bg-gray-50 border-b border-gray-200">
        <div class="flex items-center gap-2 min-w-0">{icon}<span class="truncate text-sm font-medium">{name}</span></div>
        {page}
    </div>
    <div class="flex gap-2 px-3 py-2">
        <a class="{action}" href="{link}" target="_blank" rel="noopener">{open_icon}Open in new tab</a>
        <a class="{action}" href="{url}" download="{name}">{download_icon}Download</a>
    </div>
    <iframe src="{link}" title="{name}" class="w-full h-96 border-0" loading="lazy"></iframe>
</div>"#,
        icon = file_icon("text-red-600 shrink-0"),
        open_icon = external_link_icon(""),
        download_icon = download_icon(""),
    )
}
