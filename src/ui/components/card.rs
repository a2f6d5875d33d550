//! Card container markup.

/// Card wrapping already-rendered `body`.
pub fn card(class: &str, body: &str) -> String {
    format!(r#"<div class="rounded-xl border border-gray-200 bg-white shadow-sm {class}">{body}</div>"#)
}

/// Card with a heading row above `body`.
pub fn titled_card(title: &str, body: &str) -> String {
    card(
        "p-4",
        &format!(r#"<h2 class="text-lg font-semibold mb-3">{title}</h2>{body}"#),
    )
}

/// Counter tile: a label and a big number with a stable element id.
pub fn stat_card(label: &str, id: &str, value: &str) -> String {
    card(
        "p-4 text-center",
        &format!(
            r#"<p class="text-sm text-gray-500">{label}</p><p id="{id}" class="text-3xl font-bold">{value}</p>"#
        ),
    )
}
