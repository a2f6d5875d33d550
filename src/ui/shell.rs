//! Page frame.

use super::components::sparkles_icon;

/// Which navigation entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Chat,
    Admin,
}

/// Wrap `content` in the full HTML document.
///
/// Scripts are served locally from `/static/vendor` so the pages work
/// without a CDN.
pub fn html_shell(title: &str, active: Nav, content: &str, scripts: &str) -> String {
    let link = |href: &str, label: &str, nav: Nav| {
        let state = if nav == active {
            "bg-blue-50 text-blue-700"
        } else {
            "text-gray-600 hover:text-gray-900 hover:bg-gray-100"
        };
        format!(r#"<a href="{href}" class="px-3 py-2 rounded-lg text-sm transition-colors {state}">{label}</a>"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - Query Desk</title>
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-gray-100 text-gray-900 antialiased">
    <header class="sticky top-0 z-50 w-full bg-white shadow-sm">
        <div class="container mx-auto flex h-14 items-center justify-between px-4 max-w-5xl">
            <a href="/" class="flex items-center gap-2 font-semibold">
                {logo}
                <span class="text-lg">Query Desk</span>
            </a>
            <nav class="flex items-center gap-1">
                {chat_link}
                {admin_link}
            </nav>
        </div>
    </header>
    <main id="app" class="container mx-auto px-4 py-6 max-w-5xl">
        {content}
    </main>
    {scripts}
</body>
</html>"#,
        logo = sparkles_icon("h-5 w-5 text-blue-600"),
        chat_link = link("/", "Chat", Nav::Chat),
        admin_link = link("/admin", "Admin", Nav::Admin),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_wraps_content() {
        let html = html_shell("Chat", Nav::Chat, "<p>body</p>", "");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Chat - Query Desk</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains(r#"href="/admin""#));
    }
}
