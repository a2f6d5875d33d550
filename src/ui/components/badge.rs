//! Badge markup for small labels.

const BADGE_CLASSES: &str =
    "inline-flex items-center rounded-full px-2.5 py-0.5 text-xs font-semibold bg-gray-100 text-gray-700";

/// Render a muted badge around already-escaped `content`.
pub fn badge(content: &str) -> String {
    format!(r#"<span class="{BADGE_CLASSES}">{content}</span>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_wraps_content() {
        assert_eq!(
            badge("Page 3"),
            format!(r#"<span class="{BADGE_CLASSES}">Page 3</span>"#)
        );
    }
}
