//! Button markup with variants and sizes.

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Secondary action button.
    Secondary,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "bg-blue-500 hover:bg-blue-700 text-white",
            Self::Secondary => "bg-white text-gray-800 border border-gray-300 hover:bg-gray-100",
        }
    }
}

/// Button size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonSize {
    /// Medium button (default).
    #[default]
    Md,
    /// Icon-only button.
    Icon,
}

impl ButtonSize {
    /// Get CSS classes for this size.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Md => "py-2 px-4 text-sm",
            Self::Icon => "h-10 w-10",
        }
    }
}

/// Render a `<button>`.
///
/// `attrs` is inserted verbatim into the opening tag and `content` into the
/// body; escape anything user-supplied before passing it in.
pub fn button(variant: ButtonVariant, size: ButtonSize, attrs: &str, content: &str) -> String {
    let base_classes = "inline-flex items-center justify-center gap-2 rounded font-bold \
                        transition-colors focus-visible:outline-none focus-visible:ring-2 \
                        disabled:pointer-events-none disabled:opacity-50";

    format!(
        r#"<button class="{} {} {}" {}>{}</button>"#,
        base_classes,
        variant.classes(),
        size.classes(),
        attrs,
        content
    )
}
