//! Server-rendered HTML for the two components.
//!
//! # Structure
//!
//! - [`shell`]: page frame shared by every page
//! - [`admin`]: the stats dashboard page
//! - [`chat`]: the chat page and the reply fragments returned to HTMX
//! - [`preview`]: the two PDF preview renderings
//! - [`components`]: small reusable fragments

pub mod admin;
pub mod chat;
pub mod components;
pub mod preview;
pub mod shell;

pub use preview::PreviewStyle;

/// Escape text for use in HTML content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
