//! Query Desk
//!
//! Presentation tier for a document question-answering backend: an admin
//! stats dashboard and a chat widget with PDF source previews, served as
//! HTML pages or used from the terminal.
//!
//! # Architecture
//!
//! - **Backend**: typed HTTP client for the external `/chat`, `/admin/stats`
//!   and `/data/<file>` routes
//! - **Components**: the dashboard and the chat widget, independent of how
//!   they are displayed
//! - **Surfaces**: Axum + HTMX pages, and a terminal renderer
//!
//! # Modules
//!
//! - [`backend`]: backend trait, HTTP implementation and wire types
//! - [`admin`]: admin stats viewer
//! - [`chat`]: chat widget and transcript
//! - [`session`]: persisted session identifier
//! - [`storage`]: client-local key-value storage
//! - [`ui`]: HTML rendering
//! - [`terminal`]: text rendering and the interactive chat loop
//! - [`server`]: HTTP routes

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::format_push_string)]

pub mod admin;
pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod server;
pub mod session;
pub mod storage;
pub mod terminal;
pub mod ui;

use crate::backend::Backend;
use crate::config::AppConfig;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backend the pages are rendered from.
    pub backend: Arc<dyn Backend>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
