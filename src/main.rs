//! Query Desk
//!
//! Entry point: serves the chat and admin pages, or runs either component
//! in the terminal.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use query_desk::admin::AdminDashboard;
use query_desk::backend::HttpBackend;
use query_desk::chat::ChatWidget;
use query_desk::config::{AppConfig, Command};
use query_desk::session::SessionId;
use query_desk::storage::FileStore;
use query_desk::{server, terminal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let (config, command) = match AppConfig::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.json, command);

    match command {
        Command::Serve => server::start_server(Arc::new(config)).await,
        Command::Stats => {
            let backend = backend(&config)?;
            let dashboard = AdminDashboard::load(&backend).await;
            print!("{}", terminal::render_stats(&dashboard));
            Ok(())
        }
        Command::Chat => {
            let store = FileStore::at_default_location(config.storage.path.as_deref());
            let session_id = SessionId::load_or_create(&store)?;
            let backend = backend(&config)?;

            let sink = terminal::TerminalSink::new(
                std::io::stdout(),
                backend.base_url().clone(),
                !std::io::stdin().is_terminal(),
            );
            let widget = ChatWidget::new(Arc::new(backend), session_id, Arc::new(sink));

            eprintln!(
                "Session {}. Type a question and press Enter (Ctrl-D to quit).",
                widget.session_id()
            );
            terminal::run_chat(&widget, BufReader::new(tokio::io::stdin())).await
        }
    }
}

fn backend(config: &AppConfig) -> anyhow::Result<HttpBackend> {
    Ok(HttpBackend::new(
        &config.backend.base_url,
        Duration::from_secs(config.backend.timeout_secs),
    )?)
}

/// Initialize tracing (M-LOG-STRUCTURED). Logs go to stderr so terminal
/// output stays clean.
fn init_tracing(json: bool, command: Command) {
    let default_level = match command {
        Command::Serve => "info",
        Command::Stats | Command::Chat => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer =
        (!json).then(|| fmt::layer().with_target(true).with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
