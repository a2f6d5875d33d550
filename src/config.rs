use crate::ui::PreviewStyle;
use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when no config file is given.
const CWD_CONFIG: &str = "query-desk.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Backend base URL
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Client storage file (holds the chat session id)
    #[arg(long)]
    pub storage: Option<PathBuf>,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: Option<bool>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Serve the chat and admin pages (default)
    #[default]
    Serve,
    /// Print the admin stats once
    Stats,
    /// Chat with the backend from the terminal
    Chat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub request_timeout_secs: u64,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub preview_style: PreviewStyle,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    /// Load from the process arguments.
    ///
    /// `--help`, `--version` and usage errors are printed by clap, which then
    /// exits with its own status code.
    pub fn load() -> Result<(Self, Command), config::ConfigError> {
        Self::from_cli(Cli::parse())
    }

    /// Resolve configuration from `args`.
    ///
    /// Priority: CLI flag > CLI env var > `QDESK_` env var > config file >
    /// defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<(Self, Command), config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(cli)
    }

    fn from_cli(cli: Cli) -> Result<(Self, Command), config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.request_timeout_secs", 90)?
            .set_default("server.static_dir", "static")?
            .set_default("backend.base_url", "http://127.0.0.1:8000")?
            .set_default("backend.timeout_secs", 60)?
            .set_default("chat.preview_style", "button")?
            .set_default("logging.json", false)?;

        // Explicit file must exist; the working-directory fallback is optional.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        } else if Path::new(CWD_CONFIG).exists() {
            builder = builder.add_source(File::with_name(CWD_CONFIG).required(false));
        }

        // E.g. QDESK_SERVER__PORT=8080, QDESK_CHAT__PREVIEW_STYLE=inline
        builder = builder.add_source(
            Environment::with_prefix("QDESK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = &cli.backend_url {
            builder = builder.set_override("backend.base_url", url.as_str())?;
        }
        if let Some(path) = &cli.storage {
            builder = builder.set_override("storage.path", path.to_string_lossy().as_ref())?;
        }
        if let Some(json) = cli.json_logs {
            builder = builder.set_override("logging.json", json)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok((cfg, cli.command.unwrap_or_default()))
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "backend.base_url cannot be empty".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "server.request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
