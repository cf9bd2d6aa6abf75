use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use playlist_mcp_server::config::{
    AppConfig, CliConfig, FileConfig, Transport, DEFAULT_DATASET_PATH, DEFAULT_PORT,
};
use playlist_mcp_server::mcp::stdio::serve_stdio;
use playlist_mcp_server::server::ServerConfig;
use playlist_mcp_server::{create_mcp_state, run_server, Dataset, PlaylistEngine, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[clap(version, about = "Song recommendation MCP server")]
struct CliArgs {
    /// Path to the CSV track dataset.
    #[clap(value_parser = parse_path, default_value = DEFAULT_DATASET_PATH)]
    pub dataset: PathBuf,

    /// How MCP clients connect.
    #[clap(long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// The port to listen on (websocket transport).
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each HTTP request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            dataset_path: self.dataset.clone(),
            transport: self.transport,
            port: self.port,
            logging_level: self.logging_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // stdout carries the stdio transport, so logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let engine = Arc::new(PlaylistEngine::new(Dataset::load(&config.dataset_path)));
    let mcp_state = Arc::new(create_mcp_state(engine, config.rate_limit.clone()));

    match config.transport {
        Transport::Stdio => {
            info!("Serving MCP over stdio");
            serve_stdio(mcp_state)
                .await
                .context("stdio transport failed")?;
        }
        Transport::Websocket => {
            let server_config = ServerConfig {
                requests_logging_level: config.logging_level.clone(),
                port: config.port,
            };
            run_server(server_config, mcp_state).await?;
        }
    }

    Ok(())
}
