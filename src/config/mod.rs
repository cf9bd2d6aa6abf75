mod file_config;

pub use file_config::{FileConfig, RateLimitFileConfig};

use crate::mcp::RateLimitConfig;
use crate::server::RequestsLoggingLevel;
use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_DATASET_PATH: &str = "spotify_songs.csv";
pub const DEFAULT_PORT: u16 = 3002;

/// How MCP messages reach the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// WebSocket endpoint at /v1/mcp
    Websocket,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub dataset_path: PathBuf,
    pub transport: Transport,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            transport: Transport::default(),
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub transport: Transport,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present. A missing dataset file
    /// is not an error here: loading degrades to an empty dataset.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let dataset_path = file
            .dataset_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.dataset_path.clone());

        let transport = match file.transport {
            Some(s) => Transport::from_str(&s, true)
                .map_err(|_| anyhow!("Invalid transport in config file: {}", s))?,
            None => cli.transport,
        };

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow!("Invalid logging_level in config file: {}", s))?,
            None => cli.logging_level.clone(),
        };

        let defaults = RateLimitConfig::default();
        let rate_file = file.rate_limit.unwrap_or_default();
        let rate_limit = RateLimitConfig {
            lookup_per_minute: rate_file
                .lookup_per_minute
                .unwrap_or(defaults.lookup_per_minute),
            generate_per_minute: rate_file
                .generate_per_minute
                .unwrap_or(defaults.generate_per_minute),
        };

        Ok(Self {
            dataset_path,
            transport,
            port,
            logging_level,
            rate_limit,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
