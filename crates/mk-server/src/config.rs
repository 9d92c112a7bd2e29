use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use mk_exec::ExecutorConfig;
use mk_observe::{LoggerConfig, LoggerFormat};

/// Command-line flags; each one also reads a `MAKE_MCP_*` environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "mcp-server-make", version, about = "MCP server that runs make targets")]
pub struct Args {
    /// Path to make executable
    #[arg(long = "make-path", env = "MAKE_MCP_MAKE_PATH", default_value = "make")]
    pub make_path: PathBuf,

    /// Working directory for make execution
    #[arg(long, env = "MAKE_MCP_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,

    /// Timeout for make execution in seconds
    #[arg(
        long,
        env = "MAKE_MCP_TIMEOUT",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Maximum number of concurrent make executions
    #[arg(
        long = "max-concurrent",
        env = "MAKE_MCP_MAX_CONCURRENT",
        default_value_t = 4,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_concurrent: u64,

    /// Enable debug logging
    #[arg(long, env = "MAKE_MCP_DEBUG")]
    pub debug: bool,

    /// Log format: text, json or journald
    #[arg(long = "log-format", env = "MAKE_MCP_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Serve the HTTP API (health + make) on this address
    #[arg(long = "http-addr", env = "MAKE_MCP_HTTP_ADDR")]
    pub http_addr: Option<SocketAddr>,
}

impl Args {
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::default()
            .with_program(&self.make_path)
            .with_workdir(&self.workdir)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_concurrent(self.max_concurrent as usize)
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            ..Default::default()
        }
        .with_debug(self.debug)
    }
}
