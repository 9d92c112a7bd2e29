use std::io::IsTerminal;

use crate::logger::format::LoggerFormat;

/// Logger settings.
///
/// Output always goes to stderr; stdout is reserved for the MCP transport.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `mk_api=debug,info`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    /// `debug` when `debug` is set, `info` otherwise.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.level = if debug { "debug" } else { "info" }.to_string();
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stderr().is_terminal();
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color,
        }
    }
}
