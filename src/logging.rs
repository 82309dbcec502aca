//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format and destination
//! come from the `[logging]` config table and CLI flags. Logging stays off
//! unless explicitly enabled so the results file and stdout stay quiet.

use crate::error::HashTreeError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    #[serde(default)]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, stdout, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (required when output is "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Output destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
    File,
}

/// Initialize the logging system. Does nothing when logging is disabled.
pub fn init_logging(config: &LoggingConfig) -> Result<(), HashTreeError> {
    if !config.enabled || config.level == "off" {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let json = parse_format(&config.format)?;
    let output = parse_output(&config.output)?;

    let writer = match output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
        Output::File => BoxMakeWriter::new(Mutex::new(open_log_file(config)?)),
    };
    let use_color = config.color && output != Output::File;

    let base_subscriber = Registry::default().with(filter);
    let result = if json {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| HashTreeError::Config(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, HashTreeError> {
    let log_file = config.file.as_ref().ok_or_else(|| {
        HashTreeError::Config("logging.file is required when output is 'file'".to_string())
    })?;

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HashTreeError::io(parent, e))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| HashTreeError::io(log_file, e))
}

/// Build the filter from the configured level plus per-module directives
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, HashTreeError> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| HashTreeError::Config(format!("Invalid log level {}: {}", config.level, e)))?;

    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| HashTreeError::Config(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Returns true for json, false for text.
fn parse_format(format: &str) -> Result<bool, HashTreeError> {
    match format {
        "json" => Ok(true),
        "text" => Ok(false),
        other => Err(HashTreeError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn parse_output(output: &str) -> Result<Output, HashTreeError> {
    match output {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        "file" => Ok(Output::File),
        other => Err(HashTreeError::Config(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            other
        ))),
    }
}
