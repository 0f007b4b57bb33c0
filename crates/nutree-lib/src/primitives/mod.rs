//! Shared types and errors
//!
//! Log settings that configure the tracing subscriber, the color choice
//! resolved from flags and environment, and the configuration/logger error
//! enums every layer reports through.

use clap::ValueEnum;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Stream the log subscriber writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[value(alias = "err")]
    Stderr,
    #[value(alias = "out")]
    Stdout,
}

/// Verbosity threshold, ordered from quietest to loudest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// `--log-level` count to level; anything past 4 is trace
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            4.. => LogLevel::Trace,
        }
    }

    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[value(alias = "txt", alias = "plain")]
    #[serde(alias = "txt", alias = "plain")]
    Text,
    Json,
    /// Multi-line `key: value` records
    #[value(alias = "yml")]
    #[serde(alias = "yml")]
    Yaml,
}

/// Color output intent before terminal detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Auto,
    #[value(alias = "yes", alias = "force")]
    Always,
    #[value(alias = "no", alias = "none")]
    Never,
}

impl ColorChoice {
    /// Whether ANSI colors should be emitted on stderr
    pub fn enabled(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// Logger configuration derived from application config
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    pub color: bool,
}

/// Application configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load environment file '{file}': {source}")]
    EnvFileError {
        file: String,
        source: dotenvy::Error,
    },

    #[error("Global configuration already initialized")]
    AlreadyInitialized,

    #[error("Failed to parse environment variables: {source}")]
    EnvironmentParsingFailed {
        #[from]
        source: envy::Error,
    },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Failed to parse configuration value '{value}': {reason}")]
    ParseError { value: String, reason: String },
}

/// Logger initialization and operation errors
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to initialize tracing subscriber: {reason}")]
    InitializationFailed { reason: String },

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

/// Case-insensitive match on a value name or any of its aliases
fn parse_value<T: ValueEnum>(raw: &str, what: &str) -> Result<T, ConfigError> {
    <T as ValueEnum>::from_str(raw.trim(), true).map_err(|_| ConfigError::ParseError {
        value: raw.to_string(),
        reason: format!("invalid {}", what),
    })
}

impl FromStr for LogOutput {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value(s, "log output stream")
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value(s, "log format")
    }
}

impl FromStr for ColorChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_value(s, "color choice")
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
