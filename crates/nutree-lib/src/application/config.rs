//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::graph::WalkerConfig;
use crate::networking::{NetworkingConfig, RetryPolicy};
use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;

/// Default configuration values
pub mod defaults {
    pub const FEEDS: &str = "https://api.nuget.org/v3/index.json";
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const NET_TIMEOUT: &str = "30";
    pub const NET_RETRIES: &str = "3";
    pub const CPU_PARALLELS: &str = "8";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::defaults;
    use crate::primitives::{ColorChoice, LogFormat, LogOutput};

    pub fn feeds() -> Vec<String> {
        defaults::FEEDS.split(',').map(str::to_string).collect()
    }

    pub fn log_level() -> u8 {
        0
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn net_timeout() -> u64 {
        30
    }

    pub fn net_retries() -> u32 {
        3
    }

    pub fn cpu_parallels() -> usize {
        8
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> ColorChoice {
        ColorChoice::Auto
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Package feeds in lookup order (NuGet V3 index URLs or local folders)
    #[arg(
        long = "feed",
        env = "NUTREE_FEEDS",
        value_delimiter = ',',
        default_value = defaults::FEEDS
    )]
    #[serde(default = "default_fns::feeds")]
    pub feeds: Vec<String>,

    /// Number of concurrent feed lookups
    #[arg(short = 'j', long, env = "NUTREE_CPU_JOBS", default_value = defaults::CPU_PARALLELS)]
    #[serde(default = "default_fns::cpu_parallels")]
    pub cpu_jobs: usize,

    /// Feed call timeout in seconds
    #[arg(short, long, env = "NUTREE_NET_TIMEOUT", default_value = defaults::NET_TIMEOUT)]
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// Retries after a transient feed failure
    #[arg(long, env = "NUTREE_NET_RETRIES", default_value = defaults::NET_RETRIES)]
    #[serde(default = "default_fns::net_retries")]
    pub net_retries: u32,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "NUTREE_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Output format (text, json, yaml)
    #[arg(long, env = "NUTREE_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "NUTREE_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "NUTREE_COLOR", default_value = defaults::COLOR)]
    #[serde(default = "default_fns::color")]
    pub color: ColorChoice,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feeds: default_fns::feeds(),
            cpu_jobs: default_fns::cpu_parallels(),
            net_timeout: default_fns::net_timeout(),
            net_retries: default_fns::net_retries(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
        }
    }
}

impl AppConfig {
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            color: self.color.enabled(),
        }
    }

    pub fn networking_config(&self) -> NetworkingConfig {
        NetworkingConfig {
            max_concurrent_requests: self.cpu_jobs,
            timeout_seconds: self.net_timeout,
            ..NetworkingConfig::default()
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.net_retries)
    }

    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            max_concurrent: self.cpu_jobs,
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if other.feeds != default_fns::feeds() {
            self.feeds = other.feeds;
        }

        // For primitive fields, take other if it's not the default
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }
        if other.net_retries != default_fns::net_retries() {
            self.net_retries = other.net_retries;
        }
        if other.cpu_jobs != default_fns::cpu_parallels() {
            self.cpu_jobs = other.cpu_jobs;
        }

        // For enums, detect if it's non-default
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorChoice::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.feeds = self
            .feeds
            .iter()
            .map(|feed| feed.trim().to_string())
            .filter(|feed| !feed.is_empty())
            .collect();

        if self.feeds.is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "at least one feed is required".to_string(),
            });
        }
        if self.cpu_jobs == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "cpu jobs must be at least 1".to_string(),
            });
        }
        if self.net_timeout == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "network timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
