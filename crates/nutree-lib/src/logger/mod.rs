use crate::primitives::*;
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Global logger instance - ensures single initialization
static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Crates whose output is capped at `warn` unless `RUST_LOG` says otherwise
const NOISY_DEPENDENCIES: &[&str] = &["hyper_util", "reqwest", "h2", "tower", "tokio", "mio", "want"];

/// Logger implementation using tracing with indicatif progress integration
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

/// Default filter: nutree at `level`, noisy dependencies at warn
pub fn default_filter(level: LogLevel) -> String {
    let level = level.as_filter_str();
    let mut directives = vec![format!("nutree={}", level)];
    directives.extend(NOISY_DEPENDENCIES.iter().map(|name| format!("{}=warn", name)));
    directives.push(level.to_string());
    directives.join(",")
}

fn format_layer<S, W>(writer: W, format: LogFormat, color: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    match format {
        LogFormat::Text => fmt::layer()
            .with_writer(writer)
            .with_ansi(color)
            .compact()
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .boxed(),
        LogFormat::Yaml => fmt::layer()
            .with_writer(writer)
            .with_ansi(color)
            .pretty()
            .boxed(),
    }
}

impl Logger {
    /// Initialize the global logger
    pub fn init(config: LoggerConfig) -> Result<&'static Self, LoggerError> {
        if GLOBAL_LOGGER.get().is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }

        // Progress bars and log lines share the terminal through this layer
        let indicatif_layer = IndicatifLayer::new();

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(config.level)));

        let fmt_layer = match config.output {
            LogOutput::Stderr => format_layer(
                indicatif_layer.get_stderr_writer(),
                config.format,
                config.color,
            ),
            LogOutput::Stdout => format_layer(
                indicatif_layer.get_stdout_writer(),
                config.format,
                config.color,
            ),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(indicatif_layer)
            .try_init()
            .map_err(|e| LoggerError::InitializationFailed {
                reason: e.to_string(),
            })?;

        GLOBAL_LOGGER
            .set(Logger {
                config: config.clone(),
            })
            .map_err(|_| LoggerError::AlreadyInitialized)?;

        tracing::debug!(
            level = ?config.level,
            format = ?config.format,
            output = ?config.output,
            color = config.color,
            "Logger initialized"
        );

        GLOBAL_LOGGER
            .get()
            .ok_or_else(|| LoggerError::InitializationFailed {
                reason: "global logger missing after initialization".to_string(),
            })
    }

    /// Get reference to the global logger instance
    pub fn global() -> Option<&'static Self> {
        GLOBAL_LOGGER.get()
    }

    /// Check if logger is initialized
    pub fn is_initialized() -> bool {
        GLOBAL_LOGGER.get().is_some()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }
}

/// Create a span for operations that should show progress bars
#[macro_export]
macro_rules! progress_span {
    ($operation:expr) => {
        tracing::info_span!("progress", operation = $operation)
    };
    ($operation:expr, total = $total:expr) => {
        tracing::info_span!("progress", operation = $operation, total = $total)
    };
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
