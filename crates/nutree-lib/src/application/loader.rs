//! Configuration loading and global state management
//!
//! Coordinates loading configuration from various sources and provides
//! global application configuration access.

use crate::primitives::ConfigError;
use std::sync::OnceLock;
use tracing::trace;

use super::{config::AppConfig, env::EnvironmentConfig};

// Global configuration available throughout the application
static GLOBAL_CONFIG: OnceLock<AppConfig> = OnceLock::new();

const ENV_FILES: [&str; 2] = [".env.local", ".env"];

impl AppConfig {
    /// Load `.env.local` then `.env` into the process environment
    ///
    /// Missing files are skipped; variables already set are kept.
    pub fn load_env_files() -> Result<(), ConfigError> {
        for env_file in ENV_FILES {
            match dotenvy::from_filename(env_file) {
                Ok(path) => trace!("Loaded {}", path.display()),
                Err(e) if e.not_found() => {}
                Err(e) => {
                    return Err(ConfigError::EnvFileError {
                        file: env_file.to_string(),
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    /// defaults -> standard env vars -> CLI (including NUTREE_* env)
    pub fn layered(cli: AppConfig) -> Result<Self, ConfigError> {
        Self::layered_with(cli, &EnvironmentConfig::load()?)
    }

    pub fn layered_with(cli: AppConfig, env_config: &EnvironmentConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.color = env_config.apply_color_config(config.color);
        config = config.merge_with(cli);
        config.validate()?;
        Ok(config)
    }

    /// Initialize global configuration (call once in main)
    pub fn init_global(config: AppConfig) -> Result<(), ConfigError> {
        GLOBAL_CONFIG
            .set(config)
            .map_err(|_| ConfigError::AlreadyInitialized)
    }

    /// Global configuration, if `init_global` has run
    pub fn global() -> Option<&'static AppConfig> {
        GLOBAL_CONFIG.get()
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
